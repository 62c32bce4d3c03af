//! Qase API trait definition
//!
//! The pipeline talks to Qase only through [`QaseApi`], so the fetch and
//! submit stages can be driven by an in-memory double in tests.

use crate::domain::{BulkRecord, ProjectCode, QaseError, RunId, SourceResult, TestCase};
use async_trait::async_trait;

/// Operations the migration needs from the Qase REST API
///
/// Implementations return [`QaseError`] rather than the crate error; the
/// caller knows which resource and offset failed and wraps it accordingly.
#[async_trait]
pub trait QaseApi: Send + Sync {
    /// List one page of test cases in a project
    async fn list_cases(
        &self,
        project: &ProjectCode,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TestCase>, QaseError>;

    /// List one page of results recorded in a run
    async fn list_results(
        &self,
        project: &ProjectCode,
        run: RunId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SourceResult>, QaseError>;

    /// Append results to a run in a single bulk request
    async fn create_results_bulk(
        &self,
        project: &ProjectCode,
        run: RunId,
        records: &[BulkRecord],
    ) -> Result<(), QaseError>;

    /// Base URL requests are sent to
    fn base_url(&self) -> &str;
}
