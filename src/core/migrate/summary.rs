//! Migration summary and reporting

use crate::domain::MigrateError;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Where and why the bulk submission stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFailure {
    /// Zero-based index of the failing batch
    pub batch_index: usize,

    /// Planned batches
    pub batch_count: usize,

    /// Records accepted before the failure
    pub records_sent: usize,

    /// Human-readable error
    pub message: String,
}

impl SubmissionFailure {
    /// Extract the failure details from a submission error
    pub fn from_error(error: &MigrateError) -> Option<Self> {
        match error {
            MigrateError::Submission {
                batch_index,
                batch_count,
                records_sent,
                ..
            } => Some(Self {
                batch_index: *batch_index,
                batch_count: *batch_count,
                records_sent: *records_sent,
                message: error.to_string(),
            }),
            _ => None,
        }
    }
}

/// Summary of a migration run
#[derive(Debug, Clone)]
pub struct MigrationSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration
    pub duration: Duration,

    /// Nothing was submitted
    pub dry_run: bool,

    /// Cases listed in the source project
    pub source_cases: usize,

    /// Cases listed in the target project
    pub target_cases: usize,

    /// Source cases with a target case
    pub mapped_cases: usize,

    /// Correlation values claimed by several target cases
    pub ambiguous_values: usize,

    /// Results listed in the source run
    pub results_fetched: usize,

    /// Results without a target case
    pub results_dropped: usize,

    /// Records prepared for submission
    pub records_prepared: usize,

    /// Planned batches
    pub batch_count: usize,

    /// Batches accepted
    pub batches_sent: usize,

    /// Records accepted
    pub records_sent: usize,

    /// Mapping table destination
    pub mapping_path: PathBuf,

    /// Rows written to the mapping table, if it was written
    pub mapping_rows: Option<usize>,

    /// Failed persistence writes
    pub persistence_errors: Vec<String>,

    /// Set when a batch was rejected
    pub submission_failure: Option<SubmissionFailure>,
}

impl MigrationSummary {
    /// Create an empty summary for a run starting now
    pub fn new(mapping_path: PathBuf, dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            duration: Duration::from_secs(0),
            dry_run,
            source_cases: 0,
            target_cases: 0,
            mapped_cases: 0,
            ambiguous_values: 0,
            results_fetched: 0,
            results_dropped: 0,
            records_prepared: 0,
            batch_count: 0,
            batches_sent: 0,
            records_sent: 0,
            mapping_path,
            mapping_rows: None,
            persistence_errors: Vec::new(),
            submission_failure: None,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Every batch was accepted (or, in dry-run mode, planned)
    pub fn is_successful(&self) -> bool {
        self.submission_failure.is_none()
    }

    /// The mapping table was written
    pub fn mapping_saved(&self) -> bool {
        self.mapping_rows.is_some()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            started_at = %self.started_at.to_rfc3339(),
            source_cases = self.source_cases,
            target_cases = self.target_cases,
            mapped_cases = self.mapped_cases,
            results_fetched = self.results_fetched,
            results_dropped = self.results_dropped,
            records_prepared = self.records_prepared,
            batches_sent = self.batches_sent,
            batch_count = self.batch_count,
            records_sent = self.records_sent,
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs_f64(),
            "Migration completed"
        );

        for error in &self.persistence_errors {
            tracing::warn!(error = %error, "Mapping persistence failed");
        }

        if let Some(failure) = &self.submission_failure {
            tracing::error!(
                batch_index = failure.batch_index,
                records_sent = failure.records_sent,
                message = %failure.message,
                "Migration finished with a rejected batch"
            );
        }
    }
}
