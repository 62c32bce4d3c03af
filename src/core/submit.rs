//! Chunked bulk submission
//!
//! Records are sent in contiguous batches, in order, one request at a
//! time. The first failing batch stops the submission; batches already
//! accepted stay in the target run.

use crate::adapters::qase::QaseApi;
use crate::domain::{BulkRecord, MigrateError, ProjectCode, Result, RunId};
use std::sync::Arc;

/// Largest batch the bulk endpoint accepts
pub const MAX_BATCH_SIZE: usize = 200;

/// Outcome of a completed submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionReport {
    /// Planned batches
    pub batch_count: usize,

    /// Batches accepted by the API (zero in dry-run mode)
    pub batches_sent: usize,

    /// Records accepted by the API (zero in dry-run mode)
    pub records_sent: usize,

    /// Nothing was sent because of dry-run mode
    pub dry_run: bool,
}

/// Number of batches `records` records split into
pub fn batch_count(records: usize, batch_size: usize) -> usize {
    records.div_ceil(batch_size.max(1))
}

/// Sends records to the bulk endpoint of the target run
pub struct BulkSubmitter {
    api: Arc<dyn QaseApi>,
    project: ProjectCode,
    run: RunId,
    batch_size: usize,
    dry_run: bool,
}

impl BulkSubmitter {
    /// Create a submitter; the batch size is clamped to `1..=MAX_BATCH_SIZE`
    pub fn new(api: Arc<dyn QaseApi>, project: ProjectCode, run: RunId, batch_size: usize) -> Self {
        Self {
            api,
            project,
            run,
            batch_size: batch_size.clamp(1, MAX_BATCH_SIZE),
            dry_run: false,
        }
    }

    /// Log the planned batches instead of sending them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Submit every record, batch by batch
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::Submission`] for the first batch the API
    /// rejects, with its zero-based index and the number of records sent
    /// before it. Later batches are not attempted.
    pub async fn submit(&self, records: &[BulkRecord]) -> Result<SubmissionReport> {
        let batch_count = batch_count(records.len(), self.batch_size);
        let mut report = SubmissionReport {
            batch_count,
            dry_run: self.dry_run,
            ..SubmissionReport::default()
        };

        tracing::info!(
            project = %self.project,
            run_id = %self.run,
            records = records.len(),
            batch_count,
            batch_size = self.batch_size,
            dry_run = self.dry_run,
            "Submitting results"
        );

        for (batch_index, batch) in records.chunks(self.batch_size).enumerate() {
            if self.dry_run {
                tracing::info!(batch_index, size = batch.len(), "Dry run: batch not sent");
                continue;
            }

            self.api
                .create_results_bulk(&self.project, self.run, batch)
                .await
                .map_err(|source| {
                    tracing::error!(
                        batch_index,
                        batch_count,
                        records_sent = report.records_sent,
                        error = %source,
                        "Bulk submission failed"
                    );
                    MigrateError::Submission {
                        batch_index,
                        batch_count,
                        records_sent: report.records_sent,
                        source,
                    }
                })?;

            report.batches_sent += 1;
            report.records_sent += batch.len();
            tracing::info!(batch_index, batch_count, size = batch.len(), "Batch submitted");
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0, 200), 0);
        assert_eq!(batch_count(1, 200), 1);
        assert_eq!(batch_count(200, 200), 1);
        assert_eq!(batch_count(201, 200), 2);
        assert_eq!(batch_count(450, 200), 3);
    }
}
