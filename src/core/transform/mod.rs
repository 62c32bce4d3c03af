//! Result transformation
//!
//! Turns source run results into target-shaped [`BulkRecord`]s:
//! - the case id is remapped through the [`CorrespondenceMap`]
//! - result and step statuses are normalized ([`status`])
//! - result attachments become Markdown links in the comment ([`attachments`])
//!
//! Steps keep only their status and comment. Step attachments and positions
//! are not carried over.

pub mod attachments;
pub mod status;

pub use attachments::{decode_filename, link_attachments};
pub use status::{normalize_status, normalize_step_status};

use crate::core::correspondence::CorrespondenceMap;
use crate::domain::{BulkRecord, BulkStep, CaseId, MigrateError, Result, SourceResult};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Records ready for submission plus what was left behind
#[derive(Debug, Clone, Default)]
pub struct TransformOutcome {
    /// Transformed records in source order
    pub records: Vec<BulkRecord>,

    /// Results without a target case
    pub dropped: usize,

    /// Distinct source case ids that had no target case
    pub unmatched_cases: BTreeSet<CaseId>,
}

/// Converts source results using a resolved correspondence
#[derive(Debug, Clone)]
pub struct ResultTransformer {
    map: Arc<CorrespondenceMap>,
}

impl ResultTransformer {
    /// Create a transformer over a resolved map
    pub fn new(map: Arc<CorrespondenceMap>) -> Self {
        Self { map }
    }

    /// Transform one result
    ///
    /// Returns `None` when the result's case has no target case, or when the
    /// result has no case at all.
    pub fn transform(&self, result: &SourceResult) -> Option<BulkRecord> {
        let target = self.map.get(result.case_id?)?;

        let steps = result
            .steps
            .iter()
            .map(|step| BulkStep {
                status: normalize_step_status(&step.status),
                comment: step.comment.clone(),
            })
            .collect();

        Some(BulkRecord {
            case_id: target.to_string(),
            stacktrace: result.stacktrace.clone(),
            comment: link_attachments(&result.comment, &result.attachments),
            steps,
            status: normalize_status(&result.status),
            duration_ms: result.duration_ms,
        })
    }

    /// Transform every result, dropping those without a target case
    ///
    /// # Errors
    ///
    /// Returns [`MigrateError::EmptyPayload`] when no result survives,
    /// including when `results` is empty.
    pub fn transform_all(&self, results: &[SourceResult]) -> Result<TransformOutcome> {
        let mut outcome = TransformOutcome::default();

        for result in results {
            match self.transform(result) {
                Some(record) => outcome.records.push(record),
                None => {
                    outcome.dropped += 1;
                    if let Some(case_id) = result.case_id {
                        outcome.unmatched_cases.insert(case_id);
                    }
                    tracing::debug!(
                        case_id = ?result.case_id.map(|id| id.value()),
                        "Dropping result without a target case"
                    );
                }
            }
        }

        if outcome.records.is_empty() {
            return Err(MigrateError::EmptyPayload {
                fetched: results.len(),
            });
        }

        if outcome.dropped > 0 {
            tracing::warn!(
                dropped = outcome.dropped,
                unmatched_cases = outcome.unmatched_cases.len(),
                "Some results have no corresponding target case"
            );
        }
        tracing::info!(
            fetched = results.len(),
            prepared = outcome.records.len(),
            "Transformed results"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Attachment, StatusToken, Step, StepStatus};

    fn transformer() -> ResultTransformer {
        let map: CorrespondenceMap = [(CaseId::new(1), CaseId::new(101))].into_iter().collect();
        ResultTransformer::new(Arc::new(map))
    }

    #[test]
    fn test_transform_scenario() {
        let mut result = SourceResult::new(CaseId::new(1), "2");
        result.comment = "Broken on CI".to_string();
        result.stacktrace = "at login()".to_string();
        result.duration_ms = 1500;
        result.steps = vec![Step {
            attachments: vec![Attachment::new("step.png", "http://s")],
            position: Some(1),
            ..Step::new(StepStatus::IntegerCode(1), "ok")
        }];
        result.attachments = vec![Attachment::new("log%20.txt", "http://x")];

        let record = transformer().transform(&result).unwrap();
        assert_eq!(record.case_id, "101");
        assert_eq!(record.status, StatusToken::Failed);
        assert_eq!(record.comment, "Broken on CI\n\n[log .txt](http://x)");
        assert_eq!(record.stacktrace, "at login()");
        assert_eq!(record.duration_ms, 1500);
        assert_eq!(
            record.steps,
            vec![BulkStep {
                status: StatusToken::Passed,
                comment: "ok".to_string()
            }]
        );
    }

    #[test]
    fn test_unmapped_result_dropped() {
        let t = transformer();
        assert!(t.transform(&SourceResult::new(CaseId::new(2), "1")).is_none());

        let mut orphan = SourceResult::new(CaseId::new(1), "1");
        orphan.case_id = None;
        assert!(t.transform(&orphan).is_none());
    }

    #[test]
    fn test_transform_all_filters_and_keeps_order() {
        let results = vec![
            SourceResult::new(CaseId::new(1), "1"),
            SourceResult::new(CaseId::new(2), "1"),
            SourceResult::new(CaseId::new(1), "failed"),
            SourceResult::new(CaseId::new(3), "1"),
        ];

        let outcome = transformer().transform_all(&results).unwrap();
        let statuses: Vec<StatusToken> = outcome.records.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![StatusToken::Passed, StatusToken::Failed]);
        assert!(outcome.records.iter().all(|r| r.case_id == "101"));
        assert_eq!(outcome.dropped, 2);
        assert_eq!(
            outcome.unmatched_cases.into_iter().collect::<Vec<_>>(),
            vec![CaseId::new(2), CaseId::new(3)]
        );
    }

    #[test]
    fn test_all_dropped_is_empty_payload() {
        let results = vec![SourceResult::new(CaseId::new(9), "1")];
        match transformer().transform_all(&results) {
            Err(MigrateError::EmptyPayload { fetched }) => assert_eq!(fetched, 1),
            other => panic!("expected empty payload, got {other:?}"),
        }

        assert!(matches!(
            transformer().transform_all(&[]),
            Err(MigrateError::EmptyPayload { fetched: 0 })
        ));
    }
}
