//! Migration orchestration
//!
//! - [`coordinator`] - sequencing and the concurrent persist/submit join
//! - [`summary`] - run summary

pub mod coordinator;
pub mod summary;

pub use coordinator::{MigrationCoordinator, MigrationPlan};
pub use summary::{MigrationSummary, SubmissionFailure};
