//! Domain models and types for the migration pipeline.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CaseId`], [`RunId`], [`CustomFieldId`], [`ProjectCode`])
//! - **Source models** ([`TestCase`], [`SourceResult`], [`Step`], [`StepStatus`], [`Attachment`])
//! - **Target models** ([`BulkRecord`], [`BulkStep`], [`StatusToken`])
//! - **Error types** ([`MigrateError`], [`QaseError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Case ids from the source and the target project are both [`CaseId`], but
//! they only ever meet through a
//! [`CorrespondenceMap`](crate::core::correspondence::CorrespondenceMap).
//! Run and field ids get their own newtypes so they cannot be swapped:
//!
//! ```rust
//! use qase_migrate::domain::{CustomFieldId, RunId};
//!
//! let run = RunId::new(12);
//! let field = CustomFieldId::new(7);
//! // let wrong: RunId = field;  // Compile error!
//! # let _ = (run, field);
//! ```

pub mod bulk;
pub mod case;
pub mod errors;
pub mod ids;
pub mod result;
pub mod run_result;
mod serde_ext;

// Re-export commonly used types for convenience
pub use bulk::{BulkPayload, BulkRecord, BulkStep, StatusToken};
pub use case::{CustomFieldValue, TestCase};
pub use errors::{MigrateError, QaseError};
pub use ids::{CaseId, CustomFieldId, ProjectCode, RunId};
pub use result::Result;
pub use run_result::{Attachment, SourceResult, Step, StepStatus};
