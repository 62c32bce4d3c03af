//! Target-shaped bulk records
//!
//! These are the normalized records sent to the bulk result endpoint of the
//! target run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized status token accepted by the bulk endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusToken {
    Passed,
    Failed,
    Invalid,
    Blocked,
    Skipped,
    Unknown,
}

impl StatusToken {
    /// Wire form of the token
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusToken::Passed => "passed",
            StatusToken::Failed => "failed",
            StatusToken::Invalid => "invalid",
            StatusToken::Blocked => "blocked",
            StatusToken::Skipped => "skipped",
            StatusToken::Unknown => "unknown",
        }
    }
}

impl fmt::Display for StatusToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized step: only status and comment are carried over
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkStep {
    pub status: StatusToken,
    pub comment: String,
}

/// One result ready for bulk submission to the target run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkRecord {
    /// Target case id in string form
    pub case_id: String,

    /// Stack trace carried through unchanged
    pub stacktrace: String,

    /// Original comment followed by Markdown attachment links
    pub comment: String,

    /// Normalized steps in source order
    pub steps: Vec<BulkStep>,

    /// Normalized result status
    pub status: StatusToken,

    /// Execution time copied verbatim
    #[serde(rename = "time_ms")]
    pub duration_ms: i64,
}

/// Request body of the bulk endpoint: `{"results": [...]}`
#[derive(Debug, Serialize)]
pub struct BulkPayload<'a> {
    pub results: &'a [BulkRecord],
}

impl<'a> BulkPayload<'a> {
    /// Wrap a batch of records
    pub fn new(results: &'a [BulkRecord]) -> Self {
        Self { results }
    }
}
