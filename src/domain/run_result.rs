//! Source run result models
//!
//! These mirror the entities returned by the result listing endpoint. The
//! upstream service is inconsistent about the shape of status fields, so
//! they are captured loosely here and resolved explicitly during
//! transformation.

use super::ids::CaseId;
use super::serde_ext::{null_as_default, status_text};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A result recorded in the source run
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceResult {
    /// Result hash (informational)
    #[serde(default)]
    pub hash: Option<String>,

    /// Source case the result belongs to; `None` for results whose case is gone
    #[serde(default)]
    pub case_id: Option<CaseId>,

    /// Status as sent by the API, either a numeric code or a token
    #[serde(default, deserialize_with = "status_text")]
    pub status: String,

    /// Free-form comment
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,

    /// Captured stack trace
    #[serde(default, deserialize_with = "null_as_default")]
    pub stacktrace: String,

    /// Executed steps in order
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: Vec<Step>,

    /// Files attached to the result itself
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,

    /// Execution time in milliseconds
    #[serde(rename = "time_spent_ms", default, deserialize_with = "null_as_default")]
    pub duration_ms: i64,
}

impl SourceResult {
    /// Minimal result for a case, mostly useful for building fixtures
    pub fn new(case_id: CaseId, status: impl Into<String>) -> Self {
        Self {
            hash: None,
            case_id: Some(case_id),
            status: status.into(),
            comment: String::new(),
            stacktrace: String::new(),
            steps: Vec::new(),
            attachments: Vec::new(),
            duration_ms: 0,
        }
    }
}

/// One executed step of a result
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Step status in whichever shape the API sent it
    #[serde(default)]
    pub status: StepStatus,

    /// Step comment
    #[serde(default, deserialize_with = "null_as_default")]
    pub comment: String,

    /// Files attached to the step
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,

    /// Step position within the case
    #[serde(default)]
    pub position: Option<i64>,
}

impl Step {
    /// Create a step with the given status and comment
    pub fn new(status: StepStatus, comment: impl Into<String>) -> Self {
        Self {
            status,
            comment: comment.into(),
            attachments: Vec::new(),
            position: None,
        }
    }
}

/// The step status field, resolved from its wire shape
///
/// JSON numbers (the API sends them as floating-point literals such as
/// `1.0`) become `IntegerCode` by truncation; strings are kept verbatim;
/// any other shape, including `null`, is `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StepStatus {
    /// Numeric status code
    IntegerCode(i64),
    /// Status sent as a string; may or may not hold a number
    StringToken(String),
    /// Missing, null, boolean, array or object
    #[default]
    Unrecognized,
}

impl StepStatus {
    /// Classify a raw JSON value
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .map(StepStatus::IntegerCode)
                .unwrap_or(StepStatus::Unrecognized),
            Value::String(s) => StepStatus::StringToken(s.clone()),
            _ => StepStatus::Unrecognized,
        }
    }
}

impl<'de> Deserialize<'de> for StepStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(StepStatus::from_json(&value))
    }
}

/// A file attached to a result or step
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    /// File name, possibly percent-encoded
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,

    /// Download URL
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

impl Attachment {
    /// Create an attachment
    pub fn new(filename: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            url: url.into(),
        }
    }
}
