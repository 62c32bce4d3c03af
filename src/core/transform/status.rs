//! Status normalization
//!
//! The upstream service reports statuses either as numeric codes or as
//! tokens. Both are mapped onto [`StatusToken`].

use crate::domain::{StatusToken, StepStatus};

/// Normalize a result status
///
/// Numeric codes `1, 2, 3, 5` map to passed, failed, blocked, skipped. The
/// tokens `passed, failed, invalid, blocked, skipped` pass through. Anything
/// else is `unknown`.
pub fn normalize_status(raw: &str) -> StatusToken {
    match raw {
        "1" | "passed" => StatusToken::Passed,
        "2" | "failed" => StatusToken::Failed,
        "3" | "blocked" => StatusToken::Blocked,
        "5" | "skipped" => StatusToken::Skipped,
        "invalid" => StatusToken::Invalid,
        _ => StatusToken::Unknown,
    }
}

/// Normalize a step status
///
/// Step codes differ from result codes: `0` and `5` are skipped, `1` passed,
/// `2` failed, `3` invalid. String statuses must parse as an integer;
/// tokens such as `"passed"` are not recognised for steps.
pub fn normalize_step_status(status: &StepStatus) -> StatusToken {
    let code = match status {
        StepStatus::IntegerCode(code) => Some(*code),
        StepStatus::StringToken(text) => text.parse::<i64>().ok(),
        StepStatus::Unrecognized => None,
    };

    match code {
        Some(0) | Some(5) => StatusToken::Skipped,
        Some(1) => StatusToken::Passed,
        Some(2) => StatusToken::Failed,
        Some(3) => StatusToken::Invalid,
        _ => StatusToken::Unknown,
    }
}
