//! Domain error types
//!
//! This module defines the error hierarchy for the migration pipeline.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main migration error type
///
/// This is the primary error type used throughout the library. Variants
/// raised before the concurrent submit/persist phase abort the run;
/// persistence errors are only ever logged and recorded in the summary.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Qase API errors outside of a paginated read or bulk submission
    #[error("Qase API error: {0}")]
    Qase(#[from] QaseError),

    /// A page of a paginated listing could not be fetched or decoded
    #[error("Failed to fetch {resource} at offset {offset}: {source}")]
    Fetch {
        /// What was being listed (e.g. "cases of project DEMO")
        resource: String,
        /// Offset of the failing page
        offset: usize,
        /// Underlying API failure
        #[source]
        source: QaseError,
    },

    /// Every fetched result was dropped for lack of a target case
    #[error("No valid results to send: none of the {fetched} fetched results has a corresponding target case")]
    EmptyPayload {
        /// Number of source results that were fetched
        fetched: usize,
    },

    /// A bulk submission batch failed; later batches were not attempted
    #[error("Bulk submission failed at batch {batch_index} of {batch_count} ({records_sent} records already sent): {source}")]
    Submission {
        /// Zero-based index of the failing batch
        batch_index: usize,
        /// Total number of planned batches
        batch_count: usize,
        /// Records accepted by earlier batches
        records_sent: usize,
        /// Underlying API failure
        #[source]
        source: QaseError,
    },

    /// Writing the correspondence table failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// A spawned task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

impl MigrateError {
    /// Whether the error belongs to the configuration stage
    pub fn is_configuration(&self) -> bool {
        matches!(self, MigrateError::Configuration(_))
    }
}

/// Qase API errors
///
/// Errors that occur when talking to the Qase REST API.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum QaseError {
    /// Failed to reach the server
    #[error("Failed to connect to Qase API: {0}")]
    ConnectionFailed(String),

    /// Token rejected (401/403)
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Body could not be decoded into the expected shape
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Response envelope reported `status: false`
    #[error("Request rejected by Qase: {0}")]
    RequestRejected(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },
}

impl QaseError {
    /// Map a non-success HTTP status and its body to an error
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => QaseError::AuthenticationFailed(format!("HTTP {status}: {message}")),
            400..=499 => QaseError::ClientError { status, message },
            _ => QaseError::ServerError { status, message },
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MigrateError {
    fn from(err: std::io::Error) -> Self {
        MigrateError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for MigrateError {
    fn from(err: serde_json::Error) -> Self {
        MigrateError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MigrateError {
    fn from(err: toml::de::Error) -> Self {
        MigrateError::Configuration(format!("TOML parse error: {err}"))
    }
}

// Conversion from csv writer errors
impl From<csv::Error> for MigrateError {
    fn from(err: csv::Error) -> Self {
        MigrateError::Persistence(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_error_display() {
        let err = MigrateError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_qase_error_conversion() {
        let qase_err = QaseError::ConnectionFailed("Network error".to_string());
        let err: MigrateError = qase_err.into();
        assert!(matches!(err, MigrateError::Qase(_)));
        assert!(!err.is_configuration());
    }

    #[test]
    fn test_from_status_classification() {
        assert!(matches!(
            QaseError::from_status(401, "bad token".to_string()),
            QaseError::AuthenticationFailed(_)
        ));
        assert!(matches!(
            QaseError::from_status(404, "missing".to_string()),
            QaseError::ClientError { status: 404, .. }
        ));
        assert!(matches!(
            QaseError::from_status(502, "gateway".to_string()),
            QaseError::ServerError { status: 502, .. }
        ));
    }

    #[test]
    fn test_submission_error_names_batch() {
        let err = MigrateError::Submission {
            batch_index: 1,
            batch_count: 3,
            records_sent: 200,
            source: QaseError::ServerError {
                status: 500,
                message: "boom".to_string(),
            },
        };
        let message = err.to_string();
        assert!(message.contains("batch 1 of 3"));
        assert!(message.contains("200 records already sent"));
    }

    #[test]
    fn test_fetch_error_keeps_source() {
        let err = MigrateError::Fetch {
            resource: "cases of project SRC".to_string(),
            offset: 200,
            source: QaseError::InvalidResponse("eof".to_string()),
        };
        assert!(err.to_string().contains("offset 200"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: MigrateError = io_err.into();
        assert!(matches!(err, MigrateError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: MigrateError = json_err.into();
        assert!(matches!(err, MigrateError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: MigrateError = toml_err.into();
        assert!(matches!(err, MigrateError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
