//! Qase API envelopes
//!
//! Every Qase response is wrapped as `{"status": bool, "result": ...}`.
//! These types only exist to peel that wrapper off; the payloads themselves
//! deserialize straight into the domain models.

use crate::domain::QaseError;
use serde::Deserialize;

/// Envelope of a listing endpoint
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "default_status")]
    pub status: bool,

    // A missing field already reads as None; `default` would add a T: Default bound
    pub result: Option<EntityPage<T>>,

    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
}

/// One page of entities
#[derive(Debug, Deserialize)]
pub struct EntityPage<T> {
    #[serde(default)]
    pub total: Option<u64>,

    #[serde(default = "Vec::new")]
    pub entities: Vec<T>,
}

/// Envelope of a write endpoint
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default = "default_status")]
    pub status: bool,

    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
}

impl<T> ListResponse<T> {
    /// Unwrap the page entities
    ///
    /// A missing `result` is read as an empty page, which ends pagination.
    ///
    /// # Errors
    ///
    /// Returns [`QaseError::RequestRejected`] when the envelope reports
    /// `status: false`.
    pub fn into_entities(self) -> Result<Vec<T>, QaseError> {
        if !self.status {
            return Err(QaseError::RequestRejected(rejection_message(self.error_message)));
        }
        Ok(self.result.map(|page| page.entities).unwrap_or_default())
    }
}

impl StatusResponse {
    /// Check the envelope status
    ///
    /// # Errors
    ///
    /// Returns [`QaseError::RequestRejected`] when `status` is false.
    pub fn ensure_ok(self) -> Result<(), QaseError> {
        if self.status {
            Ok(())
        } else {
            Err(QaseError::RequestRejected(rejection_message(self.error_message)))
        }
    }
}

fn rejection_message(message: Option<String>) -> String {
    message.unwrap_or_else(|| "API reported status=false".to_string())
}

fn default_status() -> bool {
    true
}
