//! Domain identifier types with validation
//!
//! Newtype wrappers for Qase identifiers. Case ids are only meaningful within
//! their own project, so source and target ids share the type but never the
//! numbering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Test case identifier, unique within one project
///
/// # Examples
///
/// ```
/// use qase_migrate::domain::ids::CaseId;
/// use std::str::FromStr;
///
/// let id = CaseId::from_str("101").unwrap();
/// assert_eq!(id.value(), 101);
/// assert_eq!(id.to_string(), "101");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseId(u64);

impl CaseId {
    /// Creates a new case id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CaseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|e| format!("Invalid case id '{s}': {e}"))
    }
}

impl From<u64> for CaseId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Test run identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(u64);

impl RunId {
    /// Creates a new run id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Custom field identifier
///
/// Identifies the target-project field that stores the originating source
/// case id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomFieldId(u64);

impl CustomFieldId {
    /// Creates a new custom field id
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    pub const fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CustomFieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Qase project code newtype wrapper
///
/// Project codes appear as path segments in every API call, so they must be
/// non-empty and free of URL-significant characters.
///
/// # Examples
///
/// ```
/// use qase_migrate::domain::ids::ProjectCode;
///
/// let code = ProjectCode::new("DEMO").unwrap();
/// assert_eq!(code.as_str(), "DEMO");
/// assert!(ProjectCode::new("a/b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectCode(String);

impl ProjectCode {
    /// Creates a new project code
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err("Project code cannot be empty".to_string());
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!(
                "Invalid project code '{trimmed}': only ASCII letters and digits are allowed"
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the project code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ProjectCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for ProjectCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
