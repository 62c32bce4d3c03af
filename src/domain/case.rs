//! Test case domain model

use super::ids::{CaseId, CustomFieldId};
use super::serde_ext::null_as_default;
use serde::{Deserialize, Serialize};

/// A test case as listed by the case endpoint
///
/// Immutable once fetched. Only the fields the correspondence step needs
/// are kept; everything else in the upstream entity is ignored.
///
/// # Examples
///
/// ```
/// use qase_migrate::domain::{CaseId, CustomFieldId, TestCase};
///
/// let case = TestCase::new(CaseId::new(101), "Login")
///     .with_custom_field(CustomFieldId::new(7), "1");
///
/// let values: Vec<&str> = case.custom_field_values(CustomFieldId::new(7)).collect();
/// assert_eq!(values, vec!["1"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Case id within its project
    pub id: CaseId,

    /// Case title
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    /// Custom field values attached to the case
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_fields: Vec<CustomFieldValue>,
}

impl TestCase {
    /// Create a case without custom fields
    pub fn new(id: CaseId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            custom_fields: Vec::new(),
        }
    }

    /// Attach a custom field value
    pub fn with_custom_field(mut self, id: CustomFieldId, value: impl Into<String>) -> Self {
        self.custom_fields.push(CustomFieldValue {
            id,
            value: Some(value.into()),
        });
        self
    }

    /// All values recorded under `field`, in the order the API returned them
    pub fn custom_field_values(&self, field: CustomFieldId) -> impl Iterator<Item = &str> + '_ {
        self.custom_fields
            .iter()
            .filter(move |cf| cf.id == field)
            .filter_map(|cf| cf.value.as_deref())
    }
}

/// One `{id, value}` entry of a case's custom fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldValue {
    /// Field id
    pub id: CustomFieldId,

    /// Raw value; `None` when the field exists but is unset
    #[serde(default)]
    pub value: Option<String>,
}
