//! Result type alias for the migration library

use super::errors::MigrateError;

/// Result type alias for migration operations
///
/// # Examples
///
/// ```
/// use qase_migrate::domain::result::Result;
/// use qase_migrate::domain::errors::MigrateError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(MigrateError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, MigrateError>;
