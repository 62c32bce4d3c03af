//! Lenient deserializers for upstream fields that may arrive as `null`
//! or in more than one JSON shape.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read a status field that may be a JSON string or a JSON number.
///
/// Numbers are rendered in integer text form (`2.0` becomes `"2"`) so that
/// both shapes meet the same normalization table. Anything else reads as an
/// empty string, which normalizes to `unknown`.
pub(crate) fn status_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.to_string(),
            None => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map(|f| (f.trunc() as i64).to_string())
                .unwrap_or_default(),
        },
        _ => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "status_text")]
        status: String,
        #[serde(default, deserialize_with = "null_as_default")]
        comment: String,
    }

    #[test]
    fn test_status_text_shapes() {
        let holder: Holder = serde_json::from_str(r#"{"status": "passed"}"#).unwrap();
        assert_eq!(holder.status, "passed");

        let holder: Holder = serde_json::from_str(r#"{"status": 2}"#).unwrap();
        assert_eq!(holder.status, "2");

        let holder: Holder = serde_json::from_str(r#"{"status": 3.0}"#).unwrap();
        assert_eq!(holder.status, "3");

        let holder: Holder = serde_json::from_str(r#"{"status": null}"#).unwrap();
        assert_eq!(holder.status, "");

        let holder: Holder = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(holder.status, "");
    }

    #[test]
    fn test_null_as_default() {
        let holder: Holder = serde_json::from_str(r#"{"comment": null}"#).unwrap();
        assert_eq!(holder.comment, "");

        let holder: Holder = serde_json::from_str(r#"{"comment": "text"}"#).unwrap();
        assert_eq!(holder.comment, "text");
    }
}
