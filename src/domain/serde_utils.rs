//! Tolerant deserializers for API payloads.
//!
//! The catalog API has grown several image representations over time and
//! older records still carry fields of unexpected types. Each helper here
//! reads the raw JSON value and maps anything it does not understand to the
//! field's empty value instead of failing the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a string field. Non-string values decode as `None`.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Reads a scalar that is rendered as text, such as a timestamp or a
/// version number. Strings and numbers are accepted.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Reads a positive integer identifier given as a number or a numeric string.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(id.filter(|id| *id > 0))
}

/// Reads a boolean-like flag. `true`, `1`, `"1"` and `"true"` are truthy.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_u64() == Some(1),
        Value::String(s) => {
            let s = s.trim();
            s == "1" || s.eq_ignore_ascii_case("true")
        }
        _ => false,
    })
}

/// Reads a nested object. Anything that is not a decodable object is `None`.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn lenient_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Reads an array of objects, dropping elements that fail to decode.
///
/// # Errors
///
/// Returns an error only if the underlying deserializer fails.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use test_case::test_case;

    #[derive(Debug, Deserialize)]
    struct Fields {
        #[serde(default, deserialize_with = "lenient_flag")]
        flag: bool,
        #[serde(default, deserialize_with = "lenient_id")]
        id: Option<u64>,
        #[serde(default, deserialize_with = "lenient_string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient_text")]
        stamp: Option<String>,
    }

    fn parse(json: &str) -> Fields {
        serde_json::from_str(json).unwrap()
    }

    #[test_case(r#"{"flag": true}"#, true ; "bool_true")]
    #[test_case(r#"{"flag": 1}"#, true ; "number_one")]
    #[test_case(r#"{"flag": "1"}"#, true ; "string_one")]
    #[test_case(r#"{"flag": "TRUE"}"#, true ; "string_true")]
    #[test_case(r#"{"flag": 0}"#, false ; "number_zero")]
    #[test_case(r#"{"flag": null}"#, false ; "null")]
    #[test_case(r"{}", false ; "missing")]
    fn test_flag(json: &str, expected: bool) {
        assert_eq!(parse(json).flag, expected);
    }

    #[test]
    fn test_id_accepts_numeric_string() {
        assert_eq!(parse(r#"{"id": "42"}"#).id, Some(42));
        assert_eq!(parse(r#"{"id": 42}"#).id, Some(42));
    }

    #[test]
    fn test_id_rejects_zero_and_garbage() {
        assert_eq!(parse(r#"{"id": 0}"#).id, None);
        assert_eq!(parse(r#"{"id": "abc"}"#).id, None);
        assert_eq!(parse(r#"{"id": -3}"#).id, None);
    }

    #[test]
    fn test_wrong_types_become_none() {
        let p = parse(r#"{"name": {"nested": true}, "stamp": [1]}"#);
        assert_eq!(p.name, None);
        assert_eq!(p.stamp, None);
    }

    #[test]
    fn test_text_accepts_numbers() {
        assert_eq!(parse(r#"{"stamp": 1700000000}"#).stamp.as_deref(), Some("1700000000"));
    }
}
