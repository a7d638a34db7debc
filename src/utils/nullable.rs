//! Serde helpers treating an explicit JSON `null` like a missing field.
//!
//! Use together with `#[serde(default)]` (or `default = "..."`) so the
//! field may also be omitted.

use serde::{Deserialize, Deserializer};

/// `null` becomes `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `null` becomes `true`, for switches that are on unless turned off.
pub fn null_as_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
        #[serde(default = "yes", deserialize_with = "null_as_true")]
        enabled: bool,
    }

    fn yes() -> bool {
        true
    }

    #[test]
    fn test_null_and_missing_are_the_same() {
        let from_null: Body =
            serde_json::from_str(r#"{"name":null,"tags":null,"enabled":null}"#).unwrap();
        let from_missing: Body = serde_json::from_str("{}").unwrap();

        for body in [from_null, from_missing] {
            assert_eq!(body.name, "");
            assert!(body.tags.is_empty());
            assert!(body.enabled);
        }
    }

    #[test]
    fn test_values_pass_through() {
        let body: Body =
            serde_json::from_str(r#"{"name":"a","tags":["x"],"enabled":false}"#).unwrap();
        assert_eq!(body.name, "a");
        assert_eq!(body.tags, vec!["x".to_string()]);
        assert!(!body.enabled);
    }

    #[test]
    fn test_wrong_type_still_fails() {
        assert!(serde_json::from_str::<Body>(r#"{"name":42}"#).is_err());
    }
}
