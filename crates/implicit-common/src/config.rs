//! Options recognized by the resolver.
//!
//! Options come from a JSON object (`{ "emitTypeComments": true }`), either on
//! its own or embedded in a derivation request.

use serde::{Deserialize, Deserializer};

/// Custom deserializer for boolean options that accepts both bool and string values.
/// This handles configs that contain `"emitTypeComments": "true"` instead of `true`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(false),
        Some(BoolOrString::Bool(b)) => Ok(b),
        Some(BoolOrString::String(s)) => {
            let normalized = s.trim().to_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" | "on" => Ok(true),
                "false" | "0" | "no" | "off" => Ok(false),
                _ => Err(Error::custom(format!(
                    "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
                ))),
            }
        }
    }
}

/// Options for a derivation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeriveOptions {
    /// Attach `// <type>` comments to emitted shared derivations.
    ///
    /// Diagnostic only; never changes what gets resolved.
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub emit_type_comments: bool,
}

impl DeriveOptions {
    #[must_use]
    pub const fn with_type_comments(mut self, enabled: bool) -> Self {
        self.emit_type_comments = enabled;
        self
    }
}

/// Parse options from JSON text.
pub fn parse_options(text: &str) -> Result<DeriveOptions, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_default_off() {
        let options = parse_options("{}").expect("empty object parses");
        assert!(!options.emit_type_comments);
        assert_eq!(options, DeriveOptions::default());
    }

    #[test]
    fn test_options_accept_bool_and_string() {
        assert!(
            parse_options(r#"{"emitTypeComments": true}"#)
                .unwrap()
                .emit_type_comments
        );
        assert!(
            parse_options(r#"{"emitTypeComments": "yes"}"#)
                .unwrap()
                .emit_type_comments
        );
        assert!(
            !parse_options(r#"{"emitTypeComments": "off"}"#)
                .unwrap()
                .emit_type_comments
        );
    }

    #[test]
    fn test_options_reject_garbage_string() {
        let err = parse_options(r#"{"emitTypeComments": "maybe"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid boolean value"));
    }
}
