//! Call arguments passed to tool handlers

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Arguments for a single tool invocation (Value Object)
///
/// A thin wrapper over a JSON object with typed accessors. Handlers report
/// bad arguments through [`ToolResult`](crate::tool::result::ToolResult)
/// failures rather than panicking, so every accessor here is fallible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolParams(serde_json::Map<String, Value>);

impl ToolParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }

    /// Parse from a JSON string (e.g. the `arguments` field of an
    /// OpenAI-style tool call). Invalid or non-object input yields empty
    /// params rather than an error.
    pub fn from_json_str(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_map(&self) -> &serde_json::Map<String, Value> {
        &self.0
    }

    /// Get a string argument, accepting numbers and booleans by rendering
    /// them. Returns `None` when absent or null.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Get a required string argument. Absent, null, or empty values are
    /// all treated as missing.
    pub fn require_str(&self, key: &str) -> Result<String, String> {
        match self.get_str(key) {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(format!("Missing required parameter: {}", key)),
        }
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get_i64(key).and_then(|n| u64::try_from(n).ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.0.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<serde_json::Map<String, Value>> for ToolParams {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_require_str_present() {
        let params = ToolParams::new().with("path", "src/main.rs");
        assert_eq!(params.require_str("path").unwrap(), "src/main.rs");
    }

    #[test]
    fn test_require_str_missing_names_parameter() {
        let params = ToolParams::new();
        let err = params.require_str("path").unwrap_err();
        assert_eq!(err, "Missing required parameter: path");
    }

    #[test]
    fn test_require_str_empty_is_missing() {
        let params = ToolParams::new().with("path", "");
        assert!(params.require_str("path").is_err());
    }

    #[test]
    fn test_get_str_coerces_numbers() {
        let params = ToolParams::new().with("timeout", 30);
        assert_eq!(params.get_str("timeout").unwrap(), "30");
        assert_eq!(params.get_i64("timeout"), Some(30));
    }

    #[test]
    fn test_get_bool_accepts_strings() {
        let params = ToolParams::new()
            .with("recursive", "true")
            .with("flat", false);
        assert_eq!(params.get_bool("recursive"), Some(true));
        assert_eq!(params.get_bool("flat"), Some(false));
    }

    #[test]
    fn test_from_json_str() {
        let params = ToolParams::from_json_str(r#"{"command": "ls", "timeout": 10}"#);
        assert_eq!(params.require_str("command").unwrap(), "ls");
        assert_eq!(params.get_i64("timeout"), Some(10));

        assert!(ToolParams::from_json_str("not json").is_empty());
        assert!(ToolParams::from_json_str("[1, 2]").is_empty());
    }

    #[test]
    fn test_serde_transparent() {
        let params = ToolParams::new().with("question", "why?");
        let raw = serde_json::to_value(&params).unwrap();
        assert_eq!(raw, json!({"question": "why?"}));
    }
}
