//! Typed access to tool call arguments.

use crate::error::{BridgeError, Result};

/// Wrapper around tool call arguments providing typed extraction.
///
/// Agent frameworks sometimes hand arguments over as a JSON-encoded string;
/// that form is decoded on construction.
#[derive(Debug, Clone, Default)]
pub struct ToolArguments {
    value: serde_json::Value,
}

impl ToolArguments {
    pub fn new(value: serde_json::Value) -> Self {
        let value = match value {
            serde_json::Value::String(raw) => match serde_json::from_str(raw.trim()) {
                Ok(parsed @ serde_json::Value::Object(_)) => parsed,
                _ => serde_json::Value::String(raw),
            },
            serde_json::Value::Null => serde_json::json!({}),
            other => other,
        };
        Self { value }
    }

    /// Get the raw JSON value.
    pub fn raw(&self) -> &serde_json::Value {
        &self.value
    }

    /// Get a string argument by key.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| BridgeError::InvalidArgument(format!("Missing string argument: {key}")))
    }

    /// Get an optional string argument; blank strings count as absent.
    pub fn get_str_opt(&self, key: &str) -> Option<&str> {
        self.value
            .get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    /// Get a positive integer argument.
    pub fn get_u32(&self, key: &str) -> Result<u32> {
        match self.value.get(key) {
            Some(value) => parse_positive(key, value),
            None => Err(BridgeError::InvalidArgument(format!(
                "Missing integer argument: {key}"
            ))),
        }
    }

    /// Get an optional positive integer argument, falling back to `default`.
    pub fn get_u32_or(&self, key: &str, default: u32) -> Result<u32> {
        match self.value.get(key) {
            None | Some(serde_json::Value::Null) => Ok(default),
            Some(value) => parse_positive(key, value),
        }
    }

    /// Get an optional positive integer argument; `null` counts as absent.
    pub fn get_u32_opt(&self, key: &str) -> Result<Option<u32>> {
        match self.value.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => parse_positive(key, value).map(Some),
        }
    }

    /// Get a boolean argument, falling back to `default`. Accepts `"true"` and
    /// `"false"` strings.
    pub fn get_bool_or(&self, key: &str, default: bool) -> Result<bool> {
        match self.value.get(key) {
            None | Some(serde_json::Value::Null) => Ok(default),
            Some(serde_json::Value::Bool(flag)) => Ok(*flag),
            Some(serde_json::Value::String(s)) if s.trim().eq_ignore_ascii_case("true") => Ok(true),
            Some(serde_json::Value::String(s)) if s.trim().eq_ignore_ascii_case("false") => {
                Ok(false)
            }
            Some(value) => Err(BridgeError::InvalidArgument(format!(
                "{key} must be a boolean, got {value}"
            ))),
        }
    }

    /// Deserialize the entire arguments into a typed struct.
    pub fn deserialize<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.value.clone()).map_err(|e| {
            BridgeError::InvalidArgument(format!("Failed to deserialize arguments: {e}"))
        })
    }
}

impl From<serde_json::Value> for ToolArguments {
    fn from(value: serde_json::Value) -> Self {
        Self::new(value)
    }
}

// Models often send numbers as strings ("3"); accept both.
fn parse_positive(key: &str, value: &serde_json::Value) -> Result<u32> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    parsed
        .filter(|n| *n >= 1)
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            BridgeError::InvalidArgument(format!("{key} must be a positive integer, got {value}"))
        })
}
