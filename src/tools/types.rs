//! Parameter schemas for thinking tools.

use serde::{Deserialize, Serialize};

/// JSON Schema-based parameter definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    /// JSON Schema object describing the parameters.
    pub schema: serde_json::Value,
}

impl ToolParameters {
    /// Tool that takes no parameters.
    pub fn empty() -> Self {
        Self::object().build()
    }

    pub fn object() -> ParameterBuilder {
        ParameterBuilder {
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }

    /// Names of the required parameters, in declaration order.
    pub fn required(&self) -> Vec<&str> {
        self.schema["required"]
            .as_array()
            .map(|names| names.iter().filter_map(|name| name.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Builder for tool parameter schemas.
pub struct ParameterBuilder {
    properties: serde_json::Map<String, serde_json::Value>,
    required: Vec<String>,
}

impl ParameterBuilder {
    fn insert(mut self, name: &str, schema: serde_json::Value, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn string(self, name: &str, description: &str, required: bool) -> Self {
        self.insert(
            name,
            serde_json::json!({ "type": "string", "description": description }),
            required,
        )
    }

    pub fn positive_integer(self, name: &str, description: &str, required: bool) -> Self {
        self.insert(
            name,
            serde_json::json!({ "type": "integer", "description": description, "minimum": 1 }),
            required,
        )
    }

    /// Optional positive integer advertising a default.
    pub fn positive_integer_or(self, name: &str, description: &str, default: u32) -> Self {
        self.insert(
            name,
            serde_json::json!({
                "type": "integer",
                "description": description,
                "minimum": 1,
                "default": default,
            }),
            false,
        )
    }

    pub fn boolean(self, name: &str, description: &str, default: bool) -> Self {
        self.insert(
            name,
            serde_json::json!({
                "type": "boolean",
                "description": description,
                "default": default,
            }),
            false,
        )
    }

    pub fn build(self) -> ToolParameters {
        ToolParameters {
            schema: serde_json::json!({
                "type": "object",
                "properties": self.properties,
                "required": self.required,
            }),
        }
    }
}
