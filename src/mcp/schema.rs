//! MCP schema types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Schema for a tool exposed by an MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MCPToolSchema {
    pub name: String,
    pub description: Option<String>,
    pub input_schema: serde_json::Value,
}

impl MCPToolSchema {
    /// Names of the tool's required parameters.
    pub fn required_parameters(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|required| required.as_array())
            .map(|names| names.iter().filter_map(|name| name.as_str()).collect())
            .unwrap_or_default()
    }
}

impl fmt::Display for MCPToolSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => {
                let first_line = description.lines().next().unwrap_or(description);
                write!(f, "{}: {}", self.name, first_line)
            }
            _ => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_uses_first_description_line() {
        let tool = MCPToolSchema {
            name: "git_status".into(),
            description: Some("Shows the working tree status\nMore detail".into()),
            input_schema: json!({ "type": "object", "required": ["repo_path"] }),
        };
        assert_eq!(tool.to_string(), "git_status: Shows the working tree status");
        assert_eq!(tool.required_parameters(), vec!["repo_path"]);

        let bare = MCPToolSchema {
            name: "read_graph".into(),
            description: None,
            input_schema: json!({}),
        };
        assert_eq!(bare.to_string(), "read_graph");
        assert!(bare.required_parameters().is_empty());
    }
}
