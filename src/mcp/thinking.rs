//! Request type for the sequential-thinking MCP server.

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Tool name exposed by `@modelcontextprotocol/server-sequential-thinking`.
pub const SEQUENTIAL_THINKING_TOOL: &str = "sequentialthinking";

/// One thought submitted to the sequential-thinking server.
///
/// ```
/// use mcp_bridge::mcp::ThoughtRequest;
///
/// let request = ThoughtRequest::builder()
///     .thought("Break the problem down")
///     .thought_number(1)
///     .total_thoughts(3)
///     .build();
/// assert!(request.next_thought_needed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct ThoughtRequest {
    #[builder(into)]
    pub thought: String,
    #[serde(default = "default_thought_number")]
    pub thought_number: u32,
    #[serde(default = "default_total_thoughts")]
    pub total_thoughts: u32,
    #[builder(default = true)]
    #[serde(default = "default_true")]
    pub next_thought_needed: bool,
    #[builder(default)]
    #[serde(default)]
    pub is_revision: bool,
    pub revises_thought: Option<u32>,
    pub branch_from_thought: Option<u32>,
    #[builder(into)]
    pub branch_id: Option<String>,
    #[builder(default)]
    #[serde(default)]
    pub needs_more_thoughts: bool,
}

fn default_true() -> bool {
    true
}

fn default_thought_number() -> u32 {
    1
}

fn default_total_thoughts() -> u32 {
    5
}

impl ThoughtRequest {
    /// Tool arguments in the server's camelCase shape. Optional keys are
    /// only present when set.
    pub fn to_arguments(&self) -> serde_json::Value {
        let mut arguments = serde_json::Map::new();
        arguments.insert("thought".into(), self.thought.clone().into());
        arguments.insert("thoughtNumber".into(), self.thought_number.into());
        arguments.insert("totalThoughts".into(), self.total_thoughts.into());
        arguments.insert("nextThoughtNeeded".into(), self.next_thought_needed.into());

        if self.is_revision {
            arguments.insert("isRevision".into(), true.into());
        }
        if let Some(revises) = self.revises_thought {
            arguments.insert("revisesThought".into(), revises.into());
        }
        if let Some(branch_from) = self.branch_from_thought {
            arguments.insert("branchFromThought".into(), branch_from.into());
        }
        if let Some(branch_id) = &self.branch_id {
            arguments.insert("branchId".into(), branch_id.clone().into());
        }
        if self.needs_more_thoughts {
            arguments.insert("needsMoreThoughts".into(), true.into());
        }

        serde_json::Value::Object(arguments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_request_emits_required_keys_only() {
        let request = ThoughtRequest::builder()
            .thought("Analyse the inputs")
            .thought_number(1)
            .total_thoughts(3)
            .build();

        assert_eq!(
            request.to_arguments(),
            json!({
                "thought": "Analyse the inputs",
                "thoughtNumber": 1,
                "totalThoughts": 3,
                "nextThoughtNeeded": true
            })
        );
    }

    #[test]
    fn revision_and_branch_fields_are_forwarded() {
        let request = ThoughtRequest::builder()
            .thought("Reconsider step two")
            .thought_number(4)
            .total_thoughts(5)
            .next_thought_needed(false)
            .is_revision(true)
            .revises_thought(2)
            .branch_from_thought(2)
            .branch_id("alt")
            .needs_more_thoughts(true)
            .build();

        let arguments = request.to_arguments();
        assert_eq!(arguments["nextThoughtNeeded"], json!(false));
        assert_eq!(arguments["isRevision"], json!(true));
        assert_eq!(arguments["revisesThought"], json!(2));
        assert_eq!(arguments["branchFromThought"], json!(2));
        assert_eq!(arguments["branchId"], json!("alt"));
        assert_eq!(arguments["needsMoreThoughts"], json!(true));
    }

    #[test]
    fn deserializes_tool_call_arguments_with_defaults() {
        let request: ThoughtRequest =
            serde_json::from_value(json!({ "thought": "Start here" })).unwrap();
        assert_eq!(request.thought_number, 1);
        assert_eq!(request.total_thoughts, 5);
        assert!(request.next_thought_needed);
        assert!(!request.is_revision);
        assert!(request.branch_id.is_none());
    }
}
