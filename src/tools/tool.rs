//! Tool trait for synchronous agent frameworks.

use super::arguments::ToolArguments;
use super::types::ToolParameters;
use crate::error::{BridgeError, Result};

/// Core tool trait: implement to expose a capability to an agent.
///
/// Tools are called from blocking code. Anything asynchronous goes through
/// a [`Bridge`](crate::bridge::Bridge).
pub trait Tool: Send + Sync {
    /// Tool name (must match what the model calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema parameters.
    fn parameters(&self) -> &ToolParameters;

    /// Execute the tool with parsed arguments.
    fn execute(&self, args: &ToolArguments) -> Result<String>;

    /// Execute and render any failure as text for the agent.
    ///
    /// A failing tool never takes the agent down with it.
    fn run(&self, args: &ToolArguments) -> String {
        match self.execute(args) {
            Ok(output) => output,
            Err(error) => {
                tracing::warn!(tool = self.name(), error = %error, "tool execution failed");
                render_failure(self.name(), &error)
            }
        }
    }
}

/// Diagnostic text returned to the agent in place of a tool result.
pub fn render_failure(tool_name: &str, error: &BridgeError) -> String {
    if error.is_timeout() {
        format!("✗ {tool_name} timed out; the outcome is unknown. ({error})")
    } else {
        format!("✗ {tool_name} failed: {error}")
    }
}

impl std::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name()).finish()
    }
}
