//! Blocking MCP helpers on top of the generic bridge.

use futures::FutureExt;

use super::Bridge;
use crate::config::AppConfig;
use crate::error::Result;
use crate::mcp::{MCPClient, MCPToolCallResult, MCPToolSchema, ServerSpec, ThoughtRequest};

impl Bridge<MCPClient> {
    /// Unstarted bridge to a stdio MCP server. Each start spawns a fresh
    /// server process.
    pub fn for_server(spec: ServerSpec) -> Self {
        Bridge::new(move || Ok(MCPClient::stdio(spec.clone()))).with_name("mcp-bridge")
    }

    /// Unstarted bridge to the configured sequential-thinking server.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::for_server(config.thinking_server()).with_timeouts(config.timeouts)
    }

    pub fn list_tools(&self) -> Result<Vec<MCPToolSchema>> {
        self.call(|client| client.list_tools().boxed())
    }

    pub fn call_tool(
        &self,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Result<MCPToolCallResult> {
        let name = name.into();
        self.call(move |client| async move { client.call_tool(&name, arguments).await }.boxed())
    }

    /// Submit one thought and block for the server's text reply.
    pub fn sequential_thinking(&self, request: ThoughtRequest) -> Result<String> {
        self.call(move |client| async move { client.sequential_thinking(&request).await }.boxed())
    }
}
