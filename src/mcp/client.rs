//! MCP client for connecting to MCP servers.

use async_trait::async_trait;
use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, ClientInfo, Content, JsonObject, ProtocolVersion,
        ResourceContents,
    },
    service::{ClientInitializeError, ServiceError},
};

use super::schema::MCPToolSchema;
use super::server::ServerSpec;
use super::thinking::{ThoughtRequest, SEQUENTIAL_THINKING_TOOL};
use super::transport::{MCPRunningService, MCPTransport, StdioTransport};
use crate::bridge::Connection;
use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MCPConnectionState {
    Disconnected,
    Initialized,
    Closed,
}

#[derive(Debug, Clone)]
pub struct MCPToolCallResult {
    pub structured_content: Option<serde_json::Value>,
    pub text_content: Option<String>,
    pub content: Vec<serde_json::Value>,
}

impl MCPToolCallResult {
    pub fn into_value_or_text(self) -> serde_json::Value {
        if let Some(structured) = self.structured_content {
            return structured;
        }
        if let Some(text) = self.text_content {
            return serde_json::Value::String(text);
        }
        serde_json::Value::Array(self.content)
    }

    /// Text rendering of the result: text content if any, otherwise the
    /// JSON of the structured or raw content.
    pub fn into_text(mut self) -> String {
        match self.text_content.take() {
            Some(text) => text,
            None => self.into_value_or_text().to_string(),
        }
    }
}

/// Client for a Model Context Protocol server.
///
/// Owns one rmcp session at a time. A session that drops is not re-opened;
/// callers see the error and decide.
pub struct MCPClient {
    transport: Option<Box<dyn MCPTransport>>,
    session: Option<MCPRunningService>,
    state: MCPConnectionState,
}

impl MCPClient {
    /// Create a new MCP client with the given transport.
    pub fn new(transport: Box<dyn MCPTransport>) -> Self {
        Self {
            transport: Some(transport),
            session: None,
            state: MCPConnectionState::Disconnected,
        }
    }

    /// Client for a server launched as a child process.
    pub fn stdio(spec: ServerSpec) -> Self {
        Self::new(Box::new(StdioTransport::new(spec)))
    }

    /// Create a client from an already-running rmcp service.
    ///
    /// The initialization handshake was already done by rmcp `serve(...)`.
    pub fn from_running_service(session: MCPRunningService) -> Self {
        Self {
            transport: None,
            session: Some(session),
            state: MCPConnectionState::Initialized,
        }
    }

    pub fn connection_state(&self) -> MCPConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == MCPConnectionState::Initialized
    }

    /// Start the server and complete the MCP handshake. No-op when already
    /// connected.
    pub async fn connect(&mut self) -> Result<()> {
        if self.state == MCPConnectionState::Initialized {
            return Ok(());
        }

        let session = self.connect_with_protocol_fallback().await?;
        self.session = Some(session);
        self.state = MCPConnectionState::Initialized;
        Ok(())
    }

    /// Close the session and let the child process exit.
    pub async fn disconnect(&mut self) -> Result<()> {
        self.state = MCPConnectionState::Closed;
        let Some(session) = self.session.take() else {
            return Ok(());
        };

        match session.cancel().await {
            Ok(reason) => {
                tracing::debug!(?reason, "MCP session closed");
                Ok(())
            }
            Err(error) => Err(BridgeError::Transport(format!(
                "MCP session task failed during shutdown: {error}"
            ))),
        }
    }

    /// List available tools from the MCP server.
    pub async fn list_tools(&mut self) -> Result<Vec<MCPToolSchema>> {
        let session = self.active_session()?;

        let tools = match session.list_all_tools().await {
            Ok(tools) => tools,
            Err(ServiceError::UnexpectedResponse) => {
                let page = session
                    .list_tools(None)
                    .await
                    .map_err(|e| map_service_error("list_tools", e))?;
                page.tools
            }
            Err(e) => return Err(map_service_error("list_tools", e)),
        };

        Ok(tools.into_iter().map(map_mcp_tool_schema).collect())
    }

    /// Execute a tool on the MCP server.
    ///
    /// `arguments` may be an object, a JSON string holding an object, or null.
    pub async fn call_tool(
        &mut self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<MCPToolCallResult> {
        let arguments = coerce_tool_arguments(arguments)?;
        let session = self.active_session()?;

        let result = session
            .call_tool(CallToolRequestParams {
                meta: None,
                name: name.to_owned().into(),
                arguments,
                task: None,
            })
            .await
            .map_err(|e| map_service_error("call_tool", e))?;

        map_call_result(name, result)
    }

    /// Submit one thought to the sequential-thinking server and return its
    /// text reply.
    pub async fn sequential_thinking(&mut self, request: &ThoughtRequest) -> Result<String> {
        let result = self
            .call_tool(SEQUENTIAL_THINKING_TOOL, request.to_arguments())
            .await?;
        Ok(result.into_text())
    }

    fn active_session(&mut self) -> Result<&mut MCPRunningService> {
        if self.state != MCPConnectionState::Initialized {
            return Err(BridgeError::NotStarted);
        }
        match self.session.as_mut() {
            Some(session) if !session.is_closed() => Ok(session),
            Some(_) => Err(BridgeError::Transport("MCP session is closed".into())),
            None => Err(BridgeError::NotStarted),
        }
    }

    async fn connect_with_protocol_fallback(&mut self) -> Result<MCPRunningService> {
        let transport = self
            .transport
            .as_mut()
            .ok_or_else(|| BridgeError::Configuration("MCP client has no transport".into()))?;

        tracing::info!(server = %transport.describe(), "connecting to MCP server");

        let latest_client_info = ClientInfo {
            protocol_version: ProtocolVersion::LATEST,
            ..Default::default()
        };

        match transport.connect(latest_client_info).await {
            Ok(session) => return Ok(session),
            Err(error) if should_retry_protocol_fallback(&error) => {
                tracing::debug!(error = %error, "retrying MCP handshake with 2024-11-05");
            }
            Err(error) => return Err(map_client_initialize_error(error)),
        }

        let fallback_client_info = ClientInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            ..Default::default()
        };
        transport
            .connect(fallback_client_info)
            .await
            .map_err(map_client_initialize_error)
    }
}

#[async_trait]
impl Connection for MCPClient {
    async fn connect(&mut self) -> Result<()> {
        MCPClient::connect(self).await
    }

    async fn disconnect(&mut self) -> Result<()> {
        MCPClient::disconnect(self).await
    }
}

fn should_retry_protocol_fallback(error: &ClientInitializeError) -> bool {
    match error {
        ClientInitializeError::JsonRpcError(error) => {
            let message = error.message.to_ascii_lowercase();
            message.contains("protocol") && message.contains("version")
        }
        _ => false,
    }
}

fn map_mcp_tool_schema(tool: rmcp::model::Tool) -> MCPToolSchema {
    MCPToolSchema {
        name: tool.name.to_string(),
        description: tool.description.map(|d| d.to_string()),
        input_schema: serde_json::Value::Object((*tool.input_schema).clone()),
    }
}

fn coerce_tool_arguments(value: serde_json::Value) -> Result<Option<JsonObject>> {
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::Object(map) => Ok(Some(map)),
        serde_json::Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let parsed: serde_json::Value = serde_json::from_str(trimmed).map_err(|e| {
                BridgeError::InvalidArgument(format!("MCP tool arguments must be valid JSON: {e}"))
            })?;
            coerce_tool_arguments(parsed)
        }
        other => Err(BridgeError::InvalidArgument(format!(
            "MCP tool arguments must be a JSON object; got {other}"
        ))),
    }
}

fn extract_text_content(content: &[Content]) -> Option<String> {
    let mut lines = Vec::new();
    for item in content {
        if let Some(text) = item.as_text() {
            lines.push(text.text.clone());
            continue;
        }
        if let Some(resource) = item.as_resource() {
            if let ResourceContents::TextResourceContents { text, .. } = &resource.resource {
                lines.push(text.clone());
            }
        }
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn map_call_result(name: &str, result: CallToolResult) -> Result<MCPToolCallResult> {
    let text_content = extract_text_content(&result.content);
    let content = result
        .content
        .iter()
        .filter_map(|item| serde_json::to_value(item).ok())
        .collect::<Vec<_>>();

    if result.is_error.unwrap_or(false) {
        let message = result
            .structured_content
            .as_ref()
            .map(|v| v.to_string())
            .or_else(|| text_content.clone())
            .unwrap_or_else(|| "MCP tool returned an error result".into());

        return Err(BridgeError::ToolExecution {
            tool_name: name.to_string(),
            message,
        });
    }

    Ok(MCPToolCallResult {
        structured_content: result.structured_content,
        text_content,
        content,
    })
}

fn map_client_initialize_error(error: ClientInitializeError) -> BridgeError {
    match error {
        ClientInitializeError::ConnectionClosed(context) => {
            BridgeError::Connection(format!("MCP initialize connection closed: {context}"))
        }
        ClientInitializeError::TransportError { error, context } => BridgeError::Connection(
            format!("MCP initialize transport error ({context}): {error}"),
        ),
        ClientInitializeError::JsonRpcError(error) => BridgeError::Protocol(format!(
            "MCP initialize JSON-RPC error {}: {}",
            error.code.0, error.message
        )),
        ClientInitializeError::Cancelled => {
            BridgeError::Connection("MCP initialize cancelled".into())
        }
        other => BridgeError::Protocol(format!("MCP initialize error: {other}")),
    }
}

fn map_service_error(context: &str, error: ServiceError) -> BridgeError {
    match error {
        ServiceError::McpError(error) => BridgeError::Protocol(format!(
            "{context}: MCP error {}: {}",
            error.code.0, error.message
        )),
        ServiceError::TransportSend(error) => {
            BridgeError::Transport(format!("{context}: MCP transport send failed: {error}"))
        }
        ServiceError::TransportClosed => {
            BridgeError::Transport(format!("{context}: MCP transport closed"))
        }
        ServiceError::UnexpectedResponse => {
            BridgeError::Protocol(format!("{context}: unexpected MCP response"))
        }
        ServiceError::Cancelled { reason } => {
            let suffix = reason
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default();
            BridgeError::Transport(format!("{context}: MCP request cancelled{suffix}"))
        }
        ServiceError::Timeout { timeout } => BridgeError::Timeout(timeout.as_millis() as u64),
        other => BridgeError::Protocol(format!("{context}: MCP service error: {other}")),
    }
}
