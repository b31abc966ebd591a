//! MCP transport layer.

use async_trait::async_trait;
use rmcp::model::ClientInfo;
use rmcp::service::{ClientInitializeError, DynService, RoleClient, RunningService, ServiceExt};
use rmcp::transport::TokioChildProcess;
use tokio::process::Command;

use super::server::ServerSpec;

pub type DynClientService = Box<dyn DynService<RoleClient>>;
pub type MCPRunningService = RunningService<RoleClient, DynClientService>;

/// Transport trait for MCP communication.
#[async_trait]
pub trait MCPTransport: Send {
    /// Create and initialize a new rmcp running service for this transport.
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError>;

    /// Human-readable description of the peer, for logs.
    fn describe(&self) -> String;
}

/// Stdio-based MCP transport: the server runs as a child process.
pub struct StdioTransport {
    spec: ServerSpec,
}

impl StdioTransport {
    pub fn new(spec: ServerSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &ServerSpec {
        &self.spec
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.spec.command);
        command.args(&self.spec.args).envs(&self.spec.env);
        if let Some(cwd) = &self.spec.cwd {
            command.current_dir(cwd);
        }
        command
    }
}

#[async_trait]
impl MCPTransport for StdioTransport {
    async fn connect(
        &mut self,
        client_info: ClientInfo,
    ) -> Result<MCPRunningService, ClientInitializeError> {
        let transport = TokioChildProcess::new(self.command()).map_err(|error| {
            ClientInitializeError::transport::<TokioChildProcess>(error, "spawn stdio transport")
        })?;

        client_info.into_dyn().serve(transport).await
    }

    fn describe(&self) -> String {
        self.spec.display_command()
    }
}
