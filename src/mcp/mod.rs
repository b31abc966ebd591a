//! Model Context Protocol (MCP) client for stdio tool servers.

pub mod client;
pub mod schema;
pub mod server;
#[cfg(test)]
pub(crate) mod test_support;
pub mod thinking;
pub mod transport;

pub use client::{MCPClient, MCPConnectionState, MCPToolCallResult};
pub use schema::MCPToolSchema;
pub use server::{ServerPreset, ServerSpec};
pub use thinking::{ThoughtRequest, SEQUENTIAL_THINKING_TOOL};
pub use transport::{MCPRunningService, MCPTransport, StdioTransport};
