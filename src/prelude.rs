//! Convenience re-exports for common use.

pub use crate::bridge::{Bridge, BridgeState, BridgeTimeouts, Connection};
pub use crate::config::AppConfig;
pub use crate::error::{BridgeError, ErrorCategory, Result};
pub use crate::thinking::{shared_log, SharedStepLog, StepLog, ThinkingStep};
pub use crate::tools::{thinking_tools, Tool, ToolArguments};

#[cfg(feature = "mcp")]
pub use crate::mcp::{MCPClient, ServerPreset, ServerSpec, ThoughtRequest};
