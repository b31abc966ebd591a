//! Error types for the bridge, the MCP client and the thinking tools.

use thiserror::Error;

/// Primary error type for all bridge operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge is not started; call start() first")]
    NotStarted,

    #[error("Connection handshake timed out after {0}ms")]
    ConnectionTimeout(u64),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Call timed out after {0}ms; outcome unknown")]
    CallTimeout(u64),

    #[error("Bridge worker stopped before completing the request")]
    WorkerStopped,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Tool {tool_name} failed: {message}")]
    ToolExecution { tool_name: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Coarse classification of a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Misuse of the start/call/stop lifecycle.
    Lifecycle,
    Timeout,
    Connection,
    Protocol,
    ToolExecution,
    Configuration,
    Internal,
}

impl BridgeError {
    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotStarted | Self::WorkerStopped => ErrorCategory::Lifecycle,
            Self::ConnectionTimeout(_) | Self::CallTimeout(_) | Self::Timeout(_) => {
                ErrorCategory::Timeout
            }
            Self::Connection(_) | Self::Transport(_) => ErrorCategory::Connection,
            Self::Protocol(_) => ErrorCategory::Protocol,
            Self::ToolExecution { .. } => ErrorCategory::ToolExecution,
            Self::Configuration(_) | Self::InvalidArgument(_) => ErrorCategory::Configuration,
            Self::Io(_) | Self::Serialization(_) => ErrorCategory::Internal,
        }
    }

    /// Whether the caller stopped waiting without learning the outcome.
    ///
    /// The background operation may still run to completion after this.
    pub fn is_timeout(&self) -> bool {
        self.category() == ErrorCategory::Timeout
    }

    /// Wrap a handshake failure as a [`BridgeError::Connection`], keeping
    /// errors that already carry connection context untouched.
    pub(crate) fn into_connection_error(self) -> Self {
        match self {
            Self::Connection(_) | Self::ConnectionTimeout(_) => self,
            other => Self::Connection(other.to_string()),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, BridgeError>;
