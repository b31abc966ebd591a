//! Synchronous tools for agent frameworks.

pub mod arguments;
pub mod thinking;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
#[cfg(feature = "mcp")]
pub use thinking::McpSequentialThinkingTool;
pub use thinking::{thinking_tools, ClearThinkingTool, ThinkStepTool, ThinkingSummaryTool};
pub use tool::{render_failure, Tool};
pub use types::{ParameterBuilder, ToolParameters};
