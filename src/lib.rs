//! mcp-bridge: blocking access to long-lived MCP tool servers.
//!
//! Agent frameworks that call tools synchronously cannot drive an async MCP
//! session directly. A [`Bridge`](bridge::Bridge) owns the session on a
//! background worker and exposes blocking, time-bounded calls. Alongside it,
//! the [`thinking`] step log and [`tools`] give agents a structured
//! step-by-step reasoning scratchpad, local or MCP-backed.
//!
//! # Quick Start
//!
//! ```no_run
//! use mcp_bridge::prelude::*;
//!
//! # fn example() -> mcp_bridge::error::Result<()> {
//! let config = AppConfig::from_env()?;
//! let bridge = Bridge::from_config(&config);
//! bridge.start()?;
//!
//! let reply = bridge.sequential_thinking(
//!     ThoughtRequest::builder()
//!         .thought("Break the task into parts")
//!         .thought_number(1)
//!         .total_thoughts(3)
//!         .build(),
//! )?;
//! println!("{reply}");
//! bridge.stop();
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod prelude;
pub mod thinking;
pub mod tools;

#[cfg(feature = "mcp")]
pub mod mcp;

#[cfg(feature = "cli")]
pub mod cli;
