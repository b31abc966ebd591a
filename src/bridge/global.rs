//! Process-wide MCP bridge for callers without their own lifecycle
//! management.
//!
//! Prefer owning a [`Bridge`] explicitly; this exists for tool code that is
//! constructed by a framework and cannot be handed one.

use std::sync::{Arc, OnceLock};

use super::Bridge;
use crate::config::AppConfig;
use crate::error::Result;
use crate::mcp::MCPClient;

static GLOBAL: OnceLock<Arc<Bridge<MCPClient>>> = OnceLock::new();

/// Shared bridge to the configured sequential-thinking server, started on
/// first use.
///
/// Configuration is read from the environment once. A failed start is
/// returned to the caller and retried on the next call.
pub fn bridge() -> Result<Arc<Bridge<MCPClient>>> {
    let bridge = match GLOBAL.get() {
        Some(bridge) => Arc::clone(bridge),
        None => {
            let config = AppConfig::from_env()?;
            Arc::clone(GLOBAL.get_or_init(|| Arc::new(Bridge::from_config(&config))))
        }
    };
    bridge.start()?;
    Ok(bridge)
}

/// Stop the shared bridge. Safe to call when it was never created or never
/// started.
pub fn cleanup() {
    if let Some(bridge) = GLOBAL.get() {
        bridge.stop();
    }
}

/// Whether the shared bridge exists and is connected.
pub fn is_initialized() -> bool {
    GLOBAL.get().is_some_and(|bridge| bridge.is_connected())
}
