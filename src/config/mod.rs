//! Runtime configuration loaded from the environment and `.env`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::bridge::BridgeTimeouts;
use crate::error::{BridgeError, Result};
#[cfg(feature = "mcp")]
use crate::mcp::{ServerPreset, ServerSpec};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 3;

/// Application settings.
///
/// Only the bridge ceilings and the thinking switches change behavior in
/// this crate; the model fields are carried for agent code built on top.
#[derive(Clone, PartialEq)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub default_model: String,
    pub temperature: f32,
    pub enable_mcp_thinking: bool,
    pub use_real_mcp: bool,
    pub max_search_results: usize,
    /// Local server script used instead of the published sequential-thinking package.
    pub mcp_server_script: Option<PathBuf>,
    pub timeouts: BridgeTimeouts,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            default_model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            enable_mcp_thinking: true,
            use_real_mcp: true,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
            mcp_server_script: None,
            timeouts: BridgeTimeouts::default(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_key", &self.openai_api_key.as_ref().map(|_| "***"))
            .field("default_model", &self.default_model)
            .field("temperature", &self.temperature)
            .field("enable_mcp_thinking", &self.enable_mcp_thinking)
            .field("use_real_mcp", &self.use_real_mcp)
            .field("max_search_results", &self.max_search_results)
            .field("mcp_server_script", &self.mcp_server_script)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unset and blank values fall
    /// back to defaults; malformed values are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Ok(Self {
            openai_api_key: get("OPENAI_API_KEY"),
            default_model: get("DEFAULT_MODEL").unwrap_or(defaults.default_model),
            temperature: parse_or("TEMPERATURE", get("TEMPERATURE"), defaults.temperature)?,
            enable_mcp_thinking: parse_bool_or(
                "ENABLE_MCP_THINKING",
                get("ENABLE_MCP_THINKING"),
                defaults.enable_mcp_thinking,
            )?,
            use_real_mcp: parse_bool_or("USE_REAL_MCP", get("USE_REAL_MCP"), defaults.use_real_mcp)?,
            max_search_results: parse_or(
                "MAX_SEARCH_RESULTS",
                get("MAX_SEARCH_RESULTS"),
                defaults.max_search_results,
            )?,
            mcp_server_script: get("MCP_SERVER_SCRIPT").map(PathBuf::from),
            timeouts: BridgeTimeouts {
                connect: parse_secs_or(
                    "MCP_CONNECT_TIMEOUT_SECS",
                    get("MCP_CONNECT_TIMEOUT_SECS"),
                    defaults.timeouts.connect,
                )?,
                call: parse_secs_or(
                    "MCP_CALL_TIMEOUT_SECS",
                    get("MCP_CALL_TIMEOUT_SECS"),
                    defaults.timeouts.call,
                )?,
                disconnect: parse_secs_or(
                    "MCP_DISCONNECT_TIMEOUT_SECS",
                    get("MCP_DISCONNECT_TIMEOUT_SECS"),
                    defaults.timeouts.disconnect,
                )?,
            },
        })
    }

    /// Check that required settings are present.
    pub fn validate(&self) -> Result<()> {
        if self.openai_api_key.is_none() {
            return Err(BridgeError::Configuration(
                "OPENAI_API_KEY not found; set it in .env or the environment".into(),
            ));
        }
        Ok(())
    }

    /// Human-readable summary with the API key masked.
    pub fn describe(&self) -> String {
        let mark = |on: bool| if on { "enabled" } else { "disabled" };
        let mut lines = vec![
            format!("Model: {}", self.default_model),
            format!("Temperature: {}", self.temperature),
            format!("MCP thinking: {}", mark(self.enable_mcp_thinking)),
            format!(
                "Thinking backend: {}",
                if self.use_real_mcp {
                    "MCP server"
                } else {
                    "local step log"
                }
            ),
            format!("Max search results: {}", self.max_search_results),
            format!(
                "API key: {}",
                if self.openai_api_key.is_some() {
                    "set"
                } else {
                    "not set"
                }
            ),
            format!(
                "Timeouts: connect {}s, call {}s, disconnect {}s",
                self.timeouts.connect.as_secs(),
                self.timeouts.call.as_secs(),
                self.timeouts.disconnect.as_secs()
            ),
        ];
        if let Some(script) = &self.mcp_server_script {
            lines.push(format!("Server script: {}", script.display()));
        }
        lines.join("\n")
    }

    /// Launch settings for the sequential-thinking server.
    #[cfg(feature = "mcp")]
    pub fn thinking_server(&self) -> ServerSpec {
        match &self.mcp_server_script {
            Some(script) => ServerSpec::script(script),
            None => ServerPreset::SequentialThinking.spec(&std::env::temp_dir()),
        }
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|e| BridgeError::Configuration(format!("{key}={raw:?} is invalid: {e}"))),
    }
}

fn parse_bool_or(key: &str, raw: Option<String>, default: bool) -> Result<bool> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(BridgeError::Configuration(format!(
            "{key}={raw:?} is not a boolean"
        ))),
    }
}

fn parse_secs_or(key: &str, raw: Option<String>, default: Duration) -> Result<Duration> {
    let secs: u64 = parse_or(key, raw, default.as_secs())?;
    if secs == 0 {
        return Err(BridgeError::Configuration(format!(
            "{key} must be at least 1 second"
        )));
    }
    Ok(Duration::from_secs(secs))
}
