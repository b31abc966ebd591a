//! Launch settings for stdio MCP servers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How to launch a tool server as a child process speaking MCP on stdio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSpec {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    #[serde(default)]
    pub cwd: Option<PathBuf>,
}

impl ServerSpec {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Fetch and run a published server package through `npx -y`.
    pub fn npx(package: &str, extra_args: impl IntoIterator<Item = String>) -> Self {
        let mut args = vec!["-y".to_string(), package.to_string()];
        args.extend(extra_args);
        Self::new("npx", args)
    }

    /// Run a local server script, picking the interpreter from its extension.
    pub fn script(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let display = path.to_string_lossy().into_owned();
        let interpreter = match path.extension().and_then(|ext| ext.to_str()) {
            Some("py") => Some("python3"),
            Some("js" | "mjs" | "cjs") => Some("node"),
            _ => None,
        };
        match interpreter {
            Some(interpreter) => Self::new(interpreter, vec![display]),
            None => Self::new(display, Vec::new()),
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Command line as a single string, for logs and diagnostics.
    pub fn display_command(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Reference MCP servers published under `@modelcontextprotocol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ServerPreset {
    SequentialThinking,
    Filesystem,
    Fetch,
    Git,
    Memory,
}

impl ServerPreset {
    pub const ALL: [ServerPreset; 5] = [
        ServerPreset::SequentialThinking,
        ServerPreset::Filesystem,
        ServerPreset::Fetch,
        ServerPreset::Git,
        ServerPreset::Memory,
    ];

    pub fn package(self) -> &'static str {
        match self {
            Self::SequentialThinking => "@modelcontextprotocol/server-sequential-thinking",
            Self::Filesystem => "@modelcontextprotocol/server-filesystem",
            Self::Fetch => "@modelcontextprotocol/server-fetch",
            Self::Git => "@modelcontextprotocol/server-git",
            Self::Memory => "@modelcontextprotocol/server-memory",
        }
    }

    /// Launch settings for this preset.
    ///
    /// The filesystem server may touch only the temp dir and `workdir`; the
    /// git server is pointed at `workdir` as its repository.
    pub fn spec(self, workdir: &Path) -> ServerSpec {
        let workdir = workdir.to_string_lossy().into_owned();
        let extra = match self {
            Self::Filesystem => vec![
                std::env::temp_dir().to_string_lossy().into_owned(),
                workdir,
            ],
            Self::Git => vec!["--repository".to_string(), workdir],
            Self::SequentialThinking | Self::Fetch | Self::Memory => Vec::new(),
        };
        ServerSpec::npx(self.package(), extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn npx_spec_prefixes_auto_install_flag() {
        let spec = ServerPreset::SequentialThinking.spec(Path::new("/work"));
        assert_eq!(spec.command, "npx");
        assert_eq!(
            spec.args,
            vec![
                "-y".to_string(),
                "@modelcontextprotocol/server-sequential-thinking".to_string()
            ]
        );
    }

    #[test]
    fn git_preset_points_at_workdir() {
        let spec = ServerPreset::Git.spec(Path::new("/work/repo"));
        assert_eq!(
            spec.display_command(),
            "npx -y @modelcontextprotocol/server-git --repository /work/repo"
        );
    }

    #[test]
    fn filesystem_preset_grants_temp_and_workdir() {
        let spec = ServerPreset::Filesystem.spec(Path::new("/work"));
        assert_eq!(spec.args.len(), 4);
        assert_eq!(spec.args[3], "/work");
    }

    #[test]
    fn script_spec_chooses_interpreter_by_extension() {
        let python = ServerSpec::script("servers/thinking.py");
        assert_eq!(python.command, "python3");
        assert_eq!(python.args, vec!["servers/thinking.py".to_string()]);

        let node = ServerSpec::script("server.mjs");
        assert_eq!(node.command, "node");

        let binary = ServerSpec::script("./thinking-server");
        assert_eq!(binary.command, "./thinking-server");
        assert!(binary.args.is_empty());
    }

    #[test]
    fn presets_parse_from_kebab_case() {
        assert_eq!(
            ServerPreset::from_str("sequential-thinking").unwrap(),
            ServerPreset::SequentialThinking
        );
        assert_eq!(ServerPreset::Memory.to_string(), "memory");
        assert!(ServerPreset::from_str("weather").is_err());
    }

    #[test]
    fn builders_attach_env_and_cwd() {
        let spec = ServerSpec::new("node", vec!["server.js".into()])
            .with_env("DEBUG", "1")
            .with_cwd("/srv");
        assert_eq!(spec.env.get("DEBUG").map(String::as_str), Some("1"));
        assert_eq!(spec.cwd.as_deref(), Some(Path::new("/srv")));
    }
}
