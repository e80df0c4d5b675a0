use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::env::Environment;
use crate::error::ConfigError;

pub const GO_COMMAND: &str = "go";
pub const GIT_COMMAND: &str = "git";

pub const ENV_GO_COMMAND: &str = "GO_TEST_LOCATOR_GO";
pub const ENV_GIT_COMMAND: &str = "GO_TEST_LOCATOR_GIT";
pub const ENV_TIMEOUT_MS: &str = "GO_TEST_LOCATOR_TIMEOUT_MS";

/// A program plus leading arguments. The tool-specific arguments
/// (`list -f ...`, `rev-parse ...`) are appended after `args`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "ToolCommandRepr")]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ToolCommandRepr {
    Program(String),
    Full {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl From<ToolCommandRepr> for ToolCommand {
    fn from(repr: ToolCommandRepr) -> Self {
        match repr {
            ToolCommandRepr::Program(program) => ToolCommand::new(program),
            ToolCommandRepr::Full { program, args } => ToolCommand { program, args },
        }
    }
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    pub go_command: ToolCommand,
    pub git_command: ToolCommand,
    /// Upper bound for a whole resolution, both tool calls included.
    /// `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            go_command: ToolCommand::new(GO_COMMAND),
            git_command: ToolCommand::new(GIT_COMMAND),
            timeout_ms: None,
        }
    }
}

impl ResolverConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Load a config file, picking the format from its extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::read_error(path, e.to_string()))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string())),
            "json" => serde_json::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string())),
            other => Err(ConfigError::unsupported_format(other)),
        }
    }

    /// Apply `GO_TEST_LOCATOR_*` overrides on top of the current values.
    pub fn apply_env(mut self, env: &dyn Environment) -> Result<Self, ConfigError> {
        if let Some(go) = env.var(ENV_GO_COMMAND).filter(|v| !v.trim().is_empty()) {
            debug!(go = %go, "go command overridden from environment");
            self.go_command = ToolCommand::new(go.trim());
        }

        if let Some(git) = env.var(ENV_GIT_COMMAND).filter(|v| !v.trim().is_empty()) {
            debug!(git = %git, "git command overridden from environment");
            self.git_command = ToolCommand::new(git.trim());
        }

        if let Some(raw) = env.var(ENV_TIMEOUT_MS) {
            let timeout = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::invalid_value(ENV_TIMEOUT_MS, raw.clone()))?;
            self.timeout_ms = Some(timeout);
        }

        Ok(self)
    }

    /// Defaults, then the optional file, then environment overrides.
    pub fn load(path: Option<&Path>, env: &dyn Environment) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.apply_env(env)
    }
}
