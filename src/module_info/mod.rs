//! Module info resolution.
//!
//! Asks `go list` for the enclosing module's path and directory, then asks
//! `git` for the checkout root of that directory. Every failure degrades the
//! affected field to an empty string.

use serde::Serialize;
use std::path::Path;
use tracing::debug;

use crate::config::ResolverConfig;
use crate::env::{Environment, ProcessEnv};
use crate::error::ProcessError;

mod command;
mod deadline;

pub use command::run_combined;
pub use deadline::{CancelToken, Deadline};

pub const GO_LIST_MODULE_ARGS: &[&str] = &["list", "-f", "{{.Module.Path}};{{.Module.Dir}}"];
pub const GIT_TOPLEVEL_ARGS: &[&str] = &["rev-parse", "--show-toplevel"];

const MODULE_FIELD_SEPARATOR: char = ';';

/// Build context of the module under test. Empty fields mean "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleInfo {
    pub module_path: String,
    pub module_dir: String,
    pub root_dir: String,
}

impl ModuleInfo {
    pub fn is_empty(&self) -> bool {
        self.module_path.is_empty() && self.module_dir.is_empty() && self.root_dir.is_empty()
    }
}

pub struct ModuleInfoResolver {
    config: ResolverConfig,
    env: Box<dyn Environment>,
}

impl ModuleInfoResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_env(config, ProcessEnv)
    }

    pub fn with_env(config: ResolverConfig, env: impl Environment + 'static) -> Self {
        Self {
            config,
            env: Box::new(env),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve using the configured timeout, if any.
    pub fn resolve(&self, dir: &Path) -> ModuleInfo {
        self.resolve_until(dir, &Deadline::from_timeout(self.config.timeout()))
    }

    /// Resolve with both tool calls bounded by `deadline`.
    pub fn resolve_until(&self, dir: &Path, deadline: &Deadline) -> ModuleInfo {
        let mut info = ModuleInfo::default();

        match self.query_module(dir, deadline) {
            Ok((module_path, module_dir)) => {
                info.module_path = module_path;
                info.module_dir = module_dir;
            }
            Err(e) => {
                debug!(dir = %dir.display(), error = %e, "module query failed");
                return info;
            }
        }

        if info.module_dir.is_empty() {
            return info;
        }

        match self.query_root(Path::new(&info.module_dir), deadline) {
            Ok(root_dir) => info.root_dir = root_dir,
            Err(e) => debug!(module_dir = %info.module_dir, error = %e, "root query failed"),
        }

        info
    }

    fn query_module(
        &self,
        dir: &Path,
        deadline: &Deadline,
    ) -> Result<(String, String), ProcessError> {
        let tool = &self.config.go_command;
        let output = run_combined(tool, GO_LIST_MODULE_ARGS, dir, &*self.env, deadline)?;

        parse_module_output(&output)
            .ok_or_else(|| ProcessError::unexpected_output(&tool.program, output.trim()))
    }

    fn query_root(&self, module_dir: &Path, deadline: &Deadline) -> Result<String, ProcessError> {
        let output = run_combined(
            &self.config.git_command,
            GIT_TOPLEVEL_ARGS,
            module_dir,
            &*self.env,
            deadline,
        )?;
        Ok(output.trim().to_string())
    }
}

impl Default for ModuleInfoResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

/// Resolve with default tools and the real process environment.
pub fn resolve(dir: &Path) -> ModuleInfo {
    ModuleInfoResolver::default().resolve(dir)
}

/// Split `<module path>;<module dir>` output. Anything other than exactly two
/// parts is rejected.
pub fn parse_module_output(output: &str) -> Option<(String, String)> {
    let mut parts = output.split(MODULE_FIELD_SEPARATOR);
    let module_path = parts.next()?;
    let module_dir = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some((module_path.trim().to_string(), module_dir.trim().to_string()))
}
