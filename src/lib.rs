//! Go Test Locator
//!
//! Resolves the enclosing Go module (path, directory, git checkout root) and
//! maps test names to the `.go` files that declare them, so test reporters
//! can attach repository-relative file locations to results.

pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod location;
pub mod locator;
pub mod logging;
pub mod module_info;
pub mod output;
pub mod paths;

pub use env::{Environment, ProcessEnv, StaticEnv};
pub use location::{TestLocation, TestLocator};
pub use locator::{locate, LocateOutcome};
pub use module_info::{resolve, CancelToken, Deadline, ModuleInfo, ModuleInfoResolver};
pub use paths::relativize;
