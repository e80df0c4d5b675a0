use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::ResolverConfig;
use crate::locator;
use crate::location::TestLocator;
use crate::module_info::ModuleInfoResolver;
use crate::output::{render, PathOutput};
use crate::paths::relativize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "go-test-locator")]
#[command(about = "Resolve Go module info and find the files that declare tests", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (text, json)
    #[arg(short = 'f', long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Config file (YAML or JSON)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Abandon go/git calls after this many milliseconds
    #[arg(long, value_name = "MS", global = true)]
    pub timeout_ms: Option<u64>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the module path, module directory and checkout root
    ModuleInfo {
        /// Directory to resolve from (current directory if not specified)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Print the file declaring a test, or the package directory if none does
    Locate {
        /// Package directory to search
        #[arg(long, value_name = "DIR")]
        package_dir: PathBuf,

        /// Test name, subtests allowed (TestFoo/case)
        #[arg(long, value_name = "NAME")]
        test: String,

        /// Print the result relative to this directory
        #[arg(long, value_name = "DIR")]
        relative_to: Option<String>,
    },

    /// Print PATH relative to BASE with forward slashes
    Relativize {
        #[arg(long, value_name = "BASE")]
        base: String,

        path: String,
    },

    /// Resolve module info, then locate a test by package import path
    TestLocation {
        /// Directory to resolve module info from (current directory if not specified)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Package import path (example.com/m/pkg)
        #[arg(long, value_name = "IMPORT_PATH")]
        package: String,

        /// Test name, subtests allowed (TestFoo/case)
        #[arg(long, value_name = "NAME")]
        test: String,
    },
}

impl Args {
    pub fn validate(&self) -> Result<()> {
        if let Some(ref config_path) = self.config {
            if !config_path.exists() {
                anyhow::bail!("Config file does not exist: {}", config_path.display());
            }
        }
        if let Commands::Locate { ref test, .. } | Commands::TestLocation { ref test, .. } =
            self.command
        {
            if test.trim().is_empty() {
                anyhow::bail!("Test name must not be empty");
            }
        }
        Ok(())
    }

    /// Fold `--timeout-ms` into a loaded config.
    pub fn apply_overrides(&self, mut config: ResolverConfig) -> ResolverConfig {
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = Some(timeout_ms);
        }
        config
    }
}

/// Execute the parsed command and return its rendered output.
pub fn run(args: &Args, config: ResolverConfig) -> Result<String> {
    match &args.command {
        Commands::ModuleInfo { dir } => {
            let info = ModuleInfoResolver::new(config).resolve(dir_or_current(dir));
            render(&info, args.format)
        }
        Commands::Locate {
            package_dir,
            test,
            relative_to,
        } => {
            let file = locator::locate(package_dir, test);
            let file = file.to_string_lossy();
            let path = match relative_to {
                Some(base) => relativize(base, &file),
                None => file.into_owned(),
            };
            render(&PathOutput { path }, args.format)
        }
        Commands::Relativize { base, path } => {
            let path = relativize(base, path);
            render(&PathOutput { path }, args.format)
        }
        Commands::TestLocation { dir, package, test } => {
            let info = ModuleInfoResolver::new(config).resolve(dir_or_current(dir));
            let location = TestLocator::new(info).locate(package, test);
            render(&location, args.format)
        }
    }
}

fn dir_or_current(dir: &Option<PathBuf>) -> &Path {
    dir.as_deref().unwrap_or(Path::new(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    fn args(command: Commands) -> Args {
        Args {
            command,
            format: OutputFormat::Text,
            config: None,
            timeout_ms: None,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_parse_locate() {
        let args = Args::try_parse_from([
            "go-test-locator",
            "locate",
            "--package-dir",
            "pkg",
            "--test",
            "TestFoo/sub",
            "-f",
            "json",
        ])
        .unwrap();

        assert_eq!(args.format, OutputFormat::Json);
        match args.command {
            Commands::Locate {
                package_dir, test, ..
            } => {
                assert_eq!(package_dir, PathBuf::from("pkg"));
                assert_eq!(test, "TestFoo/sub");
            }
            other => panic!("expected locate, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_requires_subcommand() {
        assert!(Args::try_parse_from(["go-test-locator"]).is_err());
    }

    #[test]
    fn test_validate_missing_config() {
        let mut args = args(Commands::ModuleInfo { dir: None });
        args.config = Some(PathBuf::from("/nonexistent/locator.yaml"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validate_empty_test_name() {
        let args = args(Commands::Locate {
            package_dir: PathBuf::from("pkg"),
            test: "  ".to_string(),
            relative_to: None,
        });
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_apply_overrides_timeout() {
        let mut args = args(Commands::ModuleInfo { dir: None });
        args.timeout_ms = Some(250);
        let config = args.apply_overrides(ResolverConfig::default());
        assert_eq!(config.timeout_ms, Some(250));
    }

    #[test]
    fn test_run_relativize() {
        let args = args(Commands::Relativize {
            base: "/a".to_string(),
            path: "/a/b/c".to_string(),
        });
        assert_eq!(run(&args, ResolverConfig::default()).unwrap(), "b/c");
    }

    #[test]
    fn test_run_locate_relative() {
        let temp_dir = TempDir::new().unwrap();
        let pkg = temp_dir.path().join("pkg");
        fs::create_dir_all(&pkg).unwrap();
        fs::write(pkg.join("a_test.go"), "package pkg\n\nfunc TestFoo() {}\n").unwrap();

        let args = args(Commands::Locate {
            package_dir: pkg,
            test: "TestFoo/case".to_string(),
            relative_to: Some(temp_dir.path().to_string_lossy().into_owned()),
        });
        assert_eq!(
            run(&args, ResolverConfig::default()).unwrap(),
            "pkg/a_test.go"
        );
    }
}
