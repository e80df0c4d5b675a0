//! Diagnostics for the locator binary.
//!
//! Resolution never fails loudly, so logs are the only trace of a degraded
//! lookup. They go to stderr; stdout carries results only.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::env::Environment;

const LOG_TARGET: &str = "go_test_locator";

/// Filter directives that replace the flag-derived level, in `EnvFilter` syntax.
pub const ENV_LOG_FILTER: &str = "GO_TEST_LOCATOR_LOG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        if quiet {
            return Self::Quiet;
        }
        match verbose {
            0 => Self::Normal,
            1 => Self::Verbose,
            2 => Self::Debug,
            _ => Self::Trace,
        }
    }

    fn level(self) -> Level {
        match self {
            Self::Quiet => Level::ERROR,
            Self::Normal => Level::WARN,
            Self::Verbose => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Trace => Level::TRACE,
        }
    }

    /// Only this crate's events; tool output is never echoed at any level.
    pub fn directives(self) -> String {
        format!("{LOG_TARGET}={}", self.level())
    }

    fn shows_source_location(self) -> bool {
        self >= Self::Debug
    }
}

/// `GO_TEST_LOCATOR_LOG` when set and non-blank, else the verbosity default.
pub fn filter_directives(verbosity: Verbosity, env: &dyn Environment) -> String {
    env.var(ENV_LOG_FILTER)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| verbosity.directives())
}

/// Install the global subscriber. Quiet discards everything, including the
/// filter override.
pub fn init(verbosity: Verbosity, env: &dyn Environment) {
    let directives = filter_directives(verbosity, env);
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("ignoring {ENV_LOG_FILTER}={directives}: {e}");
        EnvFilter::new(verbosity.directives())
    });

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_file(verbosity.shows_source_location())
        .with_line_number(verbosity.shows_source_location())
        .compact();

    match verbosity {
        Verbosity::Quiet => subscriber.with_writer(std::io::sink).init(),
        Verbosity::Normal => subscriber.without_time().init(),
        _ => subscriber.init(),
    }
}
