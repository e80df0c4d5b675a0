use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to start '{program}': {source}")]
    SpawnFailed {
        program: String,
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status}: {output}")]
    NonZeroExit {
        program: String,
        status: String,
        output: String,
    },

    #[error("'{program}' did not finish within {elapsed:?}")]
    TimedOut { program: String, elapsed: Duration },

    #[error("'{program}' was cancelled")]
    Cancelled { program: String },

    #[error("failed to wait for '{program}': {source}")]
    WaitFailed {
        program: String,
        source: std::io::Error,
    },

    #[error("unexpected output from '{program}': {output}")]
    UnexpectedOutput { program: String, output: String },
}

impl ProcessError {
    pub fn spawn_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::SpawnFailed {
            program: program.into(),
            source,
        }
    }

    pub fn non_zero_exit(
        program: impl Into<String>,
        status: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        Self::NonZeroExit {
            program: program.into(),
            status: status.into(),
            output: output.into(),
        }
    }

    pub fn timed_out(program: impl Into<String>, elapsed: Duration) -> Self {
        Self::TimedOut {
            program: program.into(),
            elapsed,
        }
    }

    pub fn cancelled(program: impl Into<String>) -> Self {
        Self::Cancelled {
            program: program.into(),
        }
    }

    pub fn wait_failed(program: impl Into<String>, source: std::io::Error) -> Self {
        Self::WaitFailed {
            program: program.into(),
            source,
        }
    }

    pub fn unexpected_output(program: impl Into<String>, output: impl Into<String>) -> Self {
        Self::UnexpectedOutput {
            program: program.into(),
            output: output.into(),
        }
    }
}
