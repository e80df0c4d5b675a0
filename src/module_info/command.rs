use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::trace;

use crate::config::ToolCommand;
use crate::env::Environment;
use crate::error::ProcessError;

use super::deadline::Deadline;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Run `tool` with `extra_args` appended and return stdout followed by stderr.
///
/// An empty `dir` leaves the child in the current process directory. The
/// child sees exactly the variables `env` provides.
pub fn run_combined(
    tool: &ToolCommand,
    extra_args: &[&str],
    dir: &Path,
    env: &dyn Environment,
    deadline: &Deadline,
) -> Result<String, ProcessError> {
    let program = tool.program.as_str();

    if deadline.is_cancelled() {
        return Err(ProcessError::cancelled(program));
    }

    let mut command = Command::new(program);
    command
        .args(&tool.args)
        .args(extra_args)
        .env_clear()
        .envs(env.vars())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if !dir.as_os_str().is_empty() {
        command.current_dir(dir);
    }

    trace!(program, args = ?extra_args, dir = %dir.display(), "spawning tool");

    let started = Instant::now();
    let mut child = command
        .spawn()
        .map_err(|e| ProcessError::spawn_failed(program, e))?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = wait(&mut child, program, deadline, started)?;

    // Not reached on timeout: a grandchild may still hold the pipes open.
    let mut combined = stdout.join().unwrap_or_default();
    combined.extend(stderr.join().unwrap_or_default());
    let output = String::from_utf8_lossy(&combined).into_owned();

    trace!(program, %status, elapsed = ?started.elapsed(), "tool finished");

    if !status.success() {
        return Err(ProcessError::non_zero_exit(
            program,
            status.to_string(),
            output.trim(),
        ));
    }

    Ok(output)
}

fn drain<R: Read + Send + 'static>(stream: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut buf);
        }
        buf
    })
}

fn wait(
    child: &mut Child,
    program: &str,
    deadline: &Deadline,
    started: Instant,
) -> Result<ExitStatus, ProcessError> {
    if deadline.is_unbounded() {
        return child
            .wait()
            .map_err(|e| ProcessError::wait_failed(program, e));
    }

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {}
            Err(e) => {
                kill(child);
                return Err(ProcessError::wait_failed(program, e));
            }
        }

        if deadline.is_cancelled() {
            kill(child);
            return Err(ProcessError::cancelled(program));
        }

        if deadline.is_expired() {
            kill(child);
            return Err(ProcessError::timed_out(program, started.elapsed()));
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
