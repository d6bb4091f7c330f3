//! Blocking command execution with fully buffered output
//!
//! [`output`] runs a command to completion and returns its captured stdout
//! and stderr alongside the terminal status. Checks use this to shell out to
//! node tooling without managing pipes themselves.

use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::context::ExecContext;
use super::executor::status_to_result;
use crate::error::ExecError;

/// Timeout applied when no execution context is supplied.
pub const DEFAULT_OUTPUT_TIMEOUT: Duration = Duration::from_secs(10);

/// Buffered result of a one-shot command run.
///
/// Produced once per call; there is no partial or streaming access. The
/// buffers are populated whenever the process actually ran, including
/// non-zero exits and context kills.
#[derive(Debug)]
pub struct CommandOutput {
    /// Captured stdout bytes
    pub stdout: Vec<u8>,
    /// Captured stderr bytes
    pub stderr: Vec<u8>,
    /// Terminal status: `None` means the command exited 0. Inspect the error
    /// with [`ExecError::exit_code`] to recover a non-zero exit code.
    pub status: Option<ExecError>,
}

impl CommandOutput {
    /// Whether the command exited 0.
    pub fn success(&self) -> bool {
        self.status.is_none()
    }

    /// The non-zero exit code, if that is how the command ended.
    pub fn exit_code(&self) -> Option<i32> {
        self.status.as_ref().and_then(ExecError::exit_code)
    }
}

/// Run `command` (name plus argument list) to completion and capture its
/// output.
///
/// With no context supplied, a default 10 second timeout applies. A non-zero
/// `timeout` narrows any context deadline; zero is ignored. The call blocks
/// the invoking task for the child's full, deadline-bounded run.
///
/// # Errors
/// * `ExecError::EmptyCommand` - if `command` is empty; nothing is spawned
/// * `ExecError::Spawn` - if process creation fails
/// * `ExecError::Copy` - if draining the output pipes fails
///
/// Runtime outcomes (non-zero exit, deadline, cancellation) are not errors
/// of this function; they come back in [`CommandOutput::status`] together
/// with whatever output was captured.
pub async fn output(
    ctx: Option<&ExecContext>,
    timeout: Option<Duration>,
    command: &[&str],
) -> Result<CommandOutput, ExecError> {
    let (program, args) = match command.split_first() {
        Some((program, args)) => (*program, args),
        None => return Err(ExecError::EmptyCommand),
    };

    let ctx = match ctx {
        Some(ctx) => ctx.clone(),
        None => ExecContext::with_timeout(DEFAULT_OUTPUT_TIMEOUT)?,
    };
    let ctx = match timeout {
        Some(t) if !t.is_zero() => ctx.narrowed(t)?,
        _ => ctx,
    };

    let command_str = command.join(" ");
    tracing::debug!("executing: {}", command_str);

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| ExecError::Spawn {
        command: command_str,
        source: e,
    })?;

    // Both pipes are drained to EOF concurrently with the wait so a child
    // filling one of them can never deadlock against us.
    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_task = tokio::spawn(slurp(stdout_pipe));
    let stderr_task = tokio::spawn(slurp(stderr_pipe));

    let status = tokio::select! {
        biased;
        res = child.wait() => match res {
            Ok(exit) => status_to_result(exit),
            Err(e) => Err(ExecError::Io(e)),
        },
        err = ctx.done() => {
            let _ = child.start_kill();
            let _ = child.wait().await;
            Err(err)
        }
    };

    // The pipes hit EOF once the child is gone, so these joins complete.
    let stdout = stdout_task
        .await
        .map_err(|e| ExecError::Copy(std::io::Error::other(format!("stdout task failed: {}", e))))?
        .map_err(ExecError::Copy)?;
    let stderr = stderr_task
        .await
        .map_err(|e| ExecError::Copy(std::io::Error::other(format!("stderr task failed: {}", e))))?
        .map_err(ExecError::Copy)?;

    Ok(CommandOutput {
        stdout,
        stderr,
        status: status.err(),
    })
}

/// Read a pipe to EOF into an owned buffer.
async fn slurp<R>(pipe: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
