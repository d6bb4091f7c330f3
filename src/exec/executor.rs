//! Non-blocking process execution with a combined output stream
//!
//! `spawn` starts a command and hands back an [`ExecHandle`]: an
//! `AsyncRead` over the child's interleaved stdout/stderr bytes plus a
//! single-fire completion signal carrying the terminal status.
//!
//! Usage:
//! ```no_run
//! # use clustercheck::exec::{spawn, ExecContext};
//! # use std::time::Duration;
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = ExecContext::with_timeout(Duration::from_secs(3))?;
//! let mut handle = spawn(&ctx, "bash", &["infinite.sh"]);
//!
//! let mut output = Vec::new();
//! tokio::io::AsyncReadExt::read_to_end(&mut handle, &mut output).await?;
//! if let Err(e) = handle.wait().await {
//!     tracing::error!("{e}");
//! }
//! # Ok(())
//! # }
//! ```

use std::pin::Pin;
use std::process::Stdio;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, DuplexStream, ReadBuf};
use tokio::process::{ChildStderr, ChildStdout, Command};
use tokio::sync::oneshot;

use super::context::ExecContext;
use crate::error::ExecError;

/// Terminal status of a spawned command. `Ok(())` means exit code 0.
pub type ExecStatus = Result<(), ExecError>;

/// Capacity of the in-memory pipe carrying combined output. The child's
/// writes back-pressure against it once full.
const PIPE_CAPACITY: usize = 64 * 1024;

/// Read chunk size for forwarding each child pipe.
const READ_BUFFER_SIZE: usize = 8 * 1024;

/// Handle to a running child process.
///
/// Reading from the handle yields the child's stdout and stderr bytes in the
/// order the system delivers them; ordering is monotonic within each stream
/// but unspecified between them. The stream reaches EOF once the child's
/// output is fully forwarded, no later than natural completion.
///
/// Callers draining the stream with blocking reads are guaranteed to
/// unblock: the write side is always closed when the child-running task
/// finishes. The converse does not hold - a caller that never drains the
/// stream lets the pipe fill up, and the child's writes then block until it
/// is read. Drain the stream to avoid that deadlock.
pub struct ExecHandle {
    output: DuplexStream,
    /// Completion signal. Delivers the terminal status exactly once: `Ok(())`
    /// for exit code 0, otherwise the governing [`ExecError`].
    pub done: oneshot::Receiver<ExecStatus>,
}

impl ExecHandle {
    /// Await the terminal status.
    ///
    /// The status is produced exactly once; calling this again after it has
    /// resolved yields `ExecError::Canceled`.
    pub async fn wait(&mut self) -> ExecStatus {
        match (&mut self.done).await {
            Ok(status) => status,
            Err(_) => Err(ExecError::Canceled),
        }
    }

    /// Split the handle into its output stream and completion signal so they
    /// can be consumed concurrently.
    pub fn split(self) -> (DuplexStream, oneshot::Receiver<ExecStatus>) {
        (self.output, self.done)
    }
}

impl AsyncRead for ExecHandle {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.get_mut().output).poll_read(cx, buf)
    }
}

/// Spawn `command` with `args` and return a handle to the running process.
///
/// Spawning never blocks the caller; even process-creation failures are
/// delivered through the completion signal rather than returned here. The
/// argument list is passed to the process verbatim - no shell interpretation.
///
/// Timeout and cancellation are delegated entirely to `ctx`; a default
/// context imposes neither, and the command then runs until it exits. When
/// the context fires, the child is killed and the completion signal carries
/// `DeadlineExceeded` or `Canceled`.
///
/// Must be called from within a tokio runtime.
pub fn spawn(ctx: &ExecContext, command: &str, args: &[&str]) -> ExecHandle {
    let (reader, writer) = tokio::io::duplex(PIPE_CAPACITY);
    let (done_tx, done_rx) = oneshot::channel();
    let (run_tx, run_rx) = oneshot::channel();

    // Watcher: races the context against the child's natural status and
    // forwards whichever fires first. A status already available wins over a
    // simultaneous context firing.
    let watch_ctx = ctx.clone();
    tokio::spawn(async move {
        let status = tokio::select! {
            biased;
            run = run_rx => run.unwrap_or(Err(ExecError::Canceled)),
            err = watch_ctx.done() => Err(err),
        };
        let _ = done_tx.send(status);
    });

    let command_str = describe_command(command, args);
    let mut cmd = Command::new(command);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!("executing: {}", command_str);

    // Runner: drives the child to exit and reports its own view of the
    // status. If the watcher already resolved via the context, this send
    // lands nowhere, which is fine.
    let run_ctx = ctx.clone();
    tokio::spawn(async move {
        let status = run_child(cmd, command_str, writer, run_ctx).await;
        let _ = run_tx.send(status);
    });

    ExecHandle {
        output: reader,
        done: done_rx,
    }
}

/// Spawn the child, forward its output, and wait for it to finish. The
/// writer is dropped when forwarding ends, closing the combined stream.
async fn run_child(
    mut cmd: Command,
    command_str: String,
    writer: DuplexStream,
    ctx: ExecContext,
) -> ExecStatus {
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            // writer drops here, so the reader sees immediate EOF
            return Err(ExecError::Spawn {
                command: command_str,
                source: e,
            });
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let forward = tokio::spawn(forward_output(stdout, stderr, writer));

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

    // Ensure the output is fully forwarded and the stream closed before the
    // natural status is reported.
    let _ = forward.await;
    status
}

/// Merge both child pipes into the writer, preserving delivery order.
async fn forward_output(
    mut stdout: Option<ChildStdout>,
    mut stderr: Option<ChildStderr>,
    mut writer: DuplexStream,
) {
    let mut out_buf = [0u8; READ_BUFFER_SIZE];
    let mut err_buf = [0u8; READ_BUFFER_SIZE];

    while stdout.is_some() || stderr.is_some() {
        let (res, from_stdout) = tokio::select! {
            res = read_chunk(&mut stdout, &mut out_buf) => (res, true),
            res = read_chunk(&mut stderr, &mut err_buf) => (res, false),
        };

        match res {
            Ok(0) | Err(_) => {
                if from_stdout {
                    stdout = None;
                } else {
                    stderr = None;
                }
            }
            Ok(n) => {
                let chunk = if from_stdout {
                    &out_buf[..n]
                } else {
                    &err_buf[..n]
                };
                if writer.write_all(chunk).await.is_err() {
                    // reader side dropped, nothing left to forward to
                    break;
                }
            }
        }
    }
}

/// Read from a pipe that may already be exhausted; an exhausted side never
/// resolves, letting the other branch win the select.
async fn read_chunk<R>(pipe: &mut Option<R>, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    match pipe.as_mut() {
        Some(r) => r.read(buf).await,
        None => std::future::pending().await,
    }
}

/// Map an exit status onto the terminal result: exit 0 is `Ok(())`, any
/// other code is recoverable from the error.
pub(crate) fn status_to_result(status: std::process::ExitStatus) -> ExecStatus {
    if status.success() {
        return Ok(());
    }
    match status.code() {
        Some(code) => Err(ExecError::Exit { code }),
        None => Err(ExecError::Signaled),
    }
}

fn describe_command(command: &str, args: &[&str]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, args.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn test_spawn_success_combined_output() {
        let ctx = ExecContext::new();
        let mut handle = spawn(&ctx, "sh", &["-c", "echo out; echo err 1>&2"]);

        let mut output = Vec::new();
        handle
            .read_to_end(&mut output)
            .await
            .expect("stream should close");

        let text = String::from_utf8_lossy(&output);
        assert!(text.contains("out"));
        assert!(text.contains("err"));
        assert!(handle.wait().await.is_ok());
    }

    #[tokio::test]
    async fn test_spawn_nonzero_exit_code() {
        let ctx = ExecContext::new();
        let mut handle = spawn(&ctx, "sh", &["-c", "exit 3"]);

        let mut output = Vec::new();
        handle.read_to_end(&mut output).await.unwrap();

        let status = handle.wait().await;
        match status {
            Err(e) => assert_eq!(e.exit_code(), Some(3)),
            Ok(()) => panic!("expected non-zero exit"),
        }
    }

    #[tokio::test]
    async fn test_spawn_deadline_kills_process() {
        let ctx = ExecContext::with_timeout(Duration::from_secs(1)).unwrap();
        let mut handle = spawn(&ctx, "sleep", &["30"]);

        let start = Instant::now();
        let status = handle.wait().await;
        let elapsed = start.elapsed();

        assert!(matches!(status, Err(ExecError::DeadlineExceeded)));
        assert!(
            elapsed < Duration::from_secs(5),
            "deadline took too long: {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_spawn_cancellation_kills_process() {
        let ctx = ExecContext::new();
        let mut handle = spawn(&ctx, "sleep", &["30"]);

        let cancel_ctx = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel_ctx.cancel();
        });

        let status = handle.wait().await;
        assert!(matches!(status, Err(ExecError::Canceled)));
    }

    #[tokio::test]
    async fn test_spawn_error_on_completion_signal() {
        let ctx = ExecContext::new();
        let mut handle = spawn(&ctx, "nonexistent_command_12345", &[]);

        // The stream closes immediately on a failed spawn.
        let mut output = Vec::new();
        handle.read_to_end(&mut output).await.unwrap();
        assert!(output.is_empty());

        let status = handle.wait().await;
        assert!(matches!(status, Err(ExecError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_drain_and_wait() {
        let ctx = ExecContext::new();
        let handle = spawn(&ctx, "sh", &["-c", "echo hello; echo world 1>&2"]);
        let (mut output, done) = handle.split();

        let mut buf = Vec::new();
        let (read_res, status) = tokio::join!(output.read_to_end(&mut buf), done);

        read_res.unwrap();
        assert!(status.unwrap().is_ok());
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("hello"));
        assert!(text.contains("world"));
    }

    #[tokio::test]
    async fn test_small_output_readable_after_completion() {
        let ctx = ExecContext::new();
        let mut handle = spawn(&ctx, "echo", &["hello"]);

        // Output below the pipe capacity stays buffered past process exit.
        assert!(handle.wait().await.is_ok());

        let mut output = Vec::new();
        handle.read_to_end(&mut output).await.unwrap();
        assert_eq!(output, b"hello\n");
    }

    #[test]
    fn test_status_to_result_signal() {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            let status = std::process::ExitStatus::from_raw(9);
            assert!(matches!(
                status_to_result(status),
                Err(ExecError::Signaled)
            ));
        }
    }

    #[test]
    fn test_describe_command() {
        assert_eq!(describe_command("ls", &[]), "ls");
        assert_eq!(describe_command("ls", &["-l", "-a"]), "ls -l -a");
    }
}
