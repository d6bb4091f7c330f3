//! Error types for clustercheck
//!
//! Process-execution outcomes and check-level failures are kept as separate
//! enums: `ExecError` doubles as the terminal status of a spawned command, so
//! its runtime variants (non-zero exit, deadline, cancellation) are expected
//! outcomes rather than faults.

use thiserror::Error;

/// Terminal status and failure type for process execution.
#[derive(Debug, Error)]
pub enum ExecError {
    /// A zero timeout was supplied where a positive duration is required
    #[error("timeout cannot be negative or empty")]
    InvalidTimeout,

    /// The command list carried no command name
    #[error("unable to execute a command with an empty command list")]
    EmptyCommand,

    /// Process creation failed (e.g. executable not found)
    #[error("unable to run command '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The command exited with a non-zero status
    #[error("command exited with status {code}")]
    Exit { code: i32 },

    /// The command was terminated by a signal before exiting
    #[error("command terminated by signal")]
    Signaled,

    /// The execution context's deadline elapsed and the command was killed
    #[error("context deadline exceeded")]
    DeadlineExceeded,

    /// The execution context was canceled and the command was killed
    #[error("context canceled")]
    Canceled,

    /// Draining captured output failed
    #[error("unable to copy command output: {0}")]
    Copy(#[source] std::io::Error),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ExecError {
    /// Recover the child's exit code, if this error carries one.
    ///
    /// This is the only way the exit code is surfaced; neither runner exposes
    /// a numeric status field of its own.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Exit { code } => Some(*code),
            _ => None,
        }
    }
}

/// Main error type for check operations
#[derive(Debug, Error)]
pub enum CheckError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Command execution failed
    #[error("command execution failed: {0}")]
    Exec(#[from] ExecError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
