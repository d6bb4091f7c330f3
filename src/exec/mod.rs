//! Process execution module
//!
//! Two ways to run an external command:
//! - [`spawn`] - non-blocking, yields an [`ExecHandle`] with a combined
//!   stdout/stderr stream and a single-fire completion signal
//! - [`output`] - blocking, returns fully buffered stdout and stderr
//!
//! Both take an [`ExecContext`] for cooperative cancellation and
//! deadline-based timeout.

pub mod context;
pub mod executor;
pub mod output;

pub use context::ExecContext;
pub use executor::{spawn, ExecHandle, ExecStatus};
pub use output::{output, CommandOutput, DEFAULT_OUTPUT_TIMEOUT};
