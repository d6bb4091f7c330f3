//! clustercheck - Cluster Health Check CLI
//!
//! Runs diagnostic checks against a cluster node and reports health through
//! exit codes. The foundation is a small process-execution layer:
//!
//! - [`exec::spawn`] - non-blocking execution with a combined stdout/stderr
//!   stream and a single-fire completion signal
//! - [`exec::output`] - blocking execution returning fully buffered output
//!
//! Both support cooperative cancellation and deadlines via
//! [`exec::ExecContext`]. Checks implement the [`check::Check`] trait and are
//! driven by [`check::run_check`].

pub mod check;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;

pub use check::{builtin_checks, Check, CheckInfo, CheckOutcome, ClusterVersionCheck};
pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::{CheckError, ExecError};
pub use exec::{output, spawn, CommandOutput, ExecContext, ExecHandle, ExecStatus};
