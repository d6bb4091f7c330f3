//! Diagnostic check module
//!
//! Defines the interface every cluster health check satisfies, the catalog
//! of built-in checks, and the runner that executes a check and reports its
//! outcome.

pub mod cluster_version;
pub mod runner;

use serde::Serialize;

use crate::config::Config;
use crate::error::CheckError;
use crate::exec::ExecContext;

pub use cluster_version::ClusterVersionCheck;
pub use runner::run_check;

/// Result type for check operations
pub type CheckResult<T> = Result<T, CheckError>;

/// What a check reports back: human-readable output plus an exit code for
/// the process to mirror (0 ok, non-zero degraded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Diagnostic output, empty when there is nothing to report
    pub output: String,
    /// Exit code the CLI propagates
    pub exit_code: i32,
}

impl CheckOutcome {
    /// A passing outcome with no output.
    pub fn clean() -> Self {
        Self {
            output: String::new(),
            exit_code: 0,
        }
    }

    /// An outcome with output and an explicit exit code.
    pub fn new(output: impl Into<String>, exit_code: i32) -> Self {
        Self {
            output: output.into(),
            exit_code,
        }
    }
}

/// Trait for cluster health checks
///
/// Each check exposes a stable identifier and a run contract taking the
/// execution context and resolved configuration.
#[allow(async_fn_in_trait)]
pub trait Check {
    /// Unique check identifier.
    fn id(&self) -> &str;

    /// Run the check.
    ///
    /// # Arguments
    /// * `ctx` - cancellation/deadline carrier for anything the check spawns
    /// * `config` - resolved configuration
    ///
    /// # Errors
    /// * `CheckError` - only for failures of the check machinery itself; an
    ///   unhealthy cluster is reported through the outcome's exit code
    async fn run(&self, ctx: &ExecContext, config: &Config) -> CheckResult<CheckOutcome>;
}

/// Catalog entry for a registered check
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CheckInfo {
    /// Check identifier
    pub id: String,
    /// Short description
    pub description: String,
}

/// The checks this binary knows how to run.
pub fn builtin_checks() -> Vec<CheckInfo> {
    vec![CheckInfo {
        id: cluster_version::CHECK_ID.to_string(),
        description: "Check all nodes on the cluster are no more than 2 versions".to_string(),
    }]
}
