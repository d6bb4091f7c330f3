//! Check runner
//!
//! Executes a single check under the configured timeout and reports its
//! outcome: output goes to stdout, the exit code is handed back for the
//! process to mirror.

use super::{Check, CheckResult};
use crate::config::Config;
use crate::exec::ExecContext;

/// Run `check` and return the exit code the process should adopt.
///
/// The check gets an execution context carrying the configured check
/// timeout, so anything it spawns is bounded. Non-empty output is printed to
/// stdout as-is.
///
/// # Errors
/// * `CheckError::Exec` - if the configured timeout is invalid
/// * any error the check itself raises
pub async fn run_check<C: Check>(check: &C, config: &Config) -> CheckResult<i32> {
    let ctx = ExecContext::with_timeout(config.check_timeout())?;

    tracing::info!(check = check.id(), "running check");
    let outcome = check.run(&ctx, config).await?;
    tracing::debug!(
        check = check.id(),
        exit_code = outcome.exit_code,
        "check finished"
    );

    if !outcome.output.is_empty() {
        println!("{}", outcome.output);
    }

    Ok(outcome.exit_code)
}
