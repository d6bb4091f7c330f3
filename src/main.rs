//! clustercheck CLI entry point
//!
//! Usage:
//!   clustercheck cluster-version   Run the cluster version check
//!   clustercheck list              List registered checks

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use clustercheck::check::{builtin_checks, run_check, ClusterVersionCheck};
use clustercheck::cli::{
    commands::{ListArgs, OutputFormat},
    Cli, Commands,
};
use clustercheck::config::load_config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    clustercheck::logging::init(cli.verbose);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<u8> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::ClusterVersion => {
            let check = ClusterVersionCheck::default();
            let code = run_check(&check, &config).await?;
            Ok(clamp_exit_code(code))
        }
        Commands::List(args) => {
            list_checks(args)?;
            Ok(0)
        }
    }
}

/// List registered checks in the requested format
fn list_checks(args: ListArgs) -> Result<()> {
    let checks = builtin_checks();

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&checks)?;
            println!("{}", json);
        }
        OutputFormat::Plain => {
            for check in &checks {
                println!("{}", check.id);
            }
        }
        OutputFormat::Table => {
            let max_id_width = checks.iter().map(|c| c.id.len()).max().unwrap_or(10);

            for check in &checks {
                println!(
                    "  {:width$}  {}",
                    check.id.green(),
                    check.description,
                    width = max_id_width
                );
            }
        }
    }

    Ok(())
}

/// Clamp a check exit code into the range a process can actually report.
fn clamp_exit_code(code: i32) -> u8 {
    code.clamp(0, u8::MAX as i32) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_exit_code() {
        assert_eq!(clamp_exit_code(0), 0);
        assert_eq!(clamp_exit_code(2), 2);
        assert_eq!(clamp_exit_code(-1), 0);
        assert_eq!(clamp_exit_code(1000), 255);
    }
}
