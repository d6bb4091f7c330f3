//! CLI module for clustercheck
//!
//! Provides command-line interface with the following subcommands:
//! - `cluster-version` - Run the cluster version check
//! - `list` - List registered checks

pub mod commands;

pub use commands::{Cli, Commands};
