//! Configuration model for clustercheck

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Default settings applied to all checks
    #[serde(default)]
    pub defaults: Defaults,

    /// Facts about the node this binary runs on
    #[serde(default)]
    pub cluster: ClusterConfig,
}

impl Config {
    /// The per-check timeout as a duration.
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.defaults.check_timeout)
    }
}

/// Default settings applied to all checks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    /// Timeout in seconds applied to each check run
    #[serde(default = "default_check_timeout")]
    pub check_timeout: u64,
}

fn default_check_timeout() -> u64 {
    10
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            check_timeout: default_check_timeout(),
        }
    }
}

/// Per-node cluster facts
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ClusterConfig {
    /// Role of this node in the cluster
    #[serde(default)]
    pub role: NodeRole,

    /// Detected IP address of this node, if known
    #[serde(default)]
    pub node_ip_address: Option<String>,
}

/// Role of a node in the cluster
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    #[default]
    Master,
    Agent,
}

impl std::fmt::Display for NodeRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRole::Master => write!(f, "master"),
            NodeRole::Agent => write!(f, "agent"),
        }
    }
}
