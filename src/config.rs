use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Get the data directory for the application.
pub fn get_data_dir() -> PathBuf {
    if let Ok(s) = std::env::var("ATRIUM_WALLET_DATA") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("org", "atrium", "atrium-wallet") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

/// Get the config directory for the application.
pub fn get_config_dir() -> PathBuf {
    if let Ok(s) = std::env::var("ATRIUM_WALLET_CONFIG") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("org", "atrium", "atrium-wallet") {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
}

/// Tuning knobs for the history view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Rows per page; also the unit of incremental fetches.
    pub page_size: usize,
    /// Scroll mode keeps at most this many screen-pages of rows cached
    /// before old rows are trimmed off the head.
    pub eviction_pages: usize,
    /// Seconds between background refresh triggers.
    pub refresh_interval_secs: u64,
    /// In scroll mode, a fetch is triggered when the selection comes within
    /// this many rows of the loaded edge.
    pub near_edge_rows: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_size: 25,
            eviction_pages: 12,
            refresh_interval_secs: 8,
            near_edge_rows: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub history: HistoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::testnet()
    }
}

impl Config {
    /// Create config from CLI args.
    pub fn new(network: Option<&str>, rpc_url: Option<&str>) -> Self {
        let mut config = Self::from_network(network.unwrap_or("testnet"));
        if let Some(url) = rpc_url {
            config.network.rpc_url = url.to_string();
        }
        config
    }

    pub fn testnet() -> Self {
        Self {
            network: NetworkConfig {
                name: "testnet".to_string(),
                rpc_url: "https://testnet.atrium.org/rpc".to_string(),
            },
            history: HistoryConfig::default(),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            network: NetworkConfig {
                name: "mainnet".to_string(),
                rpc_url: "https://mainnet.atrium.org/rpc".to_string(),
            },
            history: HistoryConfig::default(),
        }
    }

    pub fn from_network(network: &str) -> Self {
        match network {
            "mainnet" => Self::mainnet(),
            _ => Self::testnet(),
        }
    }
}
