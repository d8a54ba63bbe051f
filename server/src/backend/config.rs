//! Server configuration.
//!
//! Values come from the environment (a `.env` file is loaded first by the
//! binary), falling back to defaults:
//!
//! | Variable | Default |
//! |---|---|
//! | `MEDICARE_DATA_DIR` | `{platform data dir}/MediCare Reminders`, else `./data` |
//! | `MEDICARE_BIND_ADDR` | `0.0.0.0:5000` |
//! | `MEDICARE_CORS_ORIGIN` | any origin |
//! | `MEDICARE_LOG` | `info` |

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DATA_DIR_VAR: &str = "MEDICARE_DATA_DIR";
pub const BIND_ADDR_VAR: &str = "MEDICARE_BIND_ADDR";
pub const CORS_ORIGIN_VAR: &str = "MEDICARE_CORS_ORIGIN";
pub const LOG_FILTER_VAR: &str = "MEDICARE_LOG";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_LOG_FILTER: &str = "info";
const DATA_DIR_NAME: &str = "MediCare Reminders";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_directory: PathBuf,
    pub bind_address: SocketAddr,
    /// Exact origin allowed by CORS; `None` allows any origin
    pub cors_origin: Option<String>,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory(),
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5000)),
            cors_origin: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from("data"))
}

impl AppConfig {
    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|value| value.trim().to_string()).filter(|value| !value.is_empty());

        let data_directory = get(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(default_data_directory);

        let bind_text = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_address = bind_text
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid {} '{}'", BIND_ADDR_VAR, bind_text))?;

        Ok(Self {
            data_directory,
            bind_address,
            cors_origin: get(CORS_ORIGIN_VAR),
            log_filter: get(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}
