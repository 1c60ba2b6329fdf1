//! Runtime configuration.

use crate::api::DEFAULT_BASE_URL;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Where the OAuth redirect is expected to land by default.
pub const DEFAULT_CALLBACK_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::LOCALHOST),
    5173,
);

const APP_DIR: &str = "yt-dashboard";
const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root of the backend's REST API, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,
    /// Address the local redirect listener binds to during `login`.
    pub callback_addr: SocketAddr,
    /// Directory holding the persisted session.
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            callback_addr: DEFAULT_CALLBACK_ADDR,
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// The file backing [`FileStorage`](crate::storage::FileStorage).
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(STORAGE_FILE)
    }
}

/// The platform data directory (e.g. `~/.local/share/yt-dashboard`).
///
/// Falls back to a directory relative to the working directory when the platform has no
/// notion of one.
pub fn default_data_dir() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join(APP_DIR),
        None => {
            tracing::warn!("no platform data directory, using ./.{APP_DIR}");
            PathBuf::from(format!(".{APP_DIR}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "http://localhost:5000/api");
        assert_eq!(config.callback_addr.to_string(), "127.0.0.1:5173");
        assert!(config.data_dir.ends_with("yt-dashboard"));
        assert_eq!(
            config.storage_path(),
            config.data_dir.join("storage.json")
        );
    }
}
