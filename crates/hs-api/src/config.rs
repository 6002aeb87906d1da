//! API server configuration.

use std::path::PathBuf;

/// Top-level server configuration, loaded from `HINDSIGHT_*` environment
/// variables with local-only defaults.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Listen address.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// Override for the crash report directories (colon-separated paths).
    pub crash_dirs: Option<Vec<PathBuf>>,
    /// Override for the package log directories (colon-separated paths).
    pub package_dirs: Option<Vec<PathBuf>>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const DEFAULT_PORT: u16 = 5000;

impl ApiConfig {
    /// Load config from environment variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HINDSIGHT_HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("HINDSIGHT_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        Self {
            host,
            port,
            crash_dirs: dir_list("HINDSIGHT_CRASH_DIRS"),
            package_dirs: dir_list("HINDSIGHT_PACKAGE_DIRS"),
        }
    }
}

fn dir_list(var: &str) -> Option<Vec<PathBuf>> {
    let value = std::env::var(var).ok()?;
    let dirs: Vec<PathBuf> = value
        .split(':')
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect();
    (!dirs.is_empty()).then_some(dirs)
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: DEFAULT_PORT,
            crash_dirs: None,
            package_dirs: None,
        }
    }
}
