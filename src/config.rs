//! Process configuration from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_ADDR: &str = "0.0.0.0:4673";
pub const DEFAULT_SETTINGS_PATH: &str = "imposter-settings.json";
pub const DEFAULT_REVEAL_DWELL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP/WebSocket server binds to
    pub addr: SocketAddr,
    /// How long a revealed role stays visible before auto-hiding
    pub reveal_dwell: Duration,
    /// Where settings and the player registry are persisted
    pub settings_path: PathBuf,
    /// Optional replacement for the built-in category lists
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            reveal_dwell: DEFAULT_REVEAL_DWELL,
            settings_path: PathBuf::from(DEFAULT_SETTINGS_PATH),
            catalog_path: None,
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 4673))
}

/// Read a variable, treating blank values as unset
fn env_trimmed(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let addr = match env_trimmed("IMPOSTER_ADDR") {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("Invalid IMPOSTER_ADDR '{}': {}. Using {}", raw, e, DEFAULT_ADDR);
                default_addr()
            }),
            None => default_addr(),
        };

        let reveal_dwell = env_trimmed("REVEAL_DWELL_MS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_REVEAL_DWELL);

        let settings_path = env_trimmed("SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

        let catalog_path = env_trimmed("CATALOG_PATH").map(PathBuf::from);

        Self {
            addr,
            reveal_dwell,
            settings_path,
            catalog_path,
        }
    }
}
