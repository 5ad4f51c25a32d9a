//! Configuration file parser for ~/.config/newsdesk/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as warnings, since they are
//! usually typos.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// How connectivity is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectivityMode {
    /// Periodic TCP reachability probe against `probe_addr`.
    Probe,
    /// Toggled by hand from the UI.
    Manual,
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upper bound on one fetch from the content source, in seconds. 0 disables it.
    pub fetch_timeout_secs: u64,

    /// Simulated latency of the fixture content source, in milliseconds.
    pub fixture_latency_ms: u64,

    /// Connectivity detection strategy.
    pub connectivity: ConnectivityMode,

    /// `host:port` probed when `connectivity = "probe"`.
    pub probe_addr: String,

    /// Seconds between reachability probes.
    pub probe_interval_secs: u64,

    /// Optional JSON file with the article set to serve instead of the built-in one.
    pub fixture_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            fixture_latency_ms: 1500,
            connectivity: ConnectivityMode::Probe,
            probe_addr: "1.1.1.1:53".to_string(),
            probe_interval_secs: 5,
            fixture_path: None,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "fetch_timeout_secs",
        "fixture_latency_ms",
        "connectivity",
        "probe_addr",
        "probe_interval_secs",
        "fixture_path",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            connectivity = ?config.connectivity,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn fixture_latency(&self) -> Duration {
        Duration::from_millis(self.fixture_latency_ms)
    }

    /// Probe interval, never shorter than one second.
    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.probe_interval_secs.max(1))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(name: &str, content: &str) -> (PathBuf, PathBuf) {
        let dir = std::env::temp_dir().join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.fixture_latency_ms, 1500);
        assert_eq!(config.connectivity, ConnectivityMode::Probe);
        assert_eq!(config.probe_addr, "1.1.1.1:53");
        assert!(config.fixture_path.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/newsdesk_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.fetch_timeout_secs, 10);
    }

    #[test]
    fn test_empty_file_returns_default() {
        let (dir, path) = write_config("newsdesk_config_test_empty", "  \n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.connectivity, ConnectivityMode::Probe);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let (dir, path) = write_config("newsdesk_config_test_partial", "connectivity = \"manual\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.connectivity, ConnectivityMode::Manual);
        assert_eq!(config.fixture_latency_ms, 1500);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
fetch_timeout_secs = 3
fixture_latency_ms = 0
connectivity = "probe"
probe_addr = "127.0.0.1:8080"
probe_interval_secs = 30
fixture_path = "/srv/news/articles.json"
"#;
        let (dir, path) = write_config("newsdesk_config_test_full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(3));
        assert_eq!(config.fixture_latency(), Duration::ZERO);
        assert_eq!(config.probe_addr, "127.0.0.1:8080");
        assert_eq!(config.probe_interval(), Duration::from_secs(30));
        assert_eq!(
            config.fixture_path.as_deref(),
            Some(Path::new("/srv/news/articles.json"))
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let (dir, path) = write_config(
            "newsdesk_config_test_unknown",
            "fetch_timeout_secs = 4\ntheme = \"dark\"\n",
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.fetch_timeout_secs, 4);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("newsdesk_config_test_invalid", "fetch_timeout_secs = [\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_connectivity_mode_returns_error() {
        let (dir, path) = write_config("newsdesk_config_test_mode", "connectivity = \"carrier-pigeon\"\n");
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_oversized_file_rejected() {
        let big = "# padding\n".repeat(110_000);
        let (dir, path) = write_config("newsdesk_config_test_large", &big);
        assert!(matches!(Config::load(&path), Err(ConfigError::TooLarge(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_probe_interval_floor() {
        let config = Config {
            probe_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.probe_interval(), Duration::from_secs(1));
    }
}
