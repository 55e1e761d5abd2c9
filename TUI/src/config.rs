/// Application configuration and constants.
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Pause between "Analyzing Vibe..." and revealing the result.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(800);

/// Pause before the confidence gauge fills, so the bar animates in.
pub const DEFAULT_CONFIDENCE_DELAY: Duration = Duration::from_millis(100);

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the vibe server
    pub server_url: String,

    /// Main loop tick rate in milliseconds (target 60 FPS = ~16ms)
    pub tick_rate_ms: u64,

    /// How many ticks to show status messages (180 = ~3s at 60fps)
    pub status_timeout_ticks: u64,

    pub reveal_delay_ms: u64,
    pub confidence_delay_ms: u64,

    /// Fallback filter when RUST_LOG is unset
    pub log_level: String,

    /// Log destination; the terminal is owned by the UI
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            tick_rate_ms: 16,
            status_timeout_ticks: 180,
            reveal_delay_ms: DEFAULT_REVEAL_DELAY.as_millis() as u64,
            confidence_delay_ms: DEFAULT_CONFIDENCE_DELAY.as_millis() as u64,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location if a file
    /// exists there. Missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vibecheck").join("config.toml"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join("vibecheck")
                .join("vibecheck.log")
        })
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn pacing(&self) -> Pacing {
        Pacing {
            reveal: Duration::from_millis(self.reveal_delay_ms),
            confidence: Duration::from_millis(self.confidence_delay_ms),
        }
    }
}

/// Cosmetic delays of the analyze reveal. Presentation only; never a
/// protocol wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub reveal: Duration,
    pub confidence: Duration,
}

impl Pacing {
    #[cfg(test)]
    pub fn immediate() -> Self {
        Self {
            reveal: Duration::ZERO,
            confidence: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            reveal: DEFAULT_REVEAL_DELAY,
            confidence: DEFAULT_CONFIDENCE_DELAY,
        }
    }
}

/// Commands shown by /help
pub const COMMANDS: &[(&str, &str)] = &[
    ("/analyze", "Switch to the Analyze tab"),
    ("/recommend", "Switch to the Recommend tab"),
    ("/reset", "Analyze another meme"),
    ("/open", "Open the n-th meme in the browser"),
    ("/copy", "Copy detected text"),
    ("/health", "Check the server"),
    ("/help", "Show available commands"),
    ("/quit", "Exit vibecheck"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.pacing(), Pacing::default());
        assert_eq!(config.tick_rate(), Duration::from_millis(16));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            server_url = "http://memes.local:8080"
            reveal_delay_ms = 0
            "#,
        )
        .unwrap();

        assert_eq!(config.server_url, "http://memes.local:8080");
        assert_eq!(config.pacing().reveal, Duration::ZERO);
        assert_eq!(config.pacing().confidence, DEFAULT_CONFIDENCE_DELAY);
        assert_eq!(config.status_timeout_ticks, 180);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml("tick_rate_ms = \"fast\"").is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
