//! Notepad configuration.
//!
//! Loaded from `~/.config/notepad/config.ron`. Every field has a default,
//! so a missing file or a partial one is fine:
//!
//! ```ron
//! (
//!     base_url: "https://notes.example/",
//!     autosave_delay_ms: 500,
//! )
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::auth::CredentialPolicy;
use crate::constants;

/// Errors loading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("RON serialize error: {0}")]
    Serialize(#[from] ron::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotepadConfig {
    /// Share links are built on this URL.
    pub base_url: String,
    /// Local cache key for the link notepad.
    pub storage_key: String,
    pub autosave_delay_ms: u64,
    pub autosync_period_ms: u64,
    pub notification_ms: u64,
    pub min_username_len: usize,
    pub min_password_len: usize,
    /// Defaults to the platform data dir.
    pub cache_dir: Option<PathBuf>,
    /// SQLite file standing in for the remote store.
    pub db_path: Option<PathBuf>,
}

impl Default for NotepadConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            storage_key: constants::STORAGE_KEY.to_string(),
            autosave_delay_ms: constants::AUTOSAVE_DELAY.as_millis() as u64,
            autosync_period_ms: constants::AUTOSYNC_PERIOD.as_millis() as u64,
            notification_ms: constants::NOTIFICATION_DISMISS.as_millis() as u64,
            min_username_len: constants::MIN_USERNAME_LEN,
            min_password_len: constants::MIN_PASSWORD_LEN,
            cache_dir: None,
            db_path: None,
        }
    }
}

impl NotepadConfig {
    /// `~/.config/notepad/config.ron`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("notepad").join("config.ron"))
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                debug!(path = %path.display(), "loaded config");
                Self::from_ron(&text)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from `path` if given, else from [`default_path`](Self::default_path).
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => Self::load(&p),
            None => Ok(Self::default()),
        }
    }

    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub fn autosync_period(&self) -> Duration {
        Duration::from_millis(self.autosync_period_ms)
    }

    pub fn notification_dismiss(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }

    pub fn credential_policy(&self) -> CredentialPolicy {
        CredentialPolicy {
            min_username_len: self.min_username_len,
            min_password_len: self.min_password_len,
        }
    }

    /// Where the link notepad's file cache lives.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("cache"))
    }

    /// Where the synced notepad's SQLite store lives.
    pub fn db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| data_dir().join("notes.db"))
    }
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("notepad")
}
