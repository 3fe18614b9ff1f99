//! Store configuration read from the environment.

use std::path::{Path, PathBuf};

use storage::sqlite::DEFAULT_STORAGE_KEY;
use thiserror::Error;

/// Environment variable holding the SQLite database URL or path.
pub const DB_URL_ENV: &str = "GRAMMAR_DB_URL";
/// Environment variable holding the key the bank blob is stored under.
pub const STORE_KEY_ENV: &str = "GRAMMAR_STORE_KEY";

const DEFAULT_DB_URL: &str = "sqlite://grammar.sqlite3";
const MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid sqlite url: {raw}")]
    InvalidDbUrl { raw: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Where and under which key the custom banks are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_url: String,
    pub storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_url: DEFAULT_DB_URL.to_owned(),
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }
}

impl StoreConfig {
    /// Reads `GRAMMAR_DB_URL` and `GRAMMAR_STORE_KEY`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`StoreConfig::from_env`] with an injectable variable source.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let db_url = non_blank(DB_URL_ENV)
            .map(normalize_sqlite_url)
            .unwrap_or_else(|| DEFAULT_DB_URL.to_owned());
        let storage_key = non_blank(STORE_KEY_ENV)
            .map(|key| key.trim().to_owned())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_owned());

        Self {
            db_url,
            storage_key,
        }
    }

    /// Creates the database file and its parent directories if missing.
    ///
    /// In-memory URLs are left alone.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidDbUrl` if the URL names no file path, or
    /// `ConfigError::Io` if the file cannot be created.
    pub fn prepare(&self) -> Result<(), ConfigError> {
        if is_memory_url(&self.db_url) {
            return Ok(());
        }

        let path = self
            .db_url
            .strip_prefix("sqlite://")
            .ok_or_else(|| ConfigError::InvalidDbUrl {
                raw: self.db_url.clone(),
            })?;
        let path = path.split('?').next().unwrap_or(path);
        if path.is_empty() {
            return Err(ConfigError::InvalidDbUrl {
                raw: self.db_url.clone(),
            });
        }

        let path = Path::new(path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        if !path.exists() {
            std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(false)
                .open(path)?;
        }
        Ok(())
    }
}

fn is_memory_url(url: &str) -> bool {
    url == MEMORY_URL || url.contains("mode=memory")
}

/// Turns a bare path or `sqlite:` path into an absolute `sqlite://` URL.
fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if is_memory_url(trimmed) || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}?mode=rwc", absolute.display())
}
