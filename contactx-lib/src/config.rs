//! Core configuration shared by every ContactX frontend.

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use getset::Getters;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::fs::config_dir;

const CURRENT_CONFIG_VERSION: u16 = 1;
const FILE_NAME: &str = "core.toml";

/// Handle to the core configuration
pub type Cfg = Arc<RwLock<CoreConfig>>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to access configuration file: {0}")]
    Io(#[from] io::Error),
    #[error("Configuration file is malformed: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// The core configuration, serialized to TOML.
///
/// Relative paths are resolved against the working directory, so by default the
/// database and the placeholder image sit next to wherever ContactX is started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
#[getset(get = "pub")]
pub struct CoreConfig {
    version: u16,
    /// Database file holding every contact
    database_path: PathBuf,
    /// Image shown when a contact has no usable photo. Generated on first use.
    placeholder_path: PathBuf,
}

impl CoreConfig {
    /// Load the configuration from the user's config directory, writing the defaults out if
    /// no file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?.join(FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents)?)
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            debug!("Wrote default configuration to {}", path.display());
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        Ok(())
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_placeholder_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.placeholder_path = path.into();
        self
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            database_path: PathBuf::from("contacts.db"),
            placeholder_path: PathBuf::from("placeholder.png"),
        }
    }
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(FILE_NAME);

        let cfg = CoreConfig::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(cfg, CoreConfig::default());
        assert_eq!(cfg.database_path(), &PathBuf::from("contacts.db"));
    }

    #[test]
    fn test_load_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "database_path = \"/tmp/elsewhere.db\"\n").unwrap();

        let cfg = CoreConfig::load_from(&path).unwrap();

        assert_eq!(cfg.database_path(), &PathBuf::from("/tmp/elsewhere.db"));
        // Missing keys fall back to their defaults
        assert_eq!(cfg.placeholder_path(), &PathBuf::from("placeholder.png"));
    }

    #[test]
    fn test_load_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "database_path = [").unwrap();

        assert!(matches!(
            CoreConfig::load_from(&path),
            Err(Error::Parse(_))
        ));
    }
}
