use std::{fs, io, sync::Arc};

use contactx_lib::fs::config_dir;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::theme::Theme;

mod theme;

const CURRENT_CONFIG_VERSION: u16 = 1;
const FILE_NAME: &str = "gui.toml";

/// Handle to the frontend's configuration
pub type Cfg = Arc<RwLock<GuiConfig>>;

/// The frontend's configuration, serialized to TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub version: u16,
    pub theme: Theme,
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            version: CURRENT_CONFIG_VERSION,
            theme: Theme::default(),
        }
    }
}

impl GuiConfig {
    /// Load the configuration, falling back to the defaults if it is missing or unreadable.
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Using default GUI configuration: {e}");
                Self::default()
            }
        }
    }

    fn try_load() -> io::Result<Self> {
        let path = config_dir()?.join(FILE_NAME);

        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents).unwrap_or_default())
        } else {
            let cfg = Self::default();
            cfg.save()?;
            Ok(cfg)
        }
    }

    pub fn save(&self) -> io::Result<()> {
        let contents = toml::to_string_pretty(self).map_err(io::Error::other)?;

        fs::write(config_dir()?.join(FILE_NAME), contents)
    }

    pub fn theme(&self) -> iced::Theme {
        (&self.theme).into()
    }
}
