//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/recursive-hierarchy/hierarchy.toml`
//! 3. Explicit config file passed to [`Settings::load`]
//! 4. Environment variables: `HIERARCHY__*` (e.g. `HIERARCHY__FORMAT__WIDTH=3`)

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::{Entity, Hierarchy, PositionFormat};
use crate::errors::{config_err, Error, Result};

/// Unified configuration for hierarchies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// How position strings are composed
    pub format: PositionFormat,
}

/// Get the XDG config directory.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "recursive-hierarchy").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("hierarchy.toml"))
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional config file; it must exist when given
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("format.width", defaults.format.width as u64)
            .map_err(config_err)?
            .set_default("format.separator", defaults.format.separator.clone())
            .map_err(config_err)?;

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(path) = config_file {
            debug!(path = %path.display(), "loading config file");
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(Environment::with_prefix("HIERARCHY").separator("__"));

        let config = builder.build().map_err(config_err)?;
        let settings: Self = config.try_deserialize().map_err(config_err)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject formats that cannot produce distinguishable positions.
    pub fn validate(&self) -> Result<()> {
        if self.format.width == 0 {
            return Err(Error::Config {
                message: "format.width must be at least 1".to_string(),
            });
        }
        if self.format.separator.is_empty() {
            return Err(Error::Config {
                message: "format.separator must not be empty".to_string(),
            });
        }
        if self.format.separator.chars().any(|c| c.is_ascii_digit()) {
            return Err(Error::Config {
                message: format!(
                    "format.separator must not contain digits: {:?}",
                    self.format.separator
                ),
            });
        }
        Ok(())
    }

    /// Empty hierarchy using these settings.
    pub fn hierarchy<T: Entity>(&self) -> Hierarchy<T> {
        Hierarchy::with_format(self.format.clone())
    }
}
