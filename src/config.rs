use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{MealError, OnCorrupt, Result};

/// Application configuration settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Directory holding the persisted meal collection
    pub data_dir: PathBuf,

    /// Milliseconds between clock ticks
    pub tick_interval_ms: u64,

    /// Start from the seed meals when the saved collection is unreadable,
    /// instead of refusing to start
    pub recover_corrupt_state: bool,

    /// Ask before deleting a meal
    pub confirm_delete: bool,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".mealcheck"));

        Self {
            data_dir,
            tick_interval_ms: 1000,
            recover_corrupt_state: false,
            confirm_delete: true,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "mealcheck")
}

impl Config {
    /// Where the config file lives when no `--config` is given
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Loads the config from `path`, or from [`Config::default_path`] when
    /// `path` is `None`. A missing default file yields the defaults; a
    /// missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(MealError::ConfigError {
                    message: format!("Config file not found: {}", path.display()),
                });
            }
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        info!("Loading config from {}", path.display());
        let raw = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&raw).map_err(|e| MealError::ConfigError {
            message: format!("{}: {}", path.display(), e),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(MealError::ConfigError {
                message: "tick_interval_ms must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn on_corrupt(&self) -> OnCorrupt {
        if self.recover_corrupt_state {
            OnCorrupt::Reseed
        } else {
            OnCorrupt::Fail
        }
    }
}
