use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use nobook::EncoderConfig;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "nobook.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file at {}: {source}", .config_path.display())]
    Read {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file at {}: {source}", .config_path.display())]
    Parse {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// How blocks without a usable name are named on save.
    pub naming: EncoderConfig,
}

impl Config {
    pub fn load_from_path(config_path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            config_path: config_path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, otherwise `nobook.toml` in the working
    /// directory if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            log::debug!("using {}", default_path.display());
            Self::load_from_path(default_path)
        } else {
            Ok(Config::default())
        }
    }
}
