use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::script::{ImportStyle, RenderOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read config file '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings shared by every window of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// How client modules are imported by generated scripts
    pub import_style: ImportStyle,
    /// Title used on first render when the application never set one
    pub default_title: String,
    /// Prefix of client module paths
    pub module_root: String,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            import_style: ImportStyle::default(),
            default_title: String::from("GazeUI"),
            module_root: String::from("."),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LogConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Log to this file instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: String::from("info"),
            file: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            import_style: self.import_style,
            module_root: self.module_root.clone(),
        }
    }
}
