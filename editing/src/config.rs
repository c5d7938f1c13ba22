use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::EditError;
use crate::model::time::DEFAULT_TIMEBASE;

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(default)]
pub struct EditorConfig {
    /// Clock ticks per second, used when printing times.
    pub timebase: u64,
    /// Default `env_logger` filter; `RUST_LOG` still overrides it.
    pub log_level: String,
    /// Print the composition graph after the edited document.
    pub print_graph: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            timebase: DEFAULT_TIMEBASE,
            log_level: "info".to_string(),
            print_graph: true,
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, EditError> {
        let config: EditorConfig = toml::from_str(toml_str)?;
        if config.timebase == 0 {
            return Err(EditError::InvalidArgument(
                "timebase must be positive".to_string(),
            ));
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, EditError> {
        toml::to_string_pretty(self).map_err(|e| EditError::Runtime(e.to_string()))
    }
}

/// Reads the config at `path`. A missing path, unreadable file or invalid
/// content falls back to the defaults.
pub fn load_config(path: Option<&Path>) -> EditorConfig {
    if let Some(path) = path {
        match fs::read_to_string(path) {
            Ok(toml_str) => match EditorConfig::from_toml_str(&toml_str) {
                Ok(config) => return config,
                Err(e) => {
                    warn!("Failed to parse config file, using defaults: {}", e);
                }
            },
            Err(e) => {
                warn!("Failed to read config file, using defaults: {}", e);
            }
        }
    }
    EditorConfig::default()
}
