//! Context configuration.
//!
//! Loaded once at startup, usually from a TOML file:
//!
//! ```toml
//! display_width = 1280
//! display_height = 720
//! index_format = "u16"
//! solid_texture = 0
//! ```
//!
//! Every field is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;
use strata_core::{IndexFormat, TextureId};
use thiserror::Error;

/// Errors raised while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or has wrongly typed fields.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for a [`Context`](crate::Context).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Initial root width in pixels.
    pub display_width: u32,
    /// Initial root height in pixels.
    pub display_height: u32,
    /// Index buffer width.
    pub index_format: IndexFormat,
    /// Texture bound for untextured quads.
    pub solid_texture: TextureId,
    /// Vertices pre-allocated for the draw list.
    pub vertex_capacity: usize,
    /// Indices pre-allocated for the draw list.
    pub index_capacity: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            display_width: 0,
            display_height: 0,
            index_format: IndexFormat::U32,
            solid_texture: TextureId::SOLID,
            vertex_capacity: 4096,
            index_capacity: 6144,
        }
    }
}

impl UiConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = UiConfig::from_toml_str("display_width = 800\nindex_format = \"u16\"").unwrap();

        assert_eq!(config.display_width, 800);
        assert_eq!(config.display_height, 0);
        assert_eq!(config.index_format, IndexFormat::U16);
        assert_eq!(config.solid_texture, TextureId::SOLID);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(UiConfig::from_toml_str("").unwrap(), UiConfig::default());
    }

    #[test]
    fn test_bad_config_is_an_error() {
        assert!(matches!(UiConfig::from_toml_str("index_format = \"u8\""), Err(ConfigError::Parse(_))));
        assert!(matches!(UiConfig::from_toml_str("display_width = \"wide\""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = std::env::temp_dir().join("strata_ui_missing_config_file.toml");
        assert!(matches!(UiConfig::load(path), Err(ConfigError::Io(_))));
    }
}
