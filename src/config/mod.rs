//! Configuration system for pathquill.
//!
//! This module provides the configuration structure for pathquill with sensible
//! defaults and support for serialization/deserialization via serde. Configuration
//! is loaded from a TOML file and overridden by command-line arguments.
//!
//! # Example
//!
//! ```
//! use pathquill::config::Config;
//!
//! // Use default configuration
//! let config = Config::default();
//! assert_eq!(config.indent_size, 2);
//! assert_eq!(config.output_format, "json");
//!
//! // Create custom configuration
//! let custom = Config {
//!     output_format: "yaml".to_string(),
//!     ..Config::default()
//! };
//! assert!(custom.sort_keys);
//! ```

use crate::document::serialize::SerializeOptions;
use serde::{Deserialize, Serialize};

/// Configuration for the pathquill command-line tool.
///
/// # Fields
///
/// * `indent_size` - Number of spaces per indentation level (default: 2)
/// * `output_format` - Output format when the target file does not imply one: "json" or "yaml" (default: "json")
/// * `create_backup` - Create .bak files before overwriting (default: false)
/// * `sort_keys` - Write object keys in sorted order (default: true)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Number of spaces per indentation level
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Output format: "json" or "yaml"
    #[serde(default = "default_output_format")]
    pub output_format: String,

    /// Create .bak files before overwriting
    #[serde(default)]
    pub create_backup: bool,

    /// Write object keys in sorted order
    #[serde(default = "default_sort_keys")]
    pub sort_keys: bool,
}

fn default_indent_size() -> usize {
    2
}

fn default_output_format() -> String {
    "json".to_string()
}

fn default_sort_keys() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_size: default_indent_size(),
            output_format: default_output_format(),
            create_backup: false,
            sort_keys: default_sort_keys(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/pathquill/config.toml` on all platforms.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("pathquill");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist or can't be read.
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Loads configuration from `path`, falling back to defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("ignoring invalid config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    pub fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            indent: self.indent_size,
            sort_keys: self.sort_keys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = toml::from_str("indent_size = 4").unwrap();
        assert_eq!(config.indent_size, 4);
        assert_eq!(config.output_format, "json");
        assert!(!config.create_backup);
        assert!(config.sort_keys);
    }

    #[test]
    fn test_serialize_options_follow_config() {
        let config = Config {
            indent_size: 3,
            sort_keys: false,
            ..Default::default()
        };
        assert_eq!(
            config.serialize_options(),
            SerializeOptions {
                indent: 3,
                sort_keys: false
            }
        );
    }
}
