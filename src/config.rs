//! Configuration file support
//!
//! Loads settings from ~/.colorcode.toml (or %USERPROFILE%\.colorcode.toml on Windows)
//!
//! Example:
//! ```text
//! # colorcode configuration
//! dictionary = "/home/me/colorcoding_data.json"
//! skip_cloze = false
//!
//! [options]
//! whole_words = true
//! case_insensitive = true
//! bold = true
//! italic = false
//! bold_plurals = true
//! colorize = true
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::ColoringOptions;
use crate::error::{ColorCodeError, Result};

const HEADER: &str = "# colorcode configuration\n# Generated automatically\n\n";

/// Configuration settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Term dictionary used when no --dict is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary: Option<PathBuf>,
    /// Leave cloze notes alone in batch runs
    pub skip_cloze: bool,
    /// Matching and style switches
    pub options: ColoringOptions,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".colorcode.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".colorcode.toml"))
        }
    }

    /// Load configuration from the default location
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save current configuration to the default location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(ColorCodeError::NoConfigPath)?;
        self.save_to(&path)
    }

    /// Save current configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let body = toml::to_string_pretty(self)?;
        fs::write(path, format!("{}{}", HEADER, body))?;
        Ok(())
    }
}
