//! Application configuration

use crate::{Error, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub version: String,
    pub log_level: String,
    /// Overrides the platform data directory
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    /// chrono format string used for the Date column
    pub date_format: String,
    /// Where `export` writes files when no directory is given
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(Error::Validation(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            )));
        }

        if let Some(ref dir) = self.data_dir {
            if dir.as_os_str().is_empty() {
                return Err(Error::Validation("Data directory cannot be empty".to_string()));
            }
        }

        self.export.validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            log_level: "info".to_string(),
            data_dir: None,
            export: ExportConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn validate(&self) -> Result<()> {
        if self.date_format.trim().is_empty() {
            return Err(Error::Validation("Date format cannot be empty".to_string()));
        }

        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::Validation(format!(
                "Invalid date format '{}'",
                self.date_format
            )));
        }

        if let Some(ref dir) = self.output_dir {
            if dir.as_os_str().is_empty() {
                return Err(Error::Validation(
                    "Export directory cannot be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            date_format: "%m/%d/%Y".to_string(),
            output_dir: None,
        }
    }
}
