// SPDX-License-Identifier: MPL-2.0
//! This module handles the pipeline's configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use committed::config::{self, Config};
//! use committed::ui::theming::ThemeMode;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Persist the user's theme preference
//! config.theme_mode = Some(ThemeMode::Dark);
//! config::save(&config).expect("Failed to save config");
//! ```

mod defaults;

pub use defaults::*;

use crate::domain::diagnostics::BufferCapacity;
use crate::domain::notifications::ToastTimeout;
use crate::error::Result;
use crate::ui::theming::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "Committed";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub toast_timeout_secs: Option<u32>,
    #[serde(default)]
    pub theme_mode: Option<ThemeMode>,
    #[serde(default)]
    pub diagnostics_buffer_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            toast_timeout_secs: Some(DEFAULT_TOAST_TIMEOUT_SECS),
            theme_mode: Some(ThemeMode::System),
            diagnostics_buffer_capacity: None,
        }
    }
}

impl Config {
    /// Toast auto-dismiss timeout, clamped to the valid range.
    #[must_use]
    pub fn toast_timeout(&self) -> ToastTimeout {
        self.toast_timeout_secs
            .map(ToastTimeout::new)
            .unwrap_or_default()
    }

    /// Persisted theme preference; `System` when unset.
    #[must_use]
    pub fn theme_mode(&self) -> ThemeMode {
        self.theme_mode.unwrap_or_default()
    }

    #[must_use]
    pub fn diagnostics_capacity(&self) -> BufferCapacity {
        self.diagnostics_buffer_capacity
            .map(BufferCapacity::new)
            .unwrap_or_default()
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
