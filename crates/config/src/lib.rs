// Slingshot Launcher
// Copyright 2023-2026 The Slingshot contributors. All rights reserved.
// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use log::{debug, error, info};
use serde::{Deserialize, Serialize};

pub mod download;
pub mod error;
pub mod launch;

use download::DownloadConfig;
use error::*;
use launch::LaunchConfig;

/// The launcher configuration document, stored as a TOML file in the
/// working directory.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub launch: LaunchConfig,
}

/// Reads the configuration file from disk.
///
/// If the file does not exist or cannot be parsed, a default configuration
/// is generated and saved in its place.
pub fn load_config_file(config_file_path: &Path) -> Result<Config> {
    if !config_file_path.exists() {
        info!("No config file, using default config");
        return reset_config(config_file_path);
    }
    let data = match std::fs::read_to_string(config_file_path) {
        Ok(x) => x,
        Err(_) => {
            error!("Could not read config file, reset it");
            return reset_config(config_file_path);
        }
    };
    if let Ok(config) = toml::from_str::<Config>(&data) {
        info!("Loaded config from file");
        Ok(config)
    } else {
        error!("Config file is not a toml file, reset it");
        reset_config(config_file_path)
    }
}

pub fn reset_config(config_file_path: &Path) -> Result<Config> {
    let default_config = Config::default();
    let data = toml::to_string_pretty(&default_config)?;
    std::fs::write(config_file_path, data)?;
    Ok(default_config)
}

/// Saves the current configuration to the configuration file.
pub fn save_config(config: &Config, config_file_path: &Path) -> Result<()> {
    let data = toml::to_string_pretty(config)?;
    std::fs::write(config_file_path, data)?;
    debug!("Saved config to file");
    Ok(())
}
