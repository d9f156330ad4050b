// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::schema::DB_FILE;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.rasid", "Rasid", "rasid"));

pub const LEGACY_FILE: &str = "legacy-storage.json";

pub const ENV_DATA_DIR: &str = "RASID_DATA_DIR";
pub const ENV_LOG: &str = "RASID_LOG";
pub const ENV_LOG_JSON: &str = "RASID_LOG_JSON";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_filter: String,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, falling back to the platform data dir.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        let data_dir = match lookup(ENV_DATA_DIR).filter(|s| !s.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir.trim()),
            None => ProjectDirs::from(APP.0, APP.1, APP.2)
                .context("Could not determine platform-specific data dir")?
                .data_dir()
                .to_path_buf(),
        };
        let log_filter = lookup(ENV_LOG)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "info".to_string());
        let log_json = lookup(ENV_LOG_JSON)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);
        Ok(Config {
            data_dir,
            log_filter,
            log_json,
        })
    }

    fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data dir {}", self.data_dir.display())
        })
    }

    pub fn db_path(&self) -> Result<PathBuf> {
        self.ensure_data_dir()?;
        Ok(self.data_dir.join(DB_FILE))
    }

    pub fn legacy_path(&self) -> PathBuf {
        self.data_dir.join(LEGACY_FILE)
    }
}

/// Installs the global tracing subscriber. Logs go to stderr so command
/// output on stdout stays clean.
pub fn init_logging(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_filter)
        .with_context(|| format!("Invalid log filter '{}'", config.log_filter))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    let installed = if config.log_json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}
