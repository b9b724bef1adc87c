use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::infra::catalog::DEFAULT_API_BASE;

pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    api_base: Option<String>,
    debounce_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: String,
    pub debounce: Duration,
}

pub fn load() -> Result<Config> {
    let file = read_config_file(&get_config_path())?;
    resolve(
        file,
        env::var("SHOW_BROWSER_API_BASE").ok(),
        env::var("SHOW_BROWSER_DEBOUNCE_MS").ok(),
    )
}

fn resolve(
    file: ConfigFile,
    api_base_env: Option<String>,
    debounce_env: Option<String>,
) -> Result<Config> {
    // Environment variables win over the config file, the file over defaults.
    let api_base = api_base_env
        .or(file.api_base)
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    let debounce_ms = match debounce_env {
        Some(raw) => raw
            .trim()
            .parse()
            .context("SHOW_BROWSER_DEBOUNCE_MS is not a number")?,
        None => file.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS),
    };

    Ok(Config {
        api_base: api_base.trim_end_matches('/').to_string(),
        debounce: Duration::from_millis(debounce_ms),
    })
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::default());
    }
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).with_context(|| format!("Invalid config file at {}", path.display()))
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("show-browser"))
        // If the standard path could not be found (e.g. `$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}
