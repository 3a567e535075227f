use anyhow::{bail, Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::decode::Decoding;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ollama: OllamaConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OllamaConfig {
    /// Exported to the child as `OLLAMA_HOST`.
    pub host: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub decoding: Decoding,
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", "ai-cli")
        .context("could not determine config directory")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Loads the config from the platform config directory. A missing file (or
/// no resolvable config directory) means defaults.
pub fn load_default_config() -> Result<Config> {
    let path = match default_config_path() {
        Ok(path) => path,
        Err(e) => {
            debug!("{:#}; using default config", e);
            return Ok(Config::default());
        }
    };
    if !path.exists() {
        debug!("no config at {}; using defaults", path.display());
        return Ok(Config::default());
    }
    load_config(&path)
}

pub fn load_config(path: &Path) -> Result<Config> {
    debug!("loading config from {}", path.display());
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config at {}", path.display()))
}

pub fn parse_config(contents: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(contents).context("failed to parse config TOML")?;

    if let Some(host) = config.ollama.host.take() {
        let host = host.trim();
        if host.is_empty() {
            bail!("ollama.host must not be empty");
        }
        config.ollama.host = Some(host.to_string());
    }

    Ok(config)
}
