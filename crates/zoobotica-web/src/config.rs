//! Server configuration, read from `zoobotica.toml`.
//!
//! API keys are deliberately absent: they come from the environment only.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use zoobotica_core::error::{ConfigError, ZoobotError};
use zoobotica_llm::{ImageConfig, LlmConfig};
use zoobotica_render::RenderConfig;

pub const CONFIG_FILE: &str = "zoobotica.toml";
pub const CONFIG_VERSION: u32 = 1;

/// Zoobotica server configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_config_version")]
    pub config_version: u32,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Viewer assets. Defaults to the crate's `static/` directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_config_version() -> u32 { CONFIG_VERSION }
fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }
fn default_data_dir() -> PathBuf { PathBuf::from(".zoobotica") }

impl Default for Config {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            image: ImageConfig::default(),
            render: RenderConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load from `path`, or from `zoobotica.toml` in the current or parent
    /// directories. No file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config: {}", path.display()))?;
                Self::from_toml(&content)
                    .with_context(|| format!("Failed to parse config: {}", path.display()))?
            }
            None => Config::default(),
        };
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the server cannot run with.
    pub fn validate(&self) -> std::result::Result<(), ZoobotError> {
        if self.config_version != CONFIG_VERSION {
            return Err(ZoobotError::Config(ConfigError::UnsupportedVersion(
                self.config_version,
            )));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(ZoobotError::invalid_config(
                "render",
                format!("{}x{}", self.render.width, self.render.height),
                "canvas dimensions must be non-zero",
            ));
        }
        if !(0.0..=1.0).contains(&self.llm.top_p) {
            return Err(ZoobotError::invalid_config(
                "llm.top_p",
                self.llm.top_p.to_string(),
                "must be within [0, 1]",
            ));
        }
        Ok(())
    }

    /// Default config as TOML.
    pub fn default_toml() -> Result<String> {
        toml::to_string_pretty(&Config::default()).context("Failed to serialize config")
    }
}

/// Find zoobotica.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}
