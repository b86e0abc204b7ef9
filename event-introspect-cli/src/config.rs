//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use event_introspect::{ParserConfig, SessionPort, SESSION_PORT_ANY};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(rename = "input")]
    pub inputs: Vec<InputConfig>,
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// One introspection document and the provider it came from
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub file: PathBuf,
    #[serde(default = "default_bus_name")]
    pub bus_name: String,
    #[serde(default = "default_port")]
    pub port: SessionPort,
    #[serde(default = "default_path")]
    pub path: String,
}

pub fn default_bus_name() -> String {
    "local".to_string()
}

fn default_port() -> SessionPort {
    SESSION_PORT_ANY
}

pub fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub sessionless_only: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    if config.inputs.is_empty() {
        bail!("Config file {:?} lists no [[input]] entries", path);
    }

    // Input files are relative to the config file
    if let Some(base) = path.parent() {
        for input in &mut config.inputs {
            if input.file.is_relative() {
                input.file = base.join(&input.file);
            }
        }
    }

    Ok(config)
}
