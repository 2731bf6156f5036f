use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use geosieve::source::Delimiter;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AnalyzeConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct InputConfig {
    pub delimiter: Delimiter,
    pub x_field: Option<String>,
    pub y_field: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: Option<PathBuf>,
    pub preview_rows: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            preview_rows: 5,
        }
    }
}

impl AnalyzeConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: AnalyzeConfig =
            toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
