use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::diagram::layout::DEFAULT_LABEL_OFFSET;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_label_offset")]
    pub label_offset: f64,
    #[serde(default)]
    pub network: NetworkConfig,
}

/// Starting values of the walkthrough network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_inputs")]
    pub inputs: [f64; 2],
    #[serde(default = "default_weights")]
    pub weights: [f64; 8],
    #[serde(default = "default_targets")]
    pub targets: [f64; 2],
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_label_offset() -> f64 {
    DEFAULT_LABEL_OFFSET
}
fn default_inputs() -> [f64; 2] {
    [0.05, 0.10]
}
fn default_weights() -> [f64; 8] {
    [0.15, 0.20, 0.25, 0.30, 0.40, 0.45, 0.50, 0.55]
}
fn default_targets() -> [f64; 2] {
    [0.01, 0.99]
}
fn default_learning_rate() -> f64 {
    0.5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            label_offset: default_label_offset(),
            network: NetworkConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            inputs: default_inputs(),
            weights: default_weights(),
            targets: default_targets(),
            learning_rate: default_learning_rate(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes to the default location and returns where it went.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("nnwalk")
            .join("config.toml")
    }

    /// Every number must be finite so each step's arithmetic stays total.
    pub fn validate(&self) -> Result<()> {
        let net = &self.network;
        let all = net
            .inputs
            .iter()
            .chain(&net.weights)
            .chain(&net.targets)
            .chain([&net.learning_rate, &self.label_offset]);
        for value in all {
            if !value.is_finite() {
                bail!("config contains a non-finite number: {value}");
            }
        }
        if net.learning_rate <= 0.0 {
            bail!("learning_rate must be positive, got {}", net.learning_rate);
        }
        Ok(())
    }
}
