// ABOUTME: Configuration management for the tfx application
// ABOUTME: Handles loading and merging configuration from files and environment variables

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::template::{Anchors, EngineOptions, DEFAULT_BUFFER_SIZE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub anchors: AnchorConfig,

    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    #[serde(default)]
    pub debug: bool,

    #[serde(default = "default_builtins")]
    pub builtins: bool,

    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

fn default_builtins() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anchors: AnchorConfig::default(),
            encoding: default_encoding(),
            buffer_size: default_buffer_size(),
            debug: false,
            builtins: default_builtins(),
            variables: BTreeMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        let anchors = Anchors::default();
        Self {
            left: anchors.left,
            right: anchors.right,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&contents)?
        } else {
            Config::default()
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        let possible_paths = [
            PathBuf::from("tfx.yaml"),
            PathBuf::from("tfx.yml"),
            PathBuf::from(".tfx.yaml"),
            PathBuf::from(".tfx.yml"),
        ];

        for path in &possible_paths {
            if path.exists() {
                return path.clone();
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".tfx").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        // Default path (may not exist)
        PathBuf::from("tfx.yaml")
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(left) = std::env::var("TFX_ANCHOR_LEFT") {
            self.anchors.left = left;
        }
        if let Ok(right) = std::env::var("TFX_ANCHOR_RIGHT") {
            self.anchors.right = right;
        }
        if let Ok(encoding) = std::env::var("TFX_ENCODING") {
            self.encoding = encoding;
        }
        if let Ok(buffer_size) = std::env::var("TFX_BUFFER_SIZE") {
            self.buffer_size = buffer_size.parse()?;
        }
        if let Ok(debug) = std::env::var("TFX_DEBUG") {
            self.debug = matches!(debug.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        // Logging configuration
        if let Ok(level) = std::env::var("TFX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("TFX_LOG_FORMAT") {
            self.logging.format = format;
        }

        Ok(())
    }

    /// Override the configured anchors, e.g. from command line flags
    pub fn override_anchors(&mut self, left: Option<String>, right: Option<String>) {
        if let Some(left) = left {
            self.anchors.left = left;
        }
        if let Some(right) = right {
            self.anchors.right = right;
        }
    }

    /// Engine options described by this configuration
    pub fn engine_options(&self) -> Result<EngineOptions> {
        Ok(EngineOptions {
            anchors: Anchors::new(self.anchors.left.clone(), self.anchors.right.clone())?,
            encoding: self.encoding.parse()?,
            buffer_size: self.buffer_size,
            debug: self.debug,
        })
    }
}
