//! langnames configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use langnames::{DisplayPattern, RunOptions, DEFAULT_PATTERN, DEFAULT_SEPARATOR};

pub const CONFIG_FILE: &str = "langnames.toml";

/// Top-level configuration (langnames.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LangnamesConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub run: RunConfig,
}

/// Where the YAML bundles live
#[derive(Debug, Deserialize, Serialize)]
pub struct SourceConfig {
    /// Contains `lang/`, `region/` and an optional `aliases.yaml`
    #[serde(default = "default_source_dir")]
    pub dir: PathBuf,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("data")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: default_source_dir(),
        }
    }
}

/// Where the generated JSON goes
#[derive(Debug, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub pretty: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            pretty: true,
        }
    }
}

/// Generation settings
#[derive(Debug, Deserialize, Serialize)]
pub struct RunConfig {
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Used when a display locale has no `localeDisplayPattern/pattern`
    #[serde(default = "default_pattern")]
    pub default_pattern: String,
    /// Used when a display locale has no `localeDisplayPattern/separator`
    #[serde(default = "default_separator")]
    pub default_separator: String,
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            default_pattern: default_pattern(),
            default_separator: default_separator(),
        }
    }
}

impl RunConfig {
    pub fn to_options(&self) -> RunOptions {
        RunOptions {
            parallel: self.parallel,
            default_pattern: DisplayPattern {
                pattern: self.default_pattern.clone(),
                separator: self.default_separator.clone(),
            },
        }
    }
}

impl LangnamesConfig {
    /// Load configuration from a file, or from `langnames.toml` inside a directory.
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_dir() {
            path.join(CONFIG_FILE)
        } else {
            path.to_path_buf()
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load `langnames.toml` from the working directory if present, else use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None if Path::new(CONFIG_FILE).is_file() => Self::load(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid langnames configuration")
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
