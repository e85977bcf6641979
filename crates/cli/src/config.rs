//! Configuration file support for the demo run

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tabdedup_core::{KeepPolicy, DEFAULT_SEED};

/// Complete demo configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DemoConfig {
    pub dataset: DatasetConfig,
    pub injection: InjectionConfig,
    pub deduplication: DedupConfig,
}

impl DemoConfig {
    /// Load configuration from a file (YAML or TOML)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        match extension {
            "yaml" | "yml" => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            "toml" => toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            _ => Err(anyhow::anyhow!(
                "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                extension
            )),
        }
    }

    /// Load `path` when given, otherwise use the built-in defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration to a file
    #[allow(dead_code)]
    pub fn save(&self, path: &Path) -> Result<()> {
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let content = match extension {
            "yaml" | "yml" => serde_yaml::to_string(self)?,
            "toml" => toml::to_string_pretty(self)?,
            _ => {
                return Err(anyhow::anyhow!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .toml",
                    extension
                ))
            }
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// Where the demo table comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatasetConfig {
    /// Table file to load; the embedded Iris dataset when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// Keep the Iris class label column
    pub with_target: bool,
}

/// Synthetic duplicate settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionConfig {
    pub count: i64,
    pub seed: u64,
    pub allow_repeats: bool,
}

impl Default for InjectionConfig {
    fn default() -> Self {
        Self {
            count: 40,
            seed: DEFAULT_SEED,
            allow_repeats: false,
        }
    }
}

/// Deduplication settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// `first`, `last` or `none`
    pub keep: String,
    /// Log the statistics summary
    pub report: bool,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            keep: KeepPolicy::First.to_string(),
            report: true,
        }
    }
}

impl DedupConfig {
    pub fn keep_policy(&self) -> Result<KeepPolicy> {
        self.keep
            .parse()
            .with_context(|| format!("Invalid deduplication.keep value: {:?}", self.keep))
    }
}
