//! Configuration loading for the ortholink binary.
//! Reads ortholink.toml from the current directory, the path given with
//! `--config`, or the path in the ORTHOLINK_CONFIG env var.

use std::path::{Path, PathBuf};

use anyhow::Context;
use ortholink_common::PipelineConfig;
use ortholink_ingestion::sources::PrimaryPaths;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    pub inputs: InputsConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputsConfig {
    /// Primary extract for the orthology run.
    pub orthology: Option<PrimaryPaths>,
    /// Primary extract for the paralogy run.
    pub paralogy: Option<PrimaryPaths>,
    /// External feed documents, merged in the listed order.
    #[serde(default)]
    pub feeds: Vec<PathBuf>,
    /// Second-best override pairs for the historical adjustment.
    pub overrides: Option<PathBuf>,
    /// Retired-to-current FlyBase id table.
    pub migrations: Option<PathBuf>,
    #[serde(default = "default_migration_cache")]
    pub migration_cache: usize,
}

fn default_migration_cache() -> usize { 10_000 }

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_release")]
    pub release: String,
    #[serde(default = "default_data_provider")]
    pub data_provider: String,
    /// Gene ids (without the `DRSC:` prefix) copied into the sample document.
    #[serde(default)]
    pub sample_genes: Vec<String>,
}

fn default_output_dir()    -> PathBuf { PathBuf::from("output") }
fn default_release()       -> String { "9".to_string() }
fn default_data_provider() -> String { "DRSC".to_string() }

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            release: default_release(),
            data_provider: default_data_provider(),
            sample_genes: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.pipeline.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Pass --config or set ORTHOLINK_CONFIG.",
                path.display()
            );
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid config {}", path.display()))
    }
}
