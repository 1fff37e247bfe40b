//! Generator configuration file
//!
//! Loaded from YAML; since YAML is a superset of JSON, a JSON file works too.

use crate::{GeneratorError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "restgen.yaml";

/// Settings shared by the `generate` and `batch` commands
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorConfig {
    /// Documents processed by a batch run, in order
    #[serde(default)]
    pub documents: Vec<PathBuf>,
    /// Root directory for generated sources
    #[serde(default = "default_destination_dir")]
    pub destination_dir: PathBuf,
    /// Skip to the next document when one fails in batch mode
    #[serde(default)]
    pub continue_on_error: bool,
    /// Rewrite hand-editable model files that already exist
    #[serde(default)]
    pub overwrite_models: bool,
}

fn default_destination_dir() -> PathBuf {
    PathBuf::from("services")
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            destination_dir: default_destination_dir(),
            continue_on_error: false,
            overwrite_models: false,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML or JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            GeneratorError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            GeneratorError::Config(format!("Failed to parse config from {:?}: {}", path, e))
        })
    }

    /// Load `restgen.yaml` from `dir` if present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config file");
            Self::load(&candidate)
        } else {
            tracing::debug!("no config file found, using defaults");
            Ok(Self::default())
        }
    }
}
