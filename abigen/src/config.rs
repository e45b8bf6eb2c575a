//! The optional `abigen.toml` next to a project.
use abigen_types::NetworkId;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "abigen.toml";
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

/// A direct mapping to an `abigen.toml`. Relative paths are relative to the file's directory.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub artifact_dir: Option<PathBuf>,
    pub deployment_dir: Option<PathBuf>,
    /// Networks whose manifests are read, in merge order.
    pub networks: Option<Vec<NetworkId>>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Reads `abigen.toml` from `project_dir`, or the empty configuration if there is none.
    pub fn from_dir(project_dir: &Path) -> Result<Self> {
        let path = project_dir.join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }
}
