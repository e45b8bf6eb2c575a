use crate::constants::PROJECT_ARTIFACT_FILE_NAME;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Per-contract code metadata recorded by the compiler next to the artifacts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeInfo {
    pub source_file: String,
    #[serde(default)]
    pub source_code_hash: String,
    pub bytecode_debug_patch: String,
    pub code_hash_debug: String,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// The `.project.json` file of an artifact directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectArtifact {
    #[serde(default)]
    pub full_node_version: Option<String>,
    pub infos: IndexMap<String, CodeInfo>,
}

impl ProjectArtifact {
    pub fn path(artifact_dir: &Path) -> PathBuf {
        artifact_dir.join(PROJECT_ARTIFACT_FILE_NAME)
    }

    pub fn from_dir(artifact_dir: &Path) -> Result<Self> {
        let path = Self::path(artifact_dir);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read project artifact {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("failed to parse project artifact {}", path.display()))
    }

    /// Looks up the code metadata of a contract or script by name.
    pub fn info(&self, name: &str) -> Option<&CodeInfo> {
        self.infos.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_infos_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_ARTIFACT_FILE_NAME),
            r#"{
                "fullNodeVersion": "v2.8.0",
                "compilerOptionsUsed": { "ignoreUnusedConstantsWarnings": false },
                "infos": {
                    "Add": {
                        "sourceFile": "add/add.ral",
                        "sourceCodeHash": "00",
                        "bytecodeDebugPatch": "=1-1+ef",
                        "codeHashDebug": "beef",
                        "warnings": []
                    }
                }
            }"#,
        )
        .unwrap();
        let project = ProjectArtifact::from_dir(dir.path()).unwrap();
        let info = project.info("Add").unwrap();
        assert_eq!(info.code_hash_debug, "beef");
        assert_eq!(info.bytecode_debug_patch, "=1-1+ef");
        assert!(project.info("Sub").is_none());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectArtifact::from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains(".project.json"));
    }
}
