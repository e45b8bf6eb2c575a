//! Deployment manifests recorded per network by the deploy tool.

use crate::constants::TASK_ID_SEPARATORS;
use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

/// The networks a project can be deployed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkId {
    Mainnet,
    Testnet,
    Devnet,
}

impl NetworkId {
    /// All networks, primary network first.
    pub const ALL: [NetworkId; 3] = [NetworkId::Mainnet, NetworkId::Testnet, NetworkId::Devnet];

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkId::Mainnet => "mainnet",
            NetworkId::Testnet => "testnet",
            NetworkId::Devnet => "devnet",
        }
    }

    /// Name of the manifest file holding this network's deployments.
    pub fn deployment_file_name(&self) -> String {
        format!(".deployments.{self}.json")
    }
}

impl FromStr for NetworkId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(NetworkId::Mainnet),
            "testnet" => Ok(NetworkId::Testnet),
            "devnet" => Ok(NetworkId::Devnet),
            _ => bail!(
                "'{s}' is not a valid network id. Possible values: '{}', '{}', '{}'",
                NetworkId::Mainnet,
                NetworkId::Testnet,
                NetworkId::Devnet
            ),
        }
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInstanceInfo {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_index: Option<u32>,
}

/// The recorded outcome of one contract deployment task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployContractResult {
    #[serde(default)]
    pub tx_id: String,
    pub contract_instance: ContractInstanceInfo,
    #[serde(flatten)]
    pub metadata: IndexMap<String, serde_json::Value>,
}

/// The recorded outcome of one script execution task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunScriptResult {
    #[serde(default)]
    pub tx_id: String,
    #[serde(flatten)]
    pub metadata: IndexMap<String, serde_json::Value>,
}

/// Everything one deployer address deployed on a network, keyed by task id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentsPerAddress {
    pub deployer_address: String,
    #[serde(default)]
    pub contracts: IndexMap<String, DeployContractResult>,
    #[serde(default)]
    pub scripts: IndexMap<String, RunScriptResult>,
    #[serde(default)]
    pub migrations: IndexMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ManifestRepr {
    Many(Vec<DeploymentsPerAddress>),
    One(DeploymentsPerAddress),
}

/// The deployment manifest of one network: one record per deployer address.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkDeployments {
    pub network: NetworkId,
    pub path: PathBuf,
    pub records: Vec<DeploymentsPerAddress>,
}

impl NetworkDeployments {
    pub fn file_path(deployment_dir: &Path, network: NetworkId) -> PathBuf {
        deployment_dir.join(network.deployment_file_name())
    }

    /// Reads a network's manifest. A missing file means "not deployed there", not an error.
    pub fn from_dir(deployment_dir: &Path, network: NetworkId) -> Result<Option<Self>> {
        let path = Self::file_path(deployment_dir, network);
        if !path.exists() {
            return Ok(None);
        }
        Self::from_file(network, &path).map(Some)
    }

    pub fn from_file(network: NetworkId, path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read deployments {}", path.display()))?;
        let records = match serde_json::from_str(&json)
            .with_context(|| format!("failed to parse deployments {}", path.display()))?
        {
            ManifestRepr::Many(records) => records,
            ManifestRepr::One(record) => vec![record],
        };
        Ok(Self {
            network,
            path: path.to_path_buf(),
            records,
        })
    }
}

/// Turns a task id such as `Token:usdt-v2` into an identifier such as `Token_usdt_v2`.
pub fn task_id_to_variable(task_id: &str) -> String {
    task_id.replace(TASK_ID_SEPARATORS, "_")
}

/// The contract or script name of a task id: everything before the first `:`.
pub fn type_from_task_id(task_id: &str) -> &str {
    task_id.split(':').next().unwrap_or(task_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn network_id_round_trips_through_str() {
        for network in NetworkId::ALL {
            assert_eq!(network.to_string().parse::<NetworkId>().unwrap(), network);
        }
        assert!("localnet".parse::<NetworkId>().is_err());
        assert_eq!(NetworkId::Devnet.deployment_file_name(), ".deployments.devnet.json");
    }

    #[test]
    fn task_ids() {
        assert_eq!(task_id_to_variable("Token:usdt-v2"), "Token_usdt_v2");
        assert_eq!(type_from_task_id("Token:usdt-v2"), "Token");
        assert_eq!(type_from_task_id("Token"), "Token");
    }

    #[test]
    fn reads_single_and_multiple_records() {
        let dir = tempfile::tempdir().unwrap();
        let record = r#"{
            "deployerAddress": "1DrDyTr9RpRsQnDnXo2YRiPzPW4ooHX5LLoqXrqfMrpQH",
            "contracts": {
                "Add": {
                    "txId": "aa",
                    "blockHash": "bb",
                    "contractInstance": { "address": "25XpHd", "contractId": "cc", "groupIndex": 0 }
                }
            },
            "scripts": { "Main": { "txId": "dd" } },
            "migrations": {}
        }"#;
        let path = NetworkDeployments::file_path(dir.path(), NetworkId::Testnet);
        std::fs::write(&path, record).unwrap();
        let one = NetworkDeployments::from_dir(dir.path(), NetworkId::Testnet)
            .unwrap()
            .unwrap();
        assert_eq!(one.records.len(), 1);
        let add = &one.records[0].contracts["Add"];
        assert_eq!(add.contract_instance.address, "25XpHd");
        assert_eq!(add.metadata["blockHash"], serde_json::json!("bb"));

        std::fs::write(&path, format!("[{record}, {record}]")).unwrap();
        let many = NetworkDeployments::from_file(NetworkId::Testnet, &path).unwrap();
        assert_eq!(many.records.len(), 2);
    }

    #[test]
    fn absent_manifest_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(NetworkDeployments::from_dir(dir.path(), NetworkId::Mainnet)
            .unwrap()
            .is_none());
    }
}
