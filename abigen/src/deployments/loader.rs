use super::merge::DeploymentSchema;
use crate::gen::instance_name;
use abigen_error::LoadError;
use abigen_types::{
    deployment::{task_id_to_variable, type_from_task_id},
    DeployContractResult, DeploymentsPerAddress, NetworkDeployments, NetworkId, RunScriptResult,
};
use anyhow::Result;
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

/// A typed handle on a deployed contract: its binding's instance type at an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInstanceHandle {
    /// Name of the binding's instance class, e.g. `TokenInstance`.
    pub instance_type: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeployedContract {
    pub task_id: String,
    pub instance: ContractInstanceHandle,
    pub result: DeployContractResult,
}

/// One deployer's deployments on a network, keyed by task id variable names.
#[derive(Debug, Clone, PartialEq)]
pub struct Deployments {
    pub network: NetworkId,
    pub deployer_address: String,
    pub contracts: IndexMap<String, DeployedContract>,
    pub scripts: IndexMap<String, RunScriptResult>,
}

impl Deployments {
    fn from_record(network: NetworkId, record: &DeploymentsPerAddress) -> Self {
        let contracts = record
            .contracts
            .iter()
            .map(|(task_id, result)| {
                let deployed = DeployedContract {
                    task_id: task_id.clone(),
                    instance: ContractInstanceHandle {
                        instance_type: instance_name(type_from_task_id(task_id)),
                        address: result.contract_instance.address.clone(),
                    },
                    result: result.clone(),
                };
                (task_id_to_variable(task_id), deployed)
            })
            .collect();
        let scripts = record
            .scripts
            .iter()
            .map(|(task_id, result)| (task_id_to_variable(task_id), result.clone()))
            .collect();
        Self {
            network,
            deployer_address: record.deployer_address.clone(),
            contracts,
            scripts,
        }
    }

    pub fn contract(&self, task_id: &str) -> Option<&DeployedContract> {
        self.contracts.get(&task_id_to_variable(task_id))
    }
}

/// The deployment manifests of every network a project was deployed to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeploymentLoader {
    networks: Vec<NetworkDeployments>,
}

impl DeploymentLoader {
    /// Keeps the manifests in the order given, which is the order they are merged in.
    pub fn new(networks: impl IntoIterator<Item = NetworkDeployments>) -> Self {
        Self {
            networks: networks.into_iter().collect(),
        }
    }

    /// Reads the manifest of every network in `networks` that has one in `deployment_dir`.
    pub fn from_dir(deployment_dir: &Path, networks: &[NetworkId]) -> Result<Self> {
        let mut found = Vec::new();
        for network in networks {
            match NetworkDeployments::from_dir(deployment_dir, *network)? {
                Some(deployments) => {
                    debug!(
                        "Found {} deployment record(s) for {network}",
                        deployments.records.len()
                    );
                    found.push(deployments);
                }
                None => debug!("No deployments for {network}"),
            }
        }
        Ok(Self::new(found))
    }

    pub fn networks(&self) -> &[NetworkDeployments] {
        &self.networks
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Every deployer record, in network order then file order.
    pub fn manifests(&self) -> Vec<&DeploymentsPerAddress> {
        self.networks
            .iter()
            .flat_map(|network| &network.records)
            .collect()
    }

    pub fn schema(&self) -> DeploymentSchema {
        DeploymentSchema::from_manifests(&self.manifests())
    }

    /// Selects one deployer's deployments on `network`.
    ///
    /// Without a deployer address the network must have exactly one record.
    pub fn load(
        &self,
        network: NetworkId,
        deployer: Option<&str>,
    ) -> Result<Deployments, LoadError> {
        let records = self
            .networks
            .iter()
            .find(|deployments| deployments.network == network)
            .map(|deployments| deployments.records.as_slice())
            .filter(|records| !records.is_empty())
            .ok_or_else(|| LoadError::NetworkNotDeployed {
                network: network.to_string(),
            })?;
        let record = match deployer {
            None => match records {
                [record] => record,
                _ => {
                    return Err(LoadError::AmbiguousDeployer {
                        network: network.to_string(),
                    })
                }
            },
            Some(deployer) => records
                .iter()
                .find(|record| record.deployer_address == deployer)
                .ok_or_else(|| LoadError::DeploymentNotFound {
                    network: network.to_string(),
                    deployer: deployer.to_string(),
                })?,
        };
        Ok(Deployments::from_record(network, record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abigen_types::deployment::ContractInstanceInfo;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn record(deployer: &str, contracts: &[(&str, &str)]) -> DeploymentsPerAddress {
        DeploymentsPerAddress {
            deployer_address: deployer.to_string(),
            contracts: contracts
                .iter()
                .map(|(task_id, address)| {
                    let result = DeployContractResult {
                        tx_id: format!("tx-{address}"),
                        contract_instance: ContractInstanceInfo {
                            address: address.to_string(),
                            contract_id: None,
                            group_index: None,
                        },
                        metadata: IndexMap::new(),
                    };
                    (task_id.to_string(), result)
                })
                .collect(),
            scripts: IndexMap::new(),
            migrations: IndexMap::new(),
        }
    }

    fn testnet(records: Vec<DeploymentsPerAddress>) -> NetworkDeployments {
        NetworkDeployments {
            network: NetworkId::Testnet,
            path: PathBuf::from(".deployments.testnet.json"),
            records,
        }
    }

    #[test]
    fn single_record_loads_without_deployer() {
        let loader =
            DeploymentLoader::new([testnet(vec![record("X", &[("Token:usdt", "addr1")])])]);
        let deployments = loader.load(NetworkId::Testnet, None).unwrap();
        assert_eq!(deployments.deployer_address, "X");
        let token = deployments.contract("Token:usdt").unwrap();
        assert_eq!(
            token.instance,
            ContractInstanceHandle {
                instance_type: "TokenInstance".to_string(),
                address: "addr1".to_string(),
            }
        );
        assert!(deployments.contracts.contains_key("Token_usdt"));
    }

    #[test]
    fn unknown_deployer_is_not_found() {
        let loader = DeploymentLoader::new([testnet(vec![record("X", &[])])]);
        assert_eq!(
            loader.load(NetworkId::Testnet, Some("Z")).unwrap_err(),
            LoadError::DeploymentNotFound {
                network: "testnet".to_string(),
                deployer: "Z".to_string(),
            }
        );
    }

    #[test]
    fn empty_manifest_counts_as_not_deployed() {
        let loader = DeploymentLoader::new([testnet(vec![])]);
        assert!(matches!(
            loader.load(NetworkId::Testnet, None),
            Err(LoadError::NetworkNotDeployed { .. })
        ));
    }

    #[test]
    fn manifests_follow_network_then_file_order() {
        let devnet = NetworkDeployments {
            network: NetworkId::Devnet,
            path: PathBuf::from(".deployments.devnet.json"),
            records: vec![record("D", &[("Add", "a"), ("Sub", "s")])],
        };
        let loader = DeploymentLoader::new([
            testnet(vec![record("X", &[("Add", "a")]), record("Y", &[("Add", "b")])]),
            devnet,
        ]);
        let deployers = loader
            .manifests()
            .iter()
            .map(|manifest| manifest.deployer_address.as_str())
            .collect::<Vec<_>>();
        assert_eq!(deployers, vec!["X", "Y", "D"]);
        let schema = loader.schema();
        assert_eq!(schema.contracts.required, vec!["Add".to_string()]);
        assert_eq!(schema.contracts.optional, vec!["Sub".to_string()]);
        assert!(!schema.has_scripts());
    }
}
