//! Deployment manifests: merging their shapes and loading one deployer's record.
mod loader;
mod merge;
mod unit;

pub use loader::{ContractInstanceHandle, DeployedContract, DeploymentLoader, Deployments};
pub use merge::{merge, DeploymentSchema, MergedIds};
pub use unit::{generate_deployments, manifest_imports, ManifestImport, DEPLOYMENTS_UNIT};
