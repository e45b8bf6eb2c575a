use thiserror::Error;

/// Failure to turn an ABI type descriptor into a type expression.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeError {
    #[error("Malformed type descriptor \"{descriptor}\": {reason}.")]
    MalformedTypeDescriptor { descriptor: String, reason: String },
}

impl TypeError {
    pub fn malformed(descriptor: impl Into<String>, reason: impl Into<String>) -> Self {
        TypeError::MalformedTypeDescriptor {
            descriptor: descriptor.into(),
            reason: reason.into(),
        }
    }
}

/// Failure while generating the binding of a single contract or script.
///
/// These abort the affected unit only; the run driver records them and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GenerateError {
    #[error("Contract info does not exist: {contract}")]
    MissingContractMetadata { contract: String },
    #[error("Invalid type of `{item}`: {source}")]
    Type {
        item: String,
        #[source]
        source: TypeError,
    },
    #[error("Malformed artifact `{name}`: {reason}")]
    MalformedArtifact { name: String, reason: String },
}

impl GenerateError {
    pub fn in_item(item: impl Into<String>) -> impl FnOnce(TypeError) -> Self {
        let item = item.into();
        move |source| GenerateError::Type { item, source }
    }
}

/// Failure while selecting a deployment record for a network at load time.
///
/// The messages match what the generated `loadDeployments` throws.
#[derive(Error, Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadError {
    #[error("The contract has not been deployed to the {network}")]
    NetworkNotDeployed { network: String },
    #[error(
        "The contract has been deployed multiple times on {network}, please specify the deployer address"
    )]
    AmbiguousDeployer { network: String },
    #[error("The contract deployment result does not exist")]
    DeploymentNotFound { network: String, deployer: String },
}
