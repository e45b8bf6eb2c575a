//! The ABI intermediate representation read by the binding generator.
//!
//! Compiled artifacts arrive as JSON ([`artifact`]) and are lowered into the
//! typed IR in [`abi`], where every type descriptor has already been through
//! the type mapper in [`ty`].

pub mod abi;
pub mod artifact;
pub mod constants;
pub mod deployment;
pub mod project;
pub mod ty;
pub mod value;

pub use abi::{ContractAbi, EnumDef, EventSig, Field, FunctionSig, NamedValue, Param, ScriptAbi};
pub use artifact::Artifact;
pub use deployment::{
    DeployContractResult, DeploymentsPerAddress, NetworkDeployments, NetworkId, RunScriptResult,
};
pub use project::{CodeInfo, ProjectArtifact};
pub use ty::{map_type, ScalarKind, TypeExpr};
pub use value::Value;
