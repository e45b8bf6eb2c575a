//! Compiled artifacts (`<Name>.ral.json`) as written by the compiler, and their
//! lowering into the typed ABI.

use crate::{
    abi::{ContractAbi, EnumDef, EventSig, Field, FunctionSig, NamedValue, Param, ScriptAbi},
    ty::map_type,
    value::Value,
};
use abigen_error::GenerateError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldsSigJson {
    pub names: Vec<String>,
    pub types: Vec<String>,
    #[serde(default)]
    pub is_mutable: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSigJson {
    pub name: String,
    pub field_names: Vec<String>,
    pub field_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSigJson {
    pub name: String,
    #[serde(default)]
    pub use_preapproved_assets: bool,
    #[serde(default)]
    pub use_assets_in_contract: bool,
    pub is_public: bool,
    pub param_names: Vec<String>,
    pub param_types: Vec<String>,
    #[serde(default)]
    pub param_is_mutable: Vec<bool>,
    pub return_types: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantJson {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumJson {
    pub name: String,
    pub fields: Vec<ConstantJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    #[serde(default)]
    pub version: String,
    pub name: String,
    pub bytecode: String,
    pub code_hash: String,
    pub fields_sig: FieldsSigJson,
    #[serde(default)]
    pub events_sig: Vec<EventSigJson>,
    #[serde(default)]
    pub functions: Vec<FunctionSigJson>,
    #[serde(default)]
    pub constants: Vec<ConstantJson>,
    #[serde(default)]
    pub enums: Vec<EnumJson>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptArtifact {
    #[serde(default)]
    pub version: String,
    pub name: String,
    pub bytecode_template: String,
    pub fields_sig: FieldsSigJson,
    #[serde(default)]
    pub functions: Vec<FunctionSigJson>,
}

/// A compiled artifact. Scripts are recognised by their bytecode template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Contract(ContractArtifact),
    Script(ScriptArtifact),
}

impl Artifact {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        let artifact = if raw.get("bytecodeTemplate").is_some() {
            Artifact::Script(serde_json::from_value(raw)?)
        } else {
            Artifact::Contract(serde_json::from_value(raw)?)
        };
        Ok(artifact)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read artifact {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("failed to parse artifact {}", path.display()))
    }

    pub fn name(&self) -> &str {
        match self {
            Artifact::Contract(contract) => &contract.name,
            Artifact::Script(script) => &script.name,
        }
    }
}

impl ContractArtifact {
    /// Lowers the artifact into the typed ABI, mapping every type descriptor.
    pub fn to_abi(&self) -> Result<ContractAbi, GenerateError> {
        let name = &self.name;
        let fields = lower_fields(name, &self.fields_sig)?;
        let events = self
            .events_sig
            .iter()
            .map(|event| {
                let item = format!("{name}.{}", event.name);
                Ok(EventSig {
                    name: event.name.clone(),
                    fields: lower_params(&item, &event.field_names, &event.field_types)?,
                })
            })
            .collect::<Result<Vec<_>, GenerateError>>()?;
        let functions = lower_functions(name, &self.functions)?;
        let constants = self.constants.iter().map(ConstantJson::to_named).collect();
        let enums = self
            .enums
            .iter()
            .map(|def| EnumDef {
                name: def.name.clone(),
                fields: def.fields.iter().map(ConstantJson::to_named).collect(),
            })
            .collect();
        Ok(ContractAbi {
            name: name.clone(),
            fields,
            events,
            functions,
            constants,
            enums,
        })
    }
}

impl ScriptArtifact {
    pub fn to_abi(&self) -> Result<ScriptAbi, GenerateError> {
        Ok(ScriptAbi {
            name: self.name.clone(),
            fields: lower_fields(&self.name, &self.fields_sig)?,
        })
    }
}

impl ConstantJson {
    fn to_named(&self) -> NamedValue {
        NamedValue {
            name: self.name.clone(),
            value: self.value.clone(),
        }
    }
}

fn malformed(name: &str, reason: String) -> GenerateError {
    GenerateError::MalformedArtifact {
        name: name.to_string(),
        reason,
    }
}

fn check_unique<'a>(
    owner: &str,
    names: impl IntoIterator<Item = &'a String>,
) -> Result<(), GenerateError> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(malformed(owner, format!("duplicate name `{name}`")));
        }
    }
    Ok(())
}

fn lower_fields(owner: &str, sig: &FieldsSigJson) -> Result<Vec<Field>, GenerateError> {
    if sig.names.len() != sig.types.len() {
        return Err(malformed(
            owner,
            format!(
                "{} field names but {} field types",
                sig.names.len(),
                sig.types.len()
            ),
        ));
    }
    check_unique(owner, &sig.names)?;
    sig.names
        .iter()
        .zip(&sig.types)
        .enumerate()
        .map(|(index, (name, ty))| {
            let ty = map_type(ty).map_err(GenerateError::in_item(format!("{owner}.{name}")))?;
            Ok(Field {
                name: name.clone(),
                ty,
                is_mutable: sig.is_mutable.get(index).copied().unwrap_or(false),
            })
        })
        .collect()
}

fn lower_params(
    owner: &str,
    names: &[String],
    types: &[String],
) -> Result<Vec<Param>, GenerateError> {
    if names.len() != types.len() {
        return Err(malformed(
            owner,
            format!("{} names but {} types", names.len(), types.len()),
        ));
    }
    check_unique(owner, names)?;
    names
        .iter()
        .zip(types)
        .map(|(name, ty)| {
            let ty = map_type(ty).map_err(GenerateError::in_item(format!("{owner}.{name}")))?;
            Ok(Param {
                name: name.clone(),
                ty,
            })
        })
        .collect()
}

fn lower_functions(
    owner: &str,
    functions: &[FunctionSigJson],
) -> Result<Vec<FunctionSig>, GenerateError> {
    check_unique(owner, functions.iter().map(|function| &function.name))?;
    functions
        .iter()
        .map(|function| {
            let item = format!("{owner}.{}", function.name);
            let params = lower_params(&item, &function.param_names, &function.param_types)?;
            let returns = function
                .return_types
                .iter()
                .map(|ty| map_type(ty).map_err(GenerateError::in_item(format!("{item}.return"))))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(FunctionSig {
                name: function.name.clone(),
                is_public: function.is_public,
                use_preapproved_assets: function.use_preapproved_assets,
                use_assets_in_contract: function.use_assets_in_contract,
                params,
                returns,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::{ScalarKind, TypeExpr};
    use pretty_assertions::assert_eq;
    use std::num::NonZeroUsize;

    const ADD: &str = r#"{
        "version": "v2.8.0",
        "name": "Add",
        "bytecode": "0102",
        "codeHash": "a1b2",
        "fieldsSig": {
            "names": ["sub", "result", "__stdInterfaceId"],
            "types": ["ByteVec", "U256", "ByteVec"],
            "isMutable": [false, true, false]
        },
        "eventsSig": [
            { "name": "Add", "fieldNames": ["x", "y"], "fieldTypes": ["U256", "U256"] },
            { "name": "Empty", "fieldNames": [], "fieldTypes": [] }
        ],
        "functions": [
            {
                "name": "add",
                "usePreapprovedAssets": false,
                "useAssetsInContract": false,
                "isPublic": true,
                "paramNames": ["array"],
                "paramTypes": ["[U256;2]"],
                "paramIsMutable": [false],
                "returnTypes": ["[U256;2]"]
            }
        ],
        "constants": [{ "name": "Max", "value": { "type": "U256", "value": "10" } }],
        "enums": [
            {
                "name": "Color",
                "fields": [{ "name": "Red", "value": { "type": "U256", "value": "0" } }]
            }
        ]
    }"#;

    #[test]
    fn lowers_contract_artifact() {
        let Artifact::Contract(artifact) = Artifact::from_json_str(ADD).unwrap() else {
            panic!("expected a contract artifact");
        };
        let abi = artifact.to_abi().unwrap();
        assert_eq!(abi.name, "Add");
        assert_eq!(abi.fields.len(), 3);
        assert_eq!(abi.user_fields().count(), 2);
        assert!(abi.fields[1].is_mutable);
        assert!(abi.events[1].fields.is_empty());
        assert_eq!(
            abi.functions[0].params[0].ty,
            TypeExpr::array(TypeExpr::Scalar(ScalarKind::U256), NonZeroUsize::new(2).unwrap())
        );
        assert_eq!(abi.constants[0].value, Value::u256(10u32));
        assert_eq!(abi.enums[0].fields[0].name, "Red");
    }

    #[test]
    fn recognises_scripts() {
        let json = r#"{
            "name": "Main",
            "bytecodeTemplate": "0101",
            "fieldsSig": { "names": ["addContractId"], "types": ["ByteVec"], "isMutable": [false] },
            "functions": []
        }"#;
        let artifact = Artifact::from_json_str(json).unwrap();
        assert_eq!(artifact.name(), "Main");
        let Artifact::Script(script) = artifact else {
            panic!("expected a script artifact");
        };
        let abi = script.to_abi().unwrap();
        assert_eq!(abi.fields[0].ty, TypeExpr::Scalar(ScalarKind::ByteVec));
    }

    #[test]
    fn bad_type_names_the_field() {
        let json = ADD.replace(
            r#""paramTypes": ["[U256;2]"]"#,
            r#""paramTypes": ["[U256;0]"]"#,
        );
        let Artifact::Contract(artifact) = Artifact::from_json_str(&json).unwrap() else {
            panic!("expected a contract artifact");
        };
        let err = artifact.to_abi().unwrap_err();
        assert!(matches!(err, GenerateError::Type { ref item, .. } if item == "Add.add.array"));
    }

    #[test]
    fn duplicate_field_names_are_rejected() {
        let json = ADD.replace("\"sub\", \"result\"", "\"sub\", \"sub\"");
        let Artifact::Contract(artifact) = Artifact::from_json_str(&json).unwrap() else {
            panic!("expected a contract artifact");
        };
        assert!(matches!(
            artifact.to_abi(),
            Err(GenerateError::MalformedArtifact { .. })
        ));
    }
}
