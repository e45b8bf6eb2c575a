//! The typed ABI of contracts and scripts.

use crate::{constants::STD_ID_FIELD_NAME, ty::TypeExpr, value::Value};

/// A contract field or script parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub ty: TypeExpr,
    pub is_mutable: bool,
}

impl Field {
    /// Whether this is the compiler-injected interface discriminator.
    pub fn is_sentinel(&self) -> bool {
        self.name == STD_ID_FIELD_NAME
    }
}

/// A function parameter or event field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSig {
    pub name: String,
    pub is_public: bool,
    pub use_preapproved_assets: bool,
    pub use_assets_in_contract: bool,
    pub params: Vec<Param>,
    pub returns: Vec<TypeExpr>,
}

impl FunctionSig {
    pub fn has_params(&self) -> bool {
        !self.params.is_empty()
    }

    /// Whether the function can be queried through a read-only call.
    pub fn is_callable(&self) -> bool {
        self.is_public && !self.returns.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSig {
    pub name: String,
    pub fields: Vec<Param>,
}

/// A named constant, also used for the members of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedValue {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub fields: Vec<NamedValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractAbi {
    pub name: String,
    pub fields: Vec<Field>,
    pub events: Vec<EventSig>,
    pub functions: Vec<FunctionSig>,
    pub constants: Vec<NamedValue>,
    pub enums: Vec<EnumDef>,
}

impl ContractAbi {
    /// Fields exposed to users, with the interface discriminator removed.
    pub fn user_fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(|field| !field.is_sentinel())
    }

    pub fn has_user_fields(&self) -> bool {
        self.user_fields().next().is_some()
    }

    pub fn callable_functions(&self) -> impl Iterator<Item = &FunctionSig> + '_ {
        self.functions.iter().filter(|function| function.is_callable())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptAbi {
    pub name: String,
    pub fields: Vec<Field>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::ScalarKind;

    fn field(name: &str) -> Field {
        Field {
            name: name.to_string(),
            ty: TypeExpr::Scalar(ScalarKind::U256),
            is_mutable: false,
        }
    }

    fn function(name: &str, is_public: bool, returns: usize) -> FunctionSig {
        FunctionSig {
            name: name.to_string(),
            is_public,
            use_preapproved_assets: false,
            use_assets_in_contract: false,
            params: vec![],
            returns: vec![TypeExpr::Scalar(ScalarKind::Bool); returns],
        }
    }

    #[test]
    fn sentinel_is_not_a_user_field() {
        let contract = ContractAbi {
            name: "Token".to_string(),
            fields: vec![field(STD_ID_FIELD_NAME)],
            events: vec![],
            functions: vec![],
            constants: vec![],
            enums: vec![],
        };
        assert!(!contract.has_user_fields());
    }

    #[test]
    fn callable_requires_public_and_returns() {
        assert!(function("get", true, 1).is_callable());
        assert!(!function("set", true, 0).is_callable());
        assert!(!function("secret", false, 2).is_callable());
    }
}
