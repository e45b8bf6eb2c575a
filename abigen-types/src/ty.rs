use crate::constants::TYPE_DELIMITERS;
use abigen_error::TypeError;
use std::{fmt, num::NonZeroUsize, str::FromStr};

/// The scalar types of the ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    U256,
    I256,
    Bool,
    Address,
    ByteVec,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 5] = [
        ScalarKind::U256,
        ScalarKind::I256,
        ScalarKind::Bool,
        ScalarKind::Address,
        ScalarKind::ByteVec,
    ];

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "U256" => Some(ScalarKind::U256),
            "I256" => Some(ScalarKind::I256),
            "Bool" => Some(ScalarKind::Bool),
            "Address" => Some(ScalarKind::Address),
            "ByteVec" => Some(ScalarKind::ByteVec),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarKind::U256 => "U256",
            ScalarKind::I256 => "I256",
            ScalarKind::Bool => "Bool",
            ScalarKind::Address => "Address",
            ScalarKind::ByteVec => "ByteVec",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mapped ABI type: a scalar, or a fixed-size array of another type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Scalar(ScalarKind),
    Array(Box<TypeExpr>, NonZeroUsize),
}

impl TypeExpr {
    pub fn array(element: TypeExpr, len: NonZeroUsize) -> Self {
        TypeExpr::Array(Box::new(element), len)
    }
}

/// Maps one ABI type descriptor to a [TypeExpr].
///
/// Scalars map one to one. Anything else is an array descriptor: it is split on
/// [TYPE_DELIMITERS], the first token is the element type and every following token is
/// a dimension wrapping the result so far, so the last dimension is the outermost array.
/// `[[U256;2];3]` is therefore three arrays of two `U256`s.
pub fn map_type(descriptor: &str) -> Result<TypeExpr, TypeError> {
    if let Some(kind) = ScalarKind::from_token(descriptor) {
        return Ok(TypeExpr::Scalar(kind));
    }

    let mut tokens = descriptor
        .split(TYPE_DELIMITERS)
        .filter(|token| !token.is_empty());

    let base = tokens
        .next()
        .ok_or_else(|| TypeError::malformed(descriptor, "empty type descriptor"))?;
    let base = ScalarKind::from_token(base)
        .map(TypeExpr::Scalar)
        .ok_or_else(|| TypeError::malformed(descriptor, format!("unknown type `{base}`")))?;

    tokens.try_fold(base, |element, token| {
        let len = token.parse::<NonZeroUsize>().map_err(|_| {
            TypeError::malformed(
                descriptor,
                format!("dimension `{token}` is not a positive integer"),
            )
        })?;
        Ok(TypeExpr::array(element, len))
    })
}

impl FromStr for TypeExpr {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        map_type(s)
    }
}

/// Prints the descriptor form, e.g. `[[U256;2];3]`.
impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeExpr::Scalar(kind) => write!(f, "{kind}"),
            TypeExpr::Array(element, len) => write!(f, "[{element};{len}]"),
        }
    }
}
