use crate::decl::{PropertySig, TsType};
use abigen_types::{Param, ScalarKind, TypeExpr};

pub fn scalar_name(kind: ScalarKind) -> &'static str {
    match kind {
        ScalarKind::U256 | ScalarKind::I256 => "bigint",
        ScalarKind::Bool => "boolean",
        ScalarKind::Address => "Address",
        ScalarKind::ByteVec => "HexString",
    }
}

/// The target type of an ABI type: scalars by name, fixed-size arrays as tuples.
pub fn ts_type(ty: &TypeExpr) -> TsType {
    match ty {
        TypeExpr::Scalar(kind) => TsType::named(scalar_name(*kind)),
        TypeExpr::Array(elem, len) => TsType::Tuple(vec![ts_type(elem); len.get()]),
    }
}

/// `{ name: T; ... }` for a list of named, typed values.
pub fn record<'a>(entries: impl IntoIterator<Item = (&'a str, &'a TypeExpr)>) -> TsType {
    TsType::Object(
        entries
            .into_iter()
            .map(|(name, ty)| PropertySig::new(name, ts_type(ty)))
            .collect(),
    )
}

pub fn params_record(params: &[Param]) -> TsType {
    record(params.iter().map(|param| (param.name.as_str(), &param.ty)))
}

/// The result shape of a function: `null`, the bare value, or an ordered tuple.
pub fn returns_type(returns: &[TypeExpr]) -> TsType {
    match returns {
        [] => TsType::named("null"),
        [single] => ts_type(single),
        many => TsType::Tuple(many.iter().map(ts_type).collect()),
    }
}
