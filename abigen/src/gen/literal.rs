use crate::decl::Expr;
use abigen_types::Value;

/// Encodes a constant as a target literal.
///
/// Integers always go through `BigInt("...")` so that no value is ever squeezed
/// through a floating point numeral.
pub fn encode(value: &Value) -> Expr {
    match value {
        Value::Bool(value) => Expr::Bool(*value),
        Value::U256(value) => Expr::BigInt(value.to_string()),
        Value::I256(value) => Expr::BigInt(value.to_string()),
        Value::Address(text) | Value::ByteVec(text) => Expr::Str(text.clone()),
        Value::Array(elems) => Expr::Array(elems.iter().map(encode).collect()),
    }
}
