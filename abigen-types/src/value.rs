use num_bigint::{BigInt, BigUint};
use serde::{Deserialize, Serialize};

/// A constant or enum member value as recorded in a compiled artifact.
///
/// Integers are carried as arbitrary-precision numbers and travel through JSON as
/// decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Bool(bool),
    U256(#[serde(with = "decimal")] BigUint),
    I256(#[serde(with = "decimal")] BigInt),
    Address(String),
    ByteVec(String),
    Array(Vec<Value>),
}

impl Value {
    pub fn u256(value: impl Into<BigUint>) -> Self {
        Value::U256(value.into())
    }

    pub fn i256(value: impl Into<BigInt>) -> Self {
        Value::I256(value.into())
    }
}

mod decimal {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::{fmt::Display, str::FromStr};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Unsigned(u64),
        Signed(i64),
    }

    pub fn serialize<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Display,
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let text = match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text,
            Repr::Unsigned(n) => n.to_string(),
            Repr::Signed(n) => n.to_string(),
        };
        text.trim()
            .parse()
            .map_err(|e| D::Error::custom(format!("invalid integer `{text}`: {e}")))
    }
}
