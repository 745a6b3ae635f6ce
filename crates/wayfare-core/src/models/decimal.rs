//! Numeric columns the downstream sends either as JSON numbers or as
//! decimal strings (`"80.00"`).

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Decimal {
    Number(f64),
    Text(String),
}

impl Decimal {
    fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    fn into_f64<E: de::Error>(self) -> Result<f64, E> {
        match self {
            Self::Number(n) => Ok(n),
            Self::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid decimal `{s}`"))),
        }
    }
}

/// A required number or numeric string.
pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Decimal::deserialize(deserializer)?.into_f64()
}

/// An optional number or numeric string; `null` and blank strings are absent.
pub(crate) fn deserialize_opt<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Option::<Decimal>::deserialize(deserializer)?
        .filter(|value| !value.is_blank())
        .map(Decimal::into_f64)
        .transpose()
}
