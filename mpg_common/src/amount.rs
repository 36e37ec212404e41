use std::{fmt::Display, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::Type;
use thiserror::Error;

//--------------------------------------     GrossAmount       -------------------------------------------------------
/// A whole, non-negative order amount in the gateway's settlement currency (Rupiah have no minor unit in practice).
///
/// The gateway and the storefront are loose about the wire format of amounts: they show up as JSON integers, as
/// floats, and as strings such as `"10000.00"`. Deserialization accepts all of these and truncates any fractional
/// part, but never accepts a negative value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Type, Serialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct GrossAmount(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid gross amount: {0}")]
pub struct GrossAmountError(String);

impl GrossAmount {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i64> for GrossAmount {
    type Error = GrossAmountError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            Err(GrossAmountError(format!("{value} is negative")))
        } else {
            Ok(Self(value))
        }
    }
}

impl TryFrom<f64> for GrossAmount {
    type Error = GrossAmountError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 || value > i64::MAX as f64 {
            return Err(GrossAmountError(format!("{value} is not a representable amount")));
        }
        #[allow(clippy::cast_possible_truncation)]
        Ok(Self(value.trunc() as i64))
    }
}

impl FromStr for GrossAmount {
    type Err = GrossAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(v) = s.parse::<i64>() {
            return Self::try_from(v);
        }
        match s.split_once('.') {
            Some((whole, fraction))
                if !whole.is_empty() &&
                    whole.chars().all(|c| c.is_ascii_digit()) &&
                    fraction.chars().all(|c| c.is_ascii_digit()) =>
            {
                whole.parse::<i64>().map(Self).map_err(|e| GrossAmountError(format!("{s}: {e}")))
            },
            _ => Err(GrossAmountError(format!("'{s}' is not a number"))),
        }
    }
}

impl Display for GrossAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for GrossAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where D: Deserializer<'de> {
        let value = serde_json::Value::deserialize(deserializer)?;
        GrossAmount::try_from(&value).map_err(de::Error::custom)
    }
}

impl TryFrom<&serde_json::Value> for GrossAmount {
    type Error = GrossAmountError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;
        match value {
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(v), _) => Self::try_from(v),
                (None, Some(v)) => Self::try_from(v),
                (None, None) => Err(GrossAmountError(format!("{n} is out of range"))),
            },
            Value::String(s) => s.parse(),
            other => Err(GrossAmountError(format!("{other} is not a number"))),
        }
    }
}
