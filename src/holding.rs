use std::{fmt::Display, str::FromStr};

use rust_decimal::Decimal;
use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::group::AssetClass;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Holding {
    pub name: String,
    pub ticker: String,
    #[serde(default)]
    pub asset_class: Option<String>,
    pub avg_price: Amount,
    pub market_price: Amount,
    pub latest_chg_pct: Amount,
    pub market_value_ccy: Amount,
}

/// A numeric field as the API sent it.
///
/// `raw` is the JSON text and is what gets displayed. `value` is `None` when
/// the number does not fit a `Decimal` (beyond 28 digits of scale or out of
/// range), so it is never shown rounded or truncated.
#[derive(Clone, Debug, PartialEq)]
pub struct Amount {
    raw: String,
    value: Option<Decimal>,
}

impl Amount {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self {
            raw: value.to_string(),
            value: Some(value),
        }
    }
}

impl TryFrom<Value> for Amount {
    type Error = anyhow::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let raw = match value {
            Value::Number(number) => number.to_string(),
            Value::String(raw) => raw,
            other => anyhow::bail!("Expected a number, got {}", other),
        };
        let value = Decimal::from_str(&raw)
            .or_else(|_| Decimal::from_scientific(&raw))
            .ok();
        Ok(Self { raw, value })
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Amount::try_from(value).map_err(D::Error::custom)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Response body of the holdings endpoint.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HoldingsResponse {
    pub payload: Vec<Holding>,
}

/// Row identity for a holding.
///
/// `name` is not guaranteed unique by the data source, so rows are keyed by
/// ticker and asset class. `occurrence` separates exact duplicates inside the
/// same group and follows source order.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct HoldingKey {
    pub ticker: String,
    pub asset_class: AssetClass,
    pub occurrence: usize,
}

impl Holding {
    pub fn asset_class(&self) -> AssetClass {
        AssetClass::from(self.asset_class.clone())
    }
}
