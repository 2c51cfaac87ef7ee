//! Common types and data structures for the OKChain SDK

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of fractional digits carried by the chain's `Dec` type
pub const DEC_PRECISION: u32 = 8;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(Error::InvalidParameter(format!(
                "invalid side: {} (expected BUY or SELL)",
                other
            ))),
        }
    }
}

/// How a signed transaction is handed to the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BroadcastMode {
    Sync,
    Async,
    #[default]
    Block,
}

impl BroadcastMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BroadcastMode::Sync => "sync",
            BroadcastMode::Async => "async",
            BroadcastMode::Block => "block",
        }
    }
}

impl FromStr for BroadcastMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sync" => Ok(BroadcastMode::Sync),
            "async" => Ok(BroadcastMode::Async),
            "block" => Ok(BroadcastMode::Block),
            other => Err(Error::Config(format!("invalid broadcast mode: {}", other))),
        }
    }
}

/// Raw key/value pair returned by a subspace store scan
#[derive(Clone, PartialEq, prost::Message)]
pub struct KvPair {
    #[prost(bytes = "vec", tag = "1")]
    pub key: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub value: Vec<u8>,
}

/// Decimal amount of a single denomination, written `10.24okt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecCoin {
    #[serde(with = "dec_string")]
    pub amount: Decimal,
    pub denom: String,
}

impl DecCoin {
    pub fn new(denom: impl Into<String>, amount: Decimal) -> Self {
        Self {
            amount,
            denom: denom.into(),
        }
    }
}

impl fmt::Display for DecCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", utils::format_dec(&self.amount), self.denom)
    }
}

impl FromStr for DecCoin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        utils::parse_dec_coin(s)
    }
}

/// Serde adapter writing a `Dec` as a fixed 8-digit string ("10.24000000")
pub mod dec_string {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::utils::format_dec(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Decimal::from_str(raw.trim()).map_err(serde::de::Error::custom)
    }
}

/// Utility functions for chain decimals and coins
pub mod utils {
    use super::{DecCoin, DEC_PRECISION};
    use crate::error::{Error, Result};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    /// Convert the binary store form of a `Dec` (an integer scaled by 10^8)
    /// into a decimal. An empty string is zero.
    pub fn dec_from_amino(raw: &str) -> Result<Decimal> {
        if raw.is_empty() {
            return Ok(Decimal::ZERO);
        }
        let scaled = i128::from_str(raw)
            .map_err(|e| Error::Decode(format!("invalid dec {:?}: {}", raw, e)))?;
        Decimal::try_from_i128_with_scale(scaled, DEC_PRECISION)
            .map_err(|e| Error::Decode(format!("dec {:?} out of range: {}", raw, e)))
    }

    /// Format a decimal with the chain's fixed precision, e.g. "0.00100000".
    pub fn format_dec(value: &Decimal) -> String {
        format!("{:.*}", DEC_PRECISION as usize, value)
    }

    /// Parse a decimal amount, rejecting anything with more than 8 fractional digits.
    pub fn parse_dec(raw: &str) -> Result<Decimal> {
        let value = Decimal::from_str(raw.trim())
            .map_err(|e| Error::InvalidParameter(format!("invalid decimal {:?}: {}", raw, e)))?;
        if value.scale() > DEC_PRECISION {
            return Err(Error::InvalidParameter(format!(
                "invalid decimal {:?}: more than {} decimal places",
                raw, DEC_PRECISION
            )));
        }
        Ok(value)
    }

    fn is_valid_denom(denom: &str) -> bool {
        let mut chars = denom.chars();
        match chars.next() {
            Some(first) if first.is_ascii_lowercase() => {}
            _ => return false,
        }
        denom.len() <= 32
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    }

    /// Parse a single coin such as `10.24okb` or `0.001btc-000`.
    pub fn parse_dec_coin(raw: &str) -> Result<DecCoin> {
        let raw = raw.trim();
        let split = raw
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or_else(|| Error::InvalidParameter(format!("invalid coin {:?}: missing denom", raw)))?;
        let (amount, denom) = raw.split_at(split);
        if amount.is_empty() {
            return Err(Error::InvalidParameter(format!(
                "invalid coin {:?}: missing amount",
                raw
            )));
        }
        if !is_valid_denom(denom) {
            return Err(Error::InvalidParameter(format!(
                "invalid coin {:?}: bad denom {:?}",
                raw, denom
            )));
        }
        let amount = parse_dec(amount)?;
        if amount.is_sign_negative() {
            return Err(Error::InvalidParameter(format!(
                "invalid coin {:?}: negative amount",
                raw
            )));
        }
        Ok(DecCoin::new(denom, amount))
    }

    /// Parse a comma separated coin list. The result is sorted by denom and
    /// duplicate denoms are rejected.
    pub fn parse_dec_coins(raw: &str) -> Result<Vec<DecCoin>> {
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut coins = raw
            .split(',')
            .map(parse_dec_coin)
            .collect::<Result<Vec<_>>>()?;
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        if coins.windows(2).any(|pair| pair[0].denom == pair[1].denom) {
            return Err(Error::InvalidParameter(format!(
                "invalid coins {:?}: duplicate denom",
                raw
            )));
        }
        Ok(coins)
    }
}
