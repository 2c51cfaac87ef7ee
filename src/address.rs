//! Bech32 address parsing and rendering for OKChain accounts and validators

use std::fmt;
use std::str::FromStr;

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Account address human-readable part
pub const ACCOUNT_HRP: Hrp = Hrp::parse_unchecked("okchain");
/// Validator operator address human-readable part
pub const VALIDATOR_OPERATOR_HRP: Hrp = Hrp::parse_unchecked("okchainvaloper");
/// Validator consensus public key human-readable part
pub const CONSENSUS_PUBKEY_HRP: Hrp = Hrp::parse_unchecked("okchainvalconspub");

/// Length of a raw account or operator address
pub const ADDRESS_LEN: usize = 20;

fn decode_bech32(address: &str, expected: Hrp) -> Result<Vec<u8>> {
    if address.is_empty() {
        return Err(Error::Address("empty address".to_string()));
    }
    // classic Bech32 checksum only
    let checked = CheckedHrpstring::new::<Bech32>(address)
        .map_err(|e| Error::Address(format!("invalid address {}: {}", address, e)))?;
    let hrp = checked.hrp();
    if hrp != expected {
        return Err(Error::Address(format!(
            "invalid address {}: unexpected prefix {}, expected {}",
            address, hrp, expected
        )));
    }
    Ok(checked.byte_iter().collect())
}

fn encode_bech32(hrp: Hrp, bytes: &[u8]) -> Result<String> {
    bech32::encode::<Bech32>(hrp, bytes)
        .map_err(|e| Error::Address(format!("failed to encode {} address: {}", hrp, e)))
}

/// Render amino-encoded consensus public key bytes as a bech32 string.
pub fn encode_consensus_pubkey(bytes: &[u8]) -> Result<String> {
    encode_bech32(CONSENSUS_PUBKEY_HRP, bytes)
}

macro_rules! bech32_address {
    ($(#[$meta:meta])* $name:ident, $hrp:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name([u8; ADDRESS_LEN]);

        impl $name {
            /// Parse a bech32 string, checking prefix, checksum and length.
            pub fn from_bech32(address: &str) -> Result<Self> {
                let bytes = decode_bech32(address, $hrp)?;
                Self::from_bytes(&bytes)
            }

            /// Build an address from raw bytes.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
                let raw: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| {
                    Error::Address(format!(
                        "expected {} address bytes, got {}",
                        ADDRESS_LEN,
                        bytes.len()
                    ))
                })?;
                Ok(Self(raw))
            }

            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            pub fn to_bech32(&self) -> Result<String> {
                encode_bech32($hrp, &self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let encoded = self.to_bech32().map_err(|_| fmt::Error)?;
                f.write_str(&encoded)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_bech32(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                let encoded = self.to_bech32().map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&encoded)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let encoded = String::deserialize(deserializer)?;
                Self::from_bech32(&encoded).map_err(serde::de::Error::custom)
            }
        }
    };
}

bech32_address!(
    /// Account address (`okchain1...`)
    AccAddress,
    ACCOUNT_HRP
);

bech32_address!(
    /// Validator operator address (`okchainvaloper1...`)
    ValAddress,
    VALIDATOR_OPERATOR_HRP
);

/// Check that `address` is a well-formed account address.
pub fn validate_acc_address(address: &str) -> Result<()> {
    AccAddress::from_bech32(address).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "okchain1dcsxvxgj374dv3wt9szflf9nz6342juzzkjnlz";
    const VAL_ADDR: &str = "okchainvaloper1alq9na49n9yycysh889rl90g9nhe58lcs50wu5";

    #[test]
    fn test_account_address_round_trip() {
        let addr = AccAddress::from_bech32(ADDR).unwrap();
        assert_eq!(
            hex::encode(addr.as_bytes()),
            "6e206619128faad645cb2c049fa4b316a3554b82"
        );
        assert_eq!(addr.to_string(), ADDR);
    }

    #[test]
    fn test_operator_shares_bytes_with_account() {
        let val = ValAddress::from_bech32(VAL_ADDR).unwrap();
        let acc = AccAddress::from_bytes(val.as_bytes()).unwrap();
        assert_eq!(acc.to_string(), "okchain1alq9na49n9yycysh889rl90g9nhe58lcv27tfj");
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(AccAddress::from_bech32(&ADDR[1..]).is_err());
        assert!(AccAddress::from_bech32("").is_err());
        // right checksum, wrong prefix
        assert!(AccAddress::from_bech32(VAL_ADDR).is_err());
        assert!(ValAddress::from_bech32(ADDR).is_err());
        assert!(matches!(
            validate_acc_address("okchain1xyz"),
            Err(Error::Address(_))
        ));
        // right prefix and length, Bech32m checksum
        let bech32m = bech32::encode::<bech32::Bech32m>(ACCOUNT_HRP, &[7u8; ADDRESS_LEN]).unwrap();
        assert!(AccAddress::from_bech32(&bech32m).is_err());
        assert!(AccAddress::from_bytes(&[7u8; ADDRESS_LEN]).is_ok());
    }

    #[test]
    fn test_serde_as_bech32_string() {
        let addr: AccAddress = serde_json::from_str(&format!("\"{}\"", ADDR)).unwrap();
        assert_eq!(serde_json::to_string(&addr).unwrap(), format!("\"{}\"", ADDR));
        assert!(serde_json::from_str::<AccAddress>("\"okchain1\"").is_err());
    }
}
