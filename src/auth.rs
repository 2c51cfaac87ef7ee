//! Auth module: account numbers and sequences needed for signing

use serde::{Deserialize, Deserializer, Serialize};

use crate::address::AccAddress;
use crate::codec;
use crate::error::{Error, Result};
use crate::params::QueryAccountParams;
use crate::transport::ChainTransport;
use crate::tx::TxContext;
use crate::types::DecCoin;

pub const ACCOUNT_PATH: &str = "custom/acc/account";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub address: AccAddress,
    #[serde(default)]
    pub coins: Vec<DecCoin>,
    #[serde(default, deserialize_with = "amino_u64")]
    pub account_number: u64,
    #[serde(default, deserialize_with = "amino_u64")]
    pub sequence: u64,
}

impl Account {
    /// Signing context for the next transaction of this account.
    pub fn tx_context(&self) -> TxContext {
        TxContext::new(self.account_number, self.sequence)
    }
}

/// Accounts come back wrapped as `{"type": ..., "value": {...}}`.
#[derive(Deserialize)]
struct AccountEnvelope {
    value: Account,
}

fn amino_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Str(value) => value.parse().map_err(serde::de::Error::custom),
    }
}

/// Client of the auth module
pub struct AuthClient<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: ChainTransport + ?Sized> AuthClient<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Get an account by address.
    pub async fn query_account(&self, address: &str) -> Result<Account> {
        let params = QueryAccountParams {
            address: AccAddress::from_bech32(address)?,
        };
        let payload = codec::encode_json(&params)?;
        let bytes = self.transport.query(ACCOUNT_PATH, &payload).await?;
        if bytes.is_empty() {
            return Err(Error::NotFound(format!("account {}", address)));
        }
        let envelope: AccountEnvelope = codec::decode_json(&bytes)?;
        Ok(envelope.value)
    }
}
