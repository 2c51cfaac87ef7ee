//! Staking module: validators, delegators and delegation transactions
//!
//! Validator and delegator records are read straight from the `staking`
//! store, so they arrive as length-prefixed binary records and are converted
//! into the public types here.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::{encode_consensus_pubkey, AccAddress, ValAddress};
use crate::codec;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::params::QueryDelegatorParams;
use crate::rpc::TxResponse;
use crate::transport::ChainTransport;
use crate::tx::{sign_and_broadcast, Msg, Signer, TxContext};
use crate::types::{utils, DecCoin};

pub const MODULE_NAME: &str = "staking";
pub const UNBOND_DELEGATION_PATH: &str = "custom/staking/unbondingDelegation";

/// Store prefix of validator records
pub const VALIDATORS_KEY: [u8; 1] = [0x21];
/// Store prefix of delegator records
pub const DELEGATOR_KEY: [u8; 1] = [0x52];

const STORE_QUERY_KIND: &str = "key";

/// Store key of a validator record.
pub fn validator_key(operator: &ValAddress) -> Vec<u8> {
    [&VALIDATORS_KEY[..], operator.as_bytes()].concat()
}

/// Store key of a delegator record.
pub fn delegator_key(delegator: &AccAddress) -> Vec<u8> {
    [&DELEGATOR_KEY[..], delegator.as_bytes()].concat()
}

// ============================================================================
// Store records
// ============================================================================

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct TimestampRecord {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct DescriptionRecord {
    #[prost(string, tag = "1")]
    pub moniker: String,
    #[prost(string, tag = "2")]
    pub identity: String,
    #[prost(string, tag = "3")]
    pub website: String,
    #[prost(string, tag = "4")]
    pub details: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct CommissionRatesRecord {
    #[prost(string, tag = "1")]
    pub rate: String,
    #[prost(string, tag = "2")]
    pub max_rate: String,
    #[prost(string, tag = "3")]
    pub max_change_rate: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct CommissionRecord {
    #[prost(message, optional, tag = "1")]
    pub rates: Option<CommissionRatesRecord>,
    #[prost(message, optional, tag = "2")]
    pub update_time: Option<TimestampRecord>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct ValidatorRecord {
    #[prost(bytes = "vec", tag = "1")]
    pub operator_address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub cons_pubkey: Vec<u8>,
    #[prost(bool, tag = "3")]
    pub jailed: bool,
    #[prost(uint32, tag = "4")]
    pub status: u32,
    #[prost(string, tag = "5")]
    pub tokens: String,
    #[prost(string, tag = "6")]
    pub delegator_shares: String,
    #[prost(message, optional, tag = "7")]
    pub description: Option<DescriptionRecord>,
    #[prost(int64, tag = "8")]
    pub unbonding_height: i64,
    #[prost(message, optional, tag = "9")]
    pub unbonding_completion_time: Option<TimestampRecord>,
    #[prost(message, optional, tag = "10")]
    pub commission: Option<CommissionRecord>,
    #[prost(string, tag = "11")]
    pub min_self_delegation: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub(crate) struct DelegatorRecord {
    #[prost(bytes = "vec", tag = "1")]
    pub delegator_address: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub validator_addresses: Vec<Vec<u8>>,
    #[prost(string, tag = "3")]
    pub shares: String,
    #[prost(string, tag = "4")]
    pub tokens: String,
    #[prost(bool, tag = "5")]
    pub is_proxy: bool,
    #[prost(string, tag = "6")]
    pub total_delegated_tokens: String,
    #[prost(bytes = "vec", tag = "7")]
    pub proxy_address: Vec<u8>,
}

fn to_datetime(time: Option<&TimestampRecord>) -> Result<DateTime<Utc>> {
    let (seconds, nanos) = time.map_or((0, 0), |t| (t.seconds, t.nanos));
    let nanos = u32::try_from(nanos)
        .map_err(|_| Error::Decode(format!("negative timestamp nanos: {}", nanos)))?;
    Utc.timestamp_opt(seconds, nanos)
        .single()
        .ok_or_else(|| Error::Decode(format!("timestamp out of range: {}s {}ns", seconds, nanos)))
}

fn decode_address<A>(bytes: &[u8], parse: fn(&[u8]) -> Result<A>) -> Result<A> {
    parse(bytes).map_err(|e| Error::Decode(e.to_string()))
}

// ============================================================================
// Public types
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub moniker: String,
    pub identity: String,
    pub website: String,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    pub rate: Decimal,
    pub max_rate: Decimal,
    pub max_change_rate: Decimal,
    pub update_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    pub operator_address: ValAddress,
    /// Bech32 consensus public key (`okchainvalconspub1...`)
    pub cons_pubkey: String,
    pub jailed: bool,
    pub status: u8,
    pub tokens: Decimal,
    pub delegator_shares: Decimal,
    pub description: Description,
    pub unbonding_height: i64,
    pub unbonding_completion_time: DateTime<Utc>,
    pub commission: Commission,
    pub min_self_delegation: Decimal,
}

impl TryFrom<ValidatorRecord> for Validator {
    type Error = Error;

    fn try_from(record: ValidatorRecord) -> Result<Self> {
        let status = u8::try_from(record.status)
            .map_err(|_| Error::Decode(format!("invalid validator status: {}", record.status)))?;
        let description = record
            .description
            .map(|d| Description {
                moniker: d.moniker,
                identity: d.identity,
                website: d.website,
                details: d.details,
            })
            .unwrap_or_default();
        let commission = record.commission.unwrap_or_default();
        let rates = commission.rates.unwrap_or_default();

        Ok(Self {
            operator_address: decode_address(&record.operator_address, ValAddress::from_bytes)?,
            cons_pubkey: encode_consensus_pubkey(&record.cons_pubkey)
                .map_err(|e| Error::Decode(e.to_string()))?,
            jailed: record.jailed,
            status,
            tokens: utils::dec_from_amino(&record.tokens)?,
            delegator_shares: utils::dec_from_amino(&record.delegator_shares)?,
            description,
            unbonding_height: record.unbonding_height,
            unbonding_completion_time: to_datetime(record.unbonding_completion_time.as_ref())?,
            commission: Commission {
                rate: utils::dec_from_amino(&rates.rate)?,
                max_rate: utils::dec_from_amino(&rates.max_rate)?,
                max_change_rate: utils::dec_from_amino(&rates.max_change_rate)?,
                update_time: to_datetime(commission.update_time.as_ref())?,
            },
            min_self_delegation: utils::dec_from_amino(&record.min_self_delegation)?,
        })
    }
}

/// Delegation state of an account as stored on chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegator {
    pub delegator_address: AccAddress,
    pub validator_addresses: Vec<ValAddress>,
    pub shares: Decimal,
    pub tokens: Decimal,
    pub is_proxy: bool,
    pub total_delegated_tokens: Decimal,
    pub proxy_address: Option<AccAddress>,
}

impl TryFrom<DelegatorRecord> for Delegator {
    type Error = Error;

    fn try_from(record: DelegatorRecord) -> Result<Self> {
        let validator_addresses = record
            .validator_addresses
            .iter()
            .map(|bytes| decode_address(bytes, ValAddress::from_bytes))
            .collect::<Result<Vec<_>>>()?;
        let proxy_address = if record.proxy_address.is_empty() {
            None
        } else {
            Some(decode_address(&record.proxy_address, AccAddress::from_bytes)?)
        };

        Ok(Self {
            delegator_address: decode_address(&record.delegator_address, AccAddress::from_bytes)?,
            validator_addresses,
            shares: utils::dec_from_amino(&record.shares)?,
            tokens: utils::dec_from_amino(&record.tokens)?,
            is_proxy: record.is_proxy,
            total_delegated_tokens: utils::dec_from_amino(&record.total_delegated_tokens)?,
            proxy_address,
        })
    }
}

/// Tokens on their way out of a delegation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndelegationInfo {
    pub delegator_address: AccAddress,
    pub quantity: Decimal,
    pub completion_time: DateTime<Utc>,
}

/// Stored delegation merged with the pending undelegation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegatorResponse {
    pub delegator_address: AccAddress,
    pub validator_addresses: Vec<ValAddress>,
    pub shares: Decimal,
    pub tokens: Decimal,
    pub unbonded_tokens: Decimal,
    pub completion_time: DateTime<Utc>,
    pub is_proxy: bool,
    pub total_delegated_tokens: Decimal,
    pub proxy_address: Option<AccAddress>,
}

impl DelegatorResponse {
    pub fn new(delegator: Delegator, undelegation: UndelegationInfo) -> Self {
        Self {
            delegator_address: delegator.delegator_address,
            validator_addresses: delegator.validator_addresses,
            shares: delegator.shares,
            tokens: delegator.tokens,
            unbonded_tokens: undelegation.quantity,
            completion_time: undelegation.completion_time,
            is_proxy: delegator.is_proxy,
            total_delegated_tokens: delegator.total_delegated_tokens,
            proxy_address: delegator.proxy_address,
        }
    }
}

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgDelegate {
    pub delegator_address: AccAddress,
    pub quantity: DecCoin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgUndelegate {
    pub delegator_address: AccAddress,
    pub quantity: DecCoin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgAddShares {
    pub delegator_address: AccAddress,
    pub validator_addresses: Vec<ValAddress>,
}

fn parse_positive_coin(amount: &str) -> Result<DecCoin> {
    let coin = utils::parse_dec_coin(amount)?;
    if coin.amount.is_zero() {
        return Err(Error::InvalidParameter(format!(
            "invalid amount {:?}: must be positive",
            amount
        )));
    }
    Ok(coin)
}

// ============================================================================
// Client
// ============================================================================

/// Client of the staking module
pub struct StakingClient<'a, T: ?Sized> {
    transport: &'a T,
    config: &'a ClientConfig,
}

impl<'a, T: ChainTransport + ?Sized> StakingClient<'a, T> {
    pub fn new(transport: &'a T, config: &'a ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Get every validator in the store.
    pub async fn query_validators(&self) -> Result<Vec<Validator>> {
        let pairs = self
            .transport
            .query_subspace(&VALIDATORS_KEY, MODULE_NAME)
            .await?;
        pairs
            .iter()
            .map(|pair| {
                codec::decode_length_prefixed::<ValidatorRecord>(&pair.value)
                    .and_then(Validator::try_from)
            })
            .collect()
    }

    /// Get a validator by operator address (`okchainvaloper1...`).
    pub async fn query_validator(&self, val_address: &str) -> Result<Validator> {
        let operator = ValAddress::from_bech32(val_address)?;
        let bytes = self
            .transport
            .query_store(&validator_key(&operator), MODULE_NAME, STORE_QUERY_KIND)
            .await?;
        if bytes.is_empty() {
            return Err(Error::NotFound(format!("validator {}", val_address)));
        }
        codec::decode_length_prefixed::<ValidatorRecord>(&bytes).and_then(Validator::try_from)
    }

    /// Get the delegation state of an account together with its pending undelegation.
    pub async fn query_delegator(&self, del_address: &str) -> Result<DelegatorResponse> {
        let delegator_addr = AccAddress::from_bech32(del_address)?;

        let bytes = self
            .transport
            .query_store(&delegator_key(&delegator_addr), MODULE_NAME, STORE_QUERY_KIND)
            .await?;
        if bytes.is_empty() {
            return Err(Error::NotFound(format!("delegator {}", del_address)));
        }
        let delegator =
            codec::decode_length_prefixed::<DelegatorRecord>(&bytes).and_then(Delegator::try_from)?;

        let payload = codec::encode_json(&QueryDelegatorParams::new(delegator_addr))?;
        let bytes = self.transport.query(UNBOND_DELEGATION_PATH, &payload).await?;
        let undelegation: UndelegationInfo = codec::decode_json(&bytes)?;

        Ok(DelegatorResponse::new(delegator, undelegation))
    }

    /// Delegate tokens to the staking pool, e.g. `amount = "10.24okt"`.
    pub async fn delegate(
        &self,
        signer: &dyn Signer,
        amount: &str,
        ctx: &TxContext,
    ) -> Result<TxResponse> {
        let msg = Msg::Delegate(MsgDelegate {
            delegator_address: signer.address(),
            quantity: parse_positive_coin(amount)?,
        });
        sign_and_broadcast(self.transport, self.config, signer, vec![msg], ctx).await
    }

    /// Withdraw delegated tokens; they become available after the unbonding period.
    pub async fn undelegate(
        &self,
        signer: &dyn Signer,
        amount: &str,
        ctx: &TxContext,
    ) -> Result<TxResponse> {
        let msg = Msg::Undelegate(MsgUndelegate {
            delegator_address: signer.address(),
            quantity: parse_positive_coin(amount)?,
        });
        sign_and_broadcast(self.transport, self.config, signer, vec![msg], ctx).await
    }

    /// Vote the delegator's shares to a set of validators.
    pub async fn add_shares(
        &self,
        signer: &dyn Signer,
        val_addresses: &[&str],
        ctx: &TxContext,
    ) -> Result<TxResponse> {
        if val_addresses.is_empty() {
            return Err(Error::InvalidParameter(
                "no validator to add shares to".to_string(),
            ));
        }
        let validator_addresses = val_addresses
            .iter()
            .map(|addr| ValAddress::from_bech32(addr))
            .collect::<Result<Vec<_>>>()?;
        let msg = Msg::AddShares(MsgAddShares {
            delegator_address: signer.address(),
            validator_addresses,
        });
        sign_and_broadcast(self.transport, self.config, signer, vec![msg], ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fixtures;
    use crate::transport::MockChainTransport;
    use crate::tx::test_signer::FixedSigner;
    use crate::types::{BroadcastMode, KvPair};
    use std::str::FromStr;

    const ADDR: &str = "okchain1alq9na49n9yycysh889rl90g9nhe58lcv27tfj";
    const VAL_ADDR: &str = "okchainvaloper1alq9na49n9yycysh889rl90g9nhe58lcs50wu5";
    const VAL_CONS_PK: &str =
        "okchainvalconspub1zcjduepqpjq9n8g6fnjrys5t07cqcdcptu5d06tpxvhdu04mdrc4uc5swmmqfu3wku";
    const PROXY_ADDR: &str = "okchain1npm82ty95j9s7xja5s92hajwszdklh7kch23as";

    const RAW_VAL_BYTES: [u8; 124] = [
        123, 10, 20, 239, 192, 89, 246, 165, 153, 72, 76, 18, 23, 57, 202, 63, 149, 232, 44, 239,
        154, 31, 248, 18, 37, 22, 36, 222, 100, 32, 12, 128, 89, 157, 26, 76, 228, 50, 66, 139,
        127, 176, 12, 55, 1, 95, 40, 215, 233, 97, 51, 46, 222, 62, 187, 104, 241, 94, 98, 144,
        118, 246, 32, 2, 42, 1, 48, 50, 9, 49, 48, 48, 48, 48, 48, 48, 48, 48, 58, 7, 10, 5, 110,
        111, 100, 101, 50, 82, 27, 10, 25, 10, 9, 49, 48, 48, 48, 48, 48, 48, 48, 48, 18, 9, 49,
        48, 48, 48, 48, 48, 48, 48, 48, 26, 1, 48, 90, 6, 49, 48, 48, 48, 48, 48,
    ];

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn config() -> ClientConfig {
        ClientConfig::new("testURL", "testChain", BroadcastMode::Block, "0.01okt", 200000).unwrap()
    }

    fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_query_validators() {
        let operator = ValAddress::from_bech32(VAL_ADDR).unwrap();
        let pairs = vec![KvPair {
            key: validator_key(&operator),
            value: RAW_VAL_BYTES.to_vec(),
        }];

        let mut mock = MockChainTransport::new();
        mock.expect_query_subspace()
            .withf(|prefix, store| prefix == [0x21u8].as_slice() && store == "staking")
            .times(1)
            .returning(move |_, _| Ok(pairs.clone()));
        let config = config();
        let vals = StakingClient::new(&mock, &config).query_validators().await.unwrap();

        let val = &vals[0];
        assert_eq!(val.operator_address, operator);
        assert_eq!(val.cons_pubkey, VAL_CONS_PK);
        assert!(!val.jailed);
        assert_eq!(val.status, 2);
        assert_eq!(val.tokens, Decimal::ZERO);
        assert_eq!(val.delegator_shares, Decimal::ONE);
        assert_eq!(val.description.moniker, "node2");
        assert_eq!(val.unbonding_height, 0);
        assert_eq!(val.unbonding_completion_time, epoch());
        assert_eq!(val.commission.rate, Decimal::ONE);
        assert_eq!(val.commission.max_change_rate, Decimal::ZERO);
        assert_eq!(val.min_self_delegation, dec("0.001"));

        let mut failing = MockChainTransport::new();
        failing
            .expect_query_subspace()
            .returning(|_, _| Err(Error::Rpc("default error".to_string())));
        assert!(StakingClient::new(&failing, &config)
            .query_validators()
            .await
            .unwrap_err()
            .is_transport());
    }

    #[tokio::test]
    async fn test_query_validator() {
        let operator = ValAddress::from_bech32(VAL_ADDR).unwrap();
        let completion = Utc.timestamp_opt(1583308800, 123_000_000).unwrap();
        let record = ValidatorRecord {
            operator_address: operator.as_bytes().to_vec(),
            cons_pubkey: RAW_VAL_BYTES[25..62].to_vec(),
            jailed: false,
            status: 2,
            tokens: String::new(),
            delegator_shares: "100000000".to_string(),
            description: Some(DescriptionRecord {
                moniker: "default moniker".to_string(),
                identity: "default identity".to_string(),
                website: "default website".to_string(),
                details: "default details".to_string(),
            }),
            unbonding_height: 0,
            unbonding_completion_time: Some(TimestampRecord {
                seconds: 1583308800,
                nanos: 123_000_000,
            }),
            commission: None,
            min_self_delegation: "100000".to_string(),
        };
        let bytes = fixtures::length_prefixed(&record);
        let key = validator_key(&operator);

        let mut mock = MockChainTransport::new();
        mock.expect_query_store()
            .withf(move |k, store, kind| k == key.as_slice() && store == "staking" && kind == "key")
            .times(1)
            .returning(move |_, _, _| Ok(bytes.clone()));
        let config = config();
        let val = StakingClient::new(&mock, &config)
            .query_validator(VAL_ADDR)
            .await
            .unwrap();
        assert_eq!(val.cons_pubkey, VAL_CONS_PK);
        assert_eq!(val.description.identity, "default identity");
        assert_eq!(val.description.details, "default details");
        assert_eq!(val.delegator_shares, Decimal::ONE);
        assert_eq!(val.min_self_delegation, dec("0.001"));
        assert_eq!(val.unbonding_completion_time, completion);
        assert_eq!(val.commission.update_time, epoch());

        let idle = MockChainTransport::new();
        assert!(StakingClient::new(&idle, &config)
            .query_validator(&VAL_ADDR[1..])
            .await
            .unwrap_err()
            .is_invalid_input());

        let mut failing = MockChainTransport::new();
        failing
            .expect_query_store()
            .returning(|_, _, _| Err(Error::Rpc("default error".to_string())));
        assert!(StakingClient::new(&failing, &config)
            .query_validator(VAL_ADDR)
            .await
            .is_err());

        let mut empty = MockChainTransport::new();
        empty.expect_query_store().returning(|_, _, _| Ok(Vec::new()));
        assert!(matches!(
            StakingClient::new(&empty, &config).query_validator(VAL_ADDR).await,
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_validator_bytes_must_be_exact() {
        let mut appended = RAW_VAL_BYTES.to_vec();
        appended.push(0);
        assert!(codec::decode_length_prefixed::<ValidatorRecord>(&appended).is_err());
        assert!(
            codec::decode_length_prefixed::<ValidatorRecord>(&RAW_VAL_BYTES[..123]).is_err()
        );
    }

    fn delegator_bytes() -> Vec<u8> {
        let record = DelegatorRecord {
            delegator_address: AccAddress::from_bech32(ADDR).unwrap().as_bytes().to_vec(),
            validator_addresses: vec![ValAddress::from_bech32(VAL_ADDR)
                .unwrap()
                .as_bytes()
                .to_vec()],
            shares: "1024000010240000".to_string(),
            tokens: "1024000000".to_string(),
            is_proxy: false,
            total_delegated_tokens: "2048000000".to_string(),
            proxy_address: AccAddress::from_bech32(PROXY_ADDR).unwrap().as_bytes().to_vec(),
        };
        fixtures::length_prefixed(&record)
    }

    fn undelegation_bytes() -> Vec<u8> {
        serde_json::to_vec(&serde_json::json!({
            "delegator_address": ADDR,
            "quantity": "40.96000000",
            "completion_time": "2020-03-04T08:00:00.5Z",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_query_delegator() {
        let del_addr = AccAddress::from_bech32(ADDR).unwrap();
        let key = delegator_key(&del_addr);
        let store_bytes = delegator_bytes();
        let unbond_bytes = undelegation_bytes();

        let mut mock = MockChainTransport::new();
        mock.expect_query_store()
            .withf(move |k, store, kind| k == key.as_slice() && store == "staking" && kind == "key")
            .times(1)
            .returning(move |_, _, _| Ok(store_bytes.clone()));
        mock.expect_query()
            .withf(|path, data| {
                path == UNBOND_DELEGATION_PATH
                    && data == format!(r#"{{"DelegatorAddr":"{}"}}"#, ADDR).as_bytes()
            })
            .times(1)
            .returning(move |_, _| Ok(unbond_bytes.clone()));
        let config = config();
        let resp = StakingClient::new(&mock, &config)
            .query_delegator(ADDR)
            .await
            .unwrap();

        assert_eq!(resp.delegator_address, del_addr);
        assert_eq!(resp.validator_addresses, vec![ValAddress::from_bech32(VAL_ADDR).unwrap()]);
        assert_eq!(resp.shares, dec("10240000.1024"));
        assert_eq!(resp.tokens, dec("10.24"));
        assert_eq!(resp.total_delegated_tokens, dec("20.48"));
        assert_eq!(resp.unbonded_tokens, dec("40.96"));
        assert!(!resp.is_proxy);
        assert_eq!(resp.proxy_address, Some(AccAddress::from_bech32(PROXY_ADDR).unwrap()));
        assert_eq!(
            resp.completion_time,
            Utc.timestamp_opt(1583308800, 500_000_000).unwrap()
        );
    }

    #[tokio::test]
    async fn test_query_delegator_fails_on_any_sub_fetch() {
        let config = config();

        let idle = MockChainTransport::new();
        assert!(StakingClient::new(&idle, &config)
            .query_delegator(&ADDR[1..])
            .await
            .unwrap_err()
            .is_invalid_input());

        let store_bytes = delegator_bytes();
        let truncated = undelegation_bytes()[1..].to_vec();
        let mut bad_unbond = MockChainTransport::new();
        bad_unbond
            .expect_query_store()
            .returning(move |_, _, _| Ok(store_bytes.clone()));
        bad_unbond
            .expect_query()
            .returning(move |_, _| Ok(truncated.clone()));
        assert!(StakingClient::new(&bad_unbond, &config)
            .query_delegator(ADDR)
            .await
            .unwrap_err()
            .is_decode());

        let store_bytes = delegator_bytes();
        let mut failing_unbond = MockChainTransport::new();
        failing_unbond
            .expect_query_store()
            .times(1)
            .returning(move |_, _, _| Ok(store_bytes.clone()));
        failing_unbond
            .expect_query()
            .withf(|path, _| path == UNBOND_DELEGATION_PATH)
            .times(1)
            .returning(|_, _| Err(Error::Rpc("connection refused".to_string())));
        assert!(StakingClient::new(&failing_unbond, &config)
            .query_delegator(ADDR)
            .await
            .unwrap_err()
            .is_transport());

        let mut failing_store = MockChainTransport::new();
        failing_store
            .expect_query_store()
            .returning(|_, _, _| Err(Error::Rpc("default error".to_string())));
        assert!(StakingClient::new(&failing_store, &config)
            .query_delegator(ADDR)
            .await
            .unwrap_err()
            .is_transport());
    }

    #[tokio::test]
    async fn test_delegation_txs() {
        let config = config();
        let signer = FixedSigner {
            address: AccAddress::from_bech32(ADDR).unwrap(),
        };
        let ctx = TxContext::new(0, 1).with_memo("my memo");

        let mut mock = MockChainTransport::new();
        mock.expect_broadcast()
            .withf(|tx, mode| {
                *mode == BroadcastMode::Block
                    && tx.memo == "my memo"
                    && matches!(&tx.msg[0], Msg::Delegate(m) if m.quantity.to_string() == "10.24000000okt")
            })
            .times(1)
            .returning(|_, _| Ok(TxResponse::default()));
        mock.expect_broadcast()
            .withf(|tx, _| matches!(&tx.msg[0], Msg::AddShares(m) if m.validator_addresses.len() == 1))
            .times(1)
            .returning(|_, _| Ok(TxResponse::default()));
        let client = StakingClient::new(&mock, &config);

        client.delegate(&signer, "10.24okt", &ctx).await.unwrap();
        client.add_shares(&signer, &[VAL_ADDR], &ctx).await.unwrap();

        assert!(client.undelegate(&signer, "0okt", &ctx).await.unwrap_err().is_invalid_input());
        assert!(client.undelegate(&signer, "okt", &ctx).await.is_err());
        assert!(client.add_shares(&signer, &[], &ctx).await.is_err());
        assert!(client.add_shares(&signer, &[ADDR], &ctx).await.is_err());
    }
}
