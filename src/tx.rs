//! Transaction building, signing and broadcasting
//!
//! Messages are assembled into a [`StdSignDoc`] whose canonical JSON is handed
//! to a caller-supplied [`Signer`]. The signed [`StdTx`] is then broadcast
//! through the transport using the configured broadcast mode.
//!
//! Key management stays outside the SDK: implement [`Signer`] over whatever
//! keyring or hardware wallet holds the account key.

use serde::{Deserialize, Serialize, Serializer};
use tracing::{info, warn};

use crate::address::AccAddress;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::order::{MsgCancelOrder, MsgNewOrder};
use crate::rpc::TxResponse;
use crate::staking::{MsgAddShares, MsgDelegate, MsgUndelegate};
use crate::token::{MsgMint, MsgMultiSend, MsgSend};
use crate::transport::ChainTransport;
use crate::types::DecCoin;

/// Maximum memo size in bytes
pub const MAX_MEMO_LEN: usize = 256;

/// A chain message, serialized as `{"type": <route>, "value": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Msg {
    #[serde(rename = "okchain/token/MsgTransfer")]
    Send(MsgSend),
    #[serde(rename = "okchain/token/MsgMultiTransfer")]
    MultiSend(MsgMultiSend),
    #[serde(rename = "okchain/token/MsgMint")]
    Mint(MsgMint),
    #[serde(rename = "okchain/order/MsgNew")]
    NewOrder(MsgNewOrder),
    #[serde(rename = "okchain/order/MsgCancel")]
    CancelOrder(MsgCancelOrder),
    #[serde(rename = "okchain/staking/MsgDelegate")]
    Delegate(MsgDelegate),
    #[serde(rename = "okchain/staking/MsgUnDelegate")]
    Undelegate(MsgUndelegate),
    #[serde(rename = "okchain/staking/MsgAddShares")]
    AddShares(MsgAddShares),
}

impl Msg {
    /// Account that must sign this message.
    pub fn signer(&self) -> &AccAddress {
        match self {
            Msg::Send(msg) => &msg.from_address,
            Msg::MultiSend(msg) => &msg.from,
            Msg::Mint(msg) => &msg.owner,
            Msg::NewOrder(msg) => &msg.sender,
            Msg::CancelOrder(msg) => &msg.sender,
            Msg::Delegate(msg) => &msg.delegator_address,
            Msg::Undelegate(msg) => &msg.delegator_address,
            Msg::AddShares(msg) => &msg.delegator_address,
        }
    }
}

fn as_string<S: Serializer>(value: &u64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn from_string<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// Fee and gas limit of a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<DecCoin>,
    #[serde(serialize_with = "as_string", deserialize_with = "from_string")]
    pub gas: u64,
}

/// Amino-style public key attached to a signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    /// Base64 encoded key bytes
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    pub pub_key: PubKey,
    /// Base64 encoded signature
    pub signature: String,
}

/// The document a signer signs. Field order is the canonical (sorted) order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StdSignDoc<'a> {
    #[serde(serialize_with = "as_string")]
    pub account_number: u64,
    pub chain_id: &'a str,
    pub fee: &'a StdFee,
    pub memo: &'a str,
    pub msgs: &'a [Msg],
    #[serde(serialize_with = "as_string")]
    pub sequence: u64,
}

impl StdSignDoc<'_> {
    /// Canonical JSON bytes, HTML characters escaped the way the chain does.
    pub fn sign_bytes(&self) -> Result<Vec<u8>> {
        let json = serde_json::to_string(self)?;
        Ok(json
            .replace('&', "\\u0026")
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .into_bytes())
    }
}

/// A signed transaction ready for broadcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StdTx {
    pub msg: Vec<Msg>,
    pub fee: StdFee,
    pub signatures: Vec<StdSignature>,
    pub memo: String,
}

/// Produces signatures for one account.
pub trait Signer: Send + Sync {
    /// Address of the signing account.
    fn address(&self) -> AccAddress;

    /// Sign the canonical sign bytes of a transaction.
    fn sign(&self, sign_bytes: &[u8]) -> Result<StdSignature>;
}

/// Account-specific inputs of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxContext {
    pub account_number: u64,
    pub sequence: u64,
    pub memo: String,
}

impl TxContext {
    pub fn new(account_number: u64, sequence: u64) -> Self {
        Self {
            account_number,
            sequence,
            memo: String::new(),
        }
    }

    pub fn with_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }
}

/// Build and sign a transaction carrying `msgs`.
///
/// Every message must be signed by `signer`, the memo is limited to
/// [`MAX_MEMO_LEN`] bytes, and fee and gas come from `config`.
pub fn build_std_tx(
    config: &ClientConfig,
    signer: &dyn Signer,
    msgs: Vec<Msg>,
    ctx: &TxContext,
) -> Result<StdTx> {
    if msgs.is_empty() {
        return Err(Error::Transaction("no messages to sign".to_string()));
    }
    if ctx.memo.len() > MAX_MEMO_LEN {
        return Err(Error::Transaction(format!(
            "memo exceeds {} bytes: {} bytes",
            MAX_MEMO_LEN,
            ctx.memo.len()
        )));
    }
    let signer_address = signer.address();
    if let Some(msg) = msgs.iter().find(|msg| *msg.signer() != signer_address) {
        return Err(Error::Transaction(format!(
            "message signer {} does not match signing account {}",
            msg.signer(),
            signer_address
        )));
    }

    let fee = StdFee {
        amount: config.fees.clone(),
        gas: config.gas,
    };
    let sign_doc = StdSignDoc {
        account_number: ctx.account_number,
        chain_id: &config.chain_id,
        fee: &fee,
        memo: &ctx.memo,
        msgs: &msgs,
        sequence: ctx.sequence,
    };
    let signature = signer.sign(&sign_doc.sign_bytes()?)?;

    Ok(StdTx {
        msg: msgs,
        fee,
        signatures: vec![signature],
        memo: ctx.memo.clone(),
    })
}

/// Sign `msgs` and broadcast them with the configured mode.
pub(crate) async fn sign_and_broadcast<T>(
    transport: &T,
    config: &ClientConfig,
    signer: &dyn Signer,
    msgs: Vec<Msg>,
    ctx: &TxContext,
) -> Result<TxResponse>
where
    T: ChainTransport + ?Sized,
{
    let tx = build_std_tx(config, signer, msgs, ctx)?;
    info!(
        "Broadcasting tx with {} message(s) from {} (mode: {})",
        tx.msg.len(),
        signer.address(),
        config.broadcast_mode.as_str()
    );
    let response = transport.broadcast(&tx, config.broadcast_mode).await?;
    if !response.is_success() {
        warn!(
            "Tx {} rejected with code {}: {}",
            response.txhash, response.code, response.raw_log
        );
    }
    Ok(response)
}

#[cfg(test)]
pub(crate) mod test_signer {
    use super::*;

    /// Deterministic signer that base64-encodes a fixed-size digest stand-in.
    pub struct FixedSigner {
        pub address: AccAddress,
    }

    impl Signer for FixedSigner {
        fn address(&self) -> AccAddress {
            self.address
        }

        fn sign(&self, sign_bytes: &[u8]) -> Result<StdSignature> {
            use base64::Engine;
            Ok(StdSignature {
                pub_key: PubKey {
                    key_type: "tendermint/PubKeySecp256k1".to_string(),
                    value: base64::engine::general_purpose::STANDARD.encode([2u8; 33]),
                },
                signature: base64::engine::general_purpose::STANDARD
                    .encode(&sign_bytes[..sign_bytes.len().min(64)]),
            })
        }
    }
}
