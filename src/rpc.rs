//! Wire structures for the Tendermint RPC and REST endpoints

use serde::{Deserialize, Deserializer, Serialize};

use crate::tx::StdTx;

/// RPC request structure
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<P> {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: P,
}

/// RPC response structure
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
pub(crate) struct RpcResponse<T> {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    pub result: Option<T>,
    pub error: Option<RpcError>,
}

/// RPC error structure
#[derive(Debug, Deserialize)]
pub(crate) struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Params of the `abci_query` method
#[derive(Debug, Serialize)]
pub(crate) struct AbciQueryParams {
    pub path: String,
    /// Hex encoded query payload
    pub data: String,
    pub height: String,
    pub prove: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AbciQueryResult {
    pub response: AbciQueryResponse,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AbciQueryResponse {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub codespace: String,
    /// Base64 encoded result
    #[serde(default)]
    pub value: Option<String>,
}

/// Body of a REST broadcast
#[derive(Debug, Serialize)]
pub(crate) struct BroadcastReq<'a> {
    pub tx: &'a StdTx,
    pub mode: &'a str,
}

/// Attribute of an ABCI event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(default)]
    pub value: String,
}

/// ABCI event with stringified attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// Per-message log of a delivered transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbciMessageLog {
    #[serde(default)]
    pub msg_index: u32,
    #[serde(default)]
    pub log: String,
    #[serde(default)]
    pub events: Vec<StringEvent>,
}

/// Result of broadcasting a transaction
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxResponse {
    #[serde(default, deserialize_with = "int_or_string")]
    pub height: i64,
    #[serde(default)]
    pub txhash: String,
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub logs: Vec<AbciMessageLog>,
    #[serde(default, deserialize_with = "int_or_string")]
    pub gas_wanted: i64,
    #[serde(default, deserialize_with = "int_or_string")]
    pub gas_used: i64,
    #[serde(default)]
    pub events: Vec<StringEvent>,
}

impl TxResponse {
    /// Whether the node accepted the transaction.
    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Integers arrive as JSON strings from amino JSON and as numbers elsewhere.
fn int_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(value) => Ok(value),
        IntOrString::Str(value) if value.is_empty() => Ok(0),
        IntOrString::Str(value) => value.parse().map_err(serde::de::Error::custom),
    }
}
