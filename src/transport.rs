//! Request dispatch to an OKChain node
//!
//! [`ChainTransport`] is the capability set every module client is written
//! against. [`RpcTransport`] implements it over the Tendermint JSON-RPC
//! `abci_query` method, with transactions broadcast through the REST server.

use async_trait::async_trait;
use base64::Engine;
use rand::random;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::codec;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::rpc::{
    AbciQueryParams, AbciQueryResult, BroadcastReq, RpcRequest, RpcResponse, TxResponse,
};
use crate::tx::StdTx;
use crate::types::{BroadcastMode, KvPair};

/// Calls a client needs from the chain.
///
/// Errors are surfaced as-is; implementations do not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainTransport: Send + Sync {
    /// Run a custom query against `path` with an encoded request payload.
    async fn query(&self, path: &str, data: &[u8]) -> Result<Vec<u8>>;

    /// Read the raw value stored under `key`.
    ///
    /// # Arguments
    /// * `key` - Full store key
    /// * `store_name` - Module store, e.g. "staking"
    /// * `kind` - Query kind within the store, e.g. "key"
    async fn query_store(&self, key: &[u8], store_name: &str, kind: &str) -> Result<Vec<u8>>;

    /// List every key/value pair whose key starts with `prefix`.
    async fn query_subspace(&self, prefix: &[u8], store_name: &str) -> Result<Vec<KvPair>>;

    /// Submit a signed transaction.
    async fn broadcast(&self, tx: &StdTx, mode: BroadcastMode) -> Result<TxResponse>;
}

/// Transport over a Tendermint RPC endpoint and an optional REST server.
pub struct RpcTransport {
    endpoint: String,
    rest_endpoint: Option<String>,
    http: reqwest::Client,
}

impl RpcTransport {
    /// Create a transport for the endpoints and timeout of `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            endpoint: config.node_uri.clone(),
            rest_endpoint: config.rest_uri.clone(),
            http,
        })
    }

    /// Call a JSON-RPC method and deserialize the result into the requested type.
    async fn call<T, P>(&self, method: &str, params: P) -> Result<T>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let request = RpcRequest {
            jsonrpc: "2.0".to_string(),
            id: random::<u64>(),
            method: method.to_string(),
            params,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Rpc(format!(
                "RPC request failed with status: {}",
                response.status()
            )));
        }

        let body = response.bytes().await?;
        decode_rpc_response(&body)
    }

    async fn abci_query(&self, path: &str, data: &[u8]) -> Result<Vec<u8>> {
        debug!("abci_query {} ({} bytes)", path, data.len());
        let result: AbciQueryResult = self
            .call(
                "abci_query",
                AbciQueryParams {
                    path: path.to_string(),
                    data: hex::encode(data),
                    height: "0".to_string(),
                    prove: false,
                },
            )
            .await?;

        let response = result.response;
        if response.code != 0 {
            return Err(Error::Rpc(format!(
                "query {} failed with code {} ({}): {}",
                path, response.code, response.codespace, response.log
            )));
        }

        match response.value {
            None => Ok(Vec::new()),
            Some(value) => base64::engine::general_purpose::STANDARD
                .decode(value)
                .map_err(|e| Error::Decode(format!("invalid base64 query value: {}", e))),
        }
    }
}

/// Unwrap a JSON-RPC response body into its result.
fn decode_rpc_response<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let rpc_response: RpcResponse<T> = codec::decode_json(body)?;

    if let Some(error) = rpc_response.error {
        let data = error.data.map(|d| d.to_string()).unwrap_or_default();
        return Err(Error::Rpc(format!(
            "RPC error {}: {} {}",
            error.code, error.message, data
        )));
    }

    rpc_response
        .result
        .ok_or_else(|| Error::Rpc("RPC response missing result".to_string()))
}

#[async_trait]
impl ChainTransport for RpcTransport {
    async fn query(&self, path: &str, data: &[u8]) -> Result<Vec<u8>> {
        self.abci_query(&format!("/{}", path.trim_start_matches('/')), data)
            .await
    }

    async fn query_store(&self, key: &[u8], store_name: &str, kind: &str) -> Result<Vec<u8>> {
        self.abci_query(&format!("/store/{}/{}", store_name, kind), key)
            .await
    }

    async fn query_subspace(&self, prefix: &[u8], store_name: &str) -> Result<Vec<KvPair>> {
        let bytes = self
            .abci_query(&format!("/store/{}/subspace", store_name), prefix)
            .await?;
        codec::decode_kv_pairs(&bytes)
    }

    async fn broadcast(&self, tx: &StdTx, mode: BroadcastMode) -> Result<TxResponse> {
        let rest = self
            .rest_endpoint
            .as_deref()
            .ok_or_else(|| Error::Config("broadcasting requires a REST uri".to_string()))?;
        let url = format!("{}/txs", rest);
        debug!("POST {} (mode: {})", url, mode.as_str());

        let response = self
            .http
            .post(&url)
            .json(&BroadcastReq {
                tx,
                mode: mode.as_str(),
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(Error::Rpc(format!(
                "broadcast failed with status {}: {}",
                status,
                String::from_utf8_lossy(&body)
            )));
        }
        codec::decode_json(&body)
    }
}

// ============================================================================
// Query-then-decode helpers
// ============================================================================

/// Encode `params`, query `path` and decode a base response.
pub(crate) async fn query_data<T, P, R>(transport: &T, path: &str, params: &P) -> Result<R>
where
    T: ChainTransport + ?Sized,
    P: Serialize + ?Sized,
    R: DeserializeOwned + Default,
{
    let payload = codec::encode_json(params)?;
    debug!("query {}", path);
    let bytes = transport.query(path, &payload).await?;
    codec::decode_base_response(&bytes)
}

/// Encode `params`, query `path` and decode a list response.
pub(crate) async fn query_list<T, P, R>(transport: &T, path: &str, params: &P) -> Result<Vec<R>>
where
    T: ChainTransport + ?Sized,
    P: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let payload = codec::encode_json(params)?;
    debug!("query {}", path);
    let bytes = transport.query(path, &payload).await?;
    codec::decode_list_response(&bytes)
}
