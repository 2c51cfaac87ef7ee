//! Request encoding and response decoding
//!
//! Query parameters travel as JSON. Backend responses come back wrapped in a
//! base or list envelope; raw store reads come back as uvarint-length-prefixed
//! protobuf-compatible records. Every decode failure is reported as
//! [`Error::Decode`], distinct from the transport errors that precede it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::KvPair;

/// Envelope of single-value backend responses
#[derive(Debug, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub detail_msg: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

/// Envelope of paginated backend responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub code: u32,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub detail_msg: String,
    #[serde(default = "Option::default")]
    pub data: Option<ListDataRes<T>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListDataRes<T> {
    /// An empty page may arrive as `null`
    #[serde(default = "Option::default")]
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub param_page: ParamPage,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParamPage {
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
struct KvPairList {
    #[prost(message, repeated, tag = "1")]
    pairs: Vec<KvPair>,
}

/// Encode a parameter record as a JSON request payload.
pub fn encode_json<P: Serialize + ?Sized>(params: &P) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(params)?)
}

/// Decode a JSON payload, rejecting malformed or trailing bytes.
pub fn decode_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| Error::Decode(e.to_string()))
}

fn check_code(code: u32, msg: &str, detail_msg: &str) -> Result<()> {
    if code != 0 {
        return Err(Error::Rpc(format!(
            "backend returned code {}: {} {}",
            code, msg, detail_msg
        )));
    }
    Ok(())
}

/// Decode a base envelope and return its `data`; a null payload is the empty value.
pub fn decode_base_response<T: DeserializeOwned + Default>(bytes: &[u8]) -> Result<T> {
    let response: BaseResponse<T> = decode_json(bytes)?;
    check_code(response.code, &response.msg, &response.detail_msg)?;
    Ok(response.data.unwrap_or_default())
}

/// Decode a list envelope and return the records of the current page.
pub fn decode_list_response<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let response: ListResponse<T> = decode_json(bytes)?;
    check_code(response.code, &response.msg, &response.detail_msg)?;
    Ok(response
        .data
        .and_then(|list| list.data)
        .unwrap_or_default())
}

/// Decode a length-prefixed binary record. The prefix must account for
/// every remaining byte.
pub fn decode_length_prefixed<M: prost::Message + Default>(bytes: &[u8]) -> Result<M> {
    let mut buf = bytes;
    let len = prost::encoding::decode_varint(&mut buf)
        .map_err(|e| Error::Decode(format!("invalid length prefix: {}", e)))?;
    if len != buf.len() as u64 {
        return Err(Error::Decode(format!(
            "length prefix {} does not match payload of {} bytes",
            len,
            buf.len()
        )));
    }
    M::decode(buf).map_err(|e| Error::Decode(e.to_string()))
}

/// Decode the KV list returned by a subspace scan.
pub fn decode_kv_pairs(bytes: &[u8]) -> Result<Vec<KvPair>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    decode_length_prefixed::<KvPairList>(bytes).map(|list| list.pairs)
}
