//! Client configuration

use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{utils, BroadcastMode, DecCoin};

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default gas limit for transactions.
pub const DEFAULT_GAS: u64 = 200_000;

/// Configuration for the OKChain client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Tendermint RPC endpoint (e.g., "http://localhost:26657")
    pub node_uri: String,
    /// REST endpoint used to broadcast transactions (e.g., "http://localhost:1317")
    pub rest_uri: Option<String>,
    /// Chain id signed into every transaction
    pub chain_id: String,
    pub broadcast_mode: BroadcastMode,
    /// Fees attached to every transaction
    pub fees: Vec<DecCoin>,
    /// Gas limit attached to every transaction
    pub gas: u64,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a validated configuration.
    ///
    /// # Arguments
    /// * `node_uri` - Tendermint RPC endpoint
    /// * `chain_id` - Chain id of the target network
    /// * `broadcast_mode` - How transactions are broadcast
    /// * `fees` - Fee coins, e.g. "0.01okt"
    /// * `gas` - Gas limit, must be positive
    pub fn new(
        node_uri: impl Into<String>,
        chain_id: impl Into<String>,
        broadcast_mode: BroadcastMode,
        fees: &str,
        gas: u64,
    ) -> Result<Self> {
        let node_uri = node_uri.into();
        let chain_id = chain_id.into();
        if node_uri.trim().is_empty() {
            return Err(Error::Config("empty node uri".to_string()));
        }
        if chain_id.trim().is_empty() {
            return Err(Error::Config("empty chain id".to_string()));
        }
        if gas == 0 {
            return Err(Error::Config("gas must be positive".to_string()));
        }
        let fees = utils::parse_dec_coins(fees)
            .map_err(|e| Error::Config(format!("invalid fees {:?}: {}", fees, e)))?;

        Ok(Self {
            node_uri: node_uri.trim_end_matches('/').to_string(),
            rest_uri: None,
            chain_id,
            broadcast_mode,
            fees,
            gas,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Set the REST endpoint used for broadcasting.
    pub fn with_rest_uri(mut self, rest_uri: impl Into<String>) -> Self {
        self.rest_uri = Some(rest_uri.into().trim_end_matches('/').to_string());
        self
    }

    /// Set the HTTP request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            node_uri: std::env::var("OKCHAIN_NODE_URI")
                .unwrap_or_else(|_| "http://localhost:26657".to_string()),
            rest_uri: std::env::var("OKCHAIN_REST_URI").ok(),
            chain_id: std::env::var("OKCHAIN_CHAIN_ID")
                .unwrap_or_else(|_| "okchain".to_string()),
            broadcast_mode: BroadcastMode::default(),
            fees: Vec::new(),
            gas: DEFAULT_GAS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
