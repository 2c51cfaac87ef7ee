//! # OKChain SDK
//!
//! A Rust SDK for querying and transacting against OKChain nodes.
//!
//! This SDK provides typed access to:
//! - Backend market data (tickers, candles, deals, orders, match records, transactions)
//! - Staking state (validators, delegators) and delegation transactions
//! - The order book, token pairs, token balances and accounts
//! - Transaction building, signing through a caller-supplied [`tx::Signer`], and broadcasting
//!
//! Query inputs are validated before anything is sent, and every response is
//! decoded into typed records with [`rust_decimal::Decimal`] amounts.
//!
//! ## Example
//!
//! ```no_run
//! use okchain_sdk::{BroadcastMode, ClientConfig, OkChainClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new(
//!     "http://localhost:26657",
//!     "okchain",
//!     BroadcastMode::Block,
//!     "0.01okt",
//!     200000,
//! )?;
//! let client = OkChainClient::new(config)?;
//!
//! // Latest tickers of a product
//! let tickers = client.backend().query_tickers("btc-000_okt", None).await?;
//!
//! // Every validator in the staking store
//! let validators = client.staking().query_validators().await?;
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod auth;
pub mod backend;
pub mod client;
pub mod codec;
pub mod config;
pub mod dex;
pub mod error;
pub mod order;
pub mod params;
pub mod rpc;
pub mod staking;
pub mod token;
pub mod transport;
pub mod tx;
pub mod types;

pub use address::{AccAddress, ValAddress};
pub use client::OkChainClient;
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use transport::{ChainTransport, RpcTransport};

/// Re-export commonly used types
pub use types::*;

/// Re-export utility functions
pub use types::utils;

pub use order::order_ids_from_response;
