//! Entry point bundling the module clients over one transport

use crate::auth::AuthClient;
use crate::backend::BackendClient;
use crate::config::ClientConfig;
use crate::dex::DexClient;
use crate::error::Result;
use crate::order::OrderClient;
use crate::staking::StakingClient;
use crate::token::TokenClient;
use crate::transport::{ChainTransport, RpcTransport};

/// Client for an OKChain node.
///
/// Module clients borrow the transport and configuration, so they are cheap
/// to create per call:
///
/// ```no_run
/// use okchain_sdk::{ClientConfig, OkChainClient};
///
/// # async fn example() -> okchain_sdk::Result<()> {
/// let client = OkChainClient::new(ClientConfig::default())?;
/// let tickers = client.backend().query_tickers("btc-000_okt", None).await?;
/// # Ok(())
/// # }
/// ```
pub struct OkChainClient<T: ChainTransport = RpcTransport> {
    config: ClientConfig,
    transport: T,
}

impl OkChainClient<RpcTransport> {
    /// Create a client talking to the node configured in `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = RpcTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: ChainTransport> OkChainClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn backend(&self) -> BackendClient<'_, T> {
        BackendClient::new(&self.transport)
    }

    pub fn staking(&self) -> StakingClient<'_, T> {
        StakingClient::new(&self.transport, &self.config)
    }

    pub fn order(&self) -> OrderClient<'_, T> {
        OrderClient::new(&self.transport, &self.config)
    }

    pub fn dex(&self) -> DexClient<'_, T> {
        DexClient::new(&self.transport)
    }

    pub fn token(&self) -> TokenClient<'_, T> {
        TokenClient::new(&self.transport, &self.config)
    }

    pub fn auth(&self) -> AuthClient<'_, T> {
        AuthClient::new(&self.transport)
    }
}
