use thiserror::Error;

/// Error types for the OKChain SDK
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Address parsing error: {0}")]
    Address(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Caller input failed local validation; nothing was sent over the wire.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidParameter(_) | Error::Address(_))
    }

    /// The remote call itself failed.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Rpc(_) | Error::Network(_))
    }

    /// The returned bytes did not match the expected shape.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;
