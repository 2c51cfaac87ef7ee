//! Dex module: token pairs listed for trading

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::QueryDexInfoParams;
use crate::transport::{query_list, ChainTransport};
use crate::types::DecCoin;

pub const PRODUCTS_PATH: &str = "custom/dex/products";

/// A listed trading pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub base_asset_symbol: String,
    pub quote_asset_symbol: String,
    #[serde(rename = "price")]
    pub init_price: Decimal,
    pub max_price_digit: i64,
    #[serde(rename = "max_size_digit")]
    pub max_quantity_digit: i64,
    #[serde(rename = "min_trade_size")]
    pub min_quantity: Decimal,
    pub id: u64,
    #[serde(default)]
    pub delisting: bool,
    pub owner: String,
    pub deposits: DecCoin,
    pub block_height: i64,
}

impl TokenPair {
    /// Product name, e.g. "btc-000_okt".
    pub fn product(&self) -> String {
        format!("{}_{}", self.base_asset_symbol, self.quote_asset_symbol)
    }
}

/// Client of the dex module
pub struct DexClient<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: ChainTransport + ?Sized> DexClient<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Get the token pairs listed by `owner`, or by anyone when `owner` is empty.
    ///
    /// # Arguments
    /// * `owner` - Account address of the listing owner, may be empty
    /// * `page` / `per_page` - Paging, both must be positive
    pub async fn query_products(
        &self,
        owner: &str,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<TokenPair>> {
        let params = QueryDexInfoParams::new(owner, page, per_page)?;
        query_list(self.transport, PRODUCTS_PATH, &params).await
    }
}
