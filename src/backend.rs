//! Market data and history served by the backend module
//!
//! Every query validates its inputs before anything is sent, so an invalid
//! address, product or paging window never reaches the node.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{
    self, QueryDealsParams, QueryKlinesParams, QueryMatchParams, QueryOrderListParams,
    QueryTickerParams, QueryTxListParams,
};
use crate::transport::{query_data, query_list, ChainTransport};

pub const CANDLES_PATH: &str = "custom/backend/candles";
pub const TICKERS_PATH: &str = "custom/backend/tickers";
pub const DEALS_PATH: &str = "custom/backend/deals";
pub const RECENT_TX_RECORD_PATH: &str = "custom/backend/matches";
pub const OPEN_ORDERS_PATH: &str = "custom/backend/openOrders";
pub const CLOSED_ORDERS_PATH: &str = "custom/backend/closedOrders";
pub const TRANSACTIONS_PATH: &str = "custom/backend/txs";

/// 24h market summary of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: String,
    pub product: String,
    pub timestamp: String,
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub price: Decimal,
    pub volume: Decimal,
    pub change: Decimal,
}

/// A filled order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    /// Milliseconds since the unix epoch
    pub timestamp: i64,
    pub block_height: i64,
    pub order_id: String,
    pub sender: String,
    pub product: String,
    pub side: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub fee: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub tx_hash: String,
    pub order_id: String,
    pub sender: String,
    pub product: String,
    pub side: String,
    pub price: Decimal,
    pub quantity: Decimal,
    pub status: i64,
    pub filled_avg_price: Decimal,
    pub remain_quantity: Decimal,
    /// Milliseconds since the unix epoch
    pub timestamp: i64,
}

/// A match of the periodic auction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub timestamp: i64,
    pub block_height: i64,
    pub product: String,
    pub price: Decimal,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "txhash")]
    pub tx_hash: String,
    #[serde(rename = "type")]
    pub tx_type: i64,
    pub address: String,
    pub symbol: String,
    pub side: i64,
    pub quantity: Decimal,
    pub fee: String,
    pub timestamp: i64,
}

/// Client of the backend query endpoints
pub struct BackendClient<'a, T: ?Sized> {
    transport: &'a T,
}

impl<'a, T: ChainTransport + ?Sized> BackendClient<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Get the candle rows of a product.
    ///
    /// # Arguments
    /// * `product` - Trading pair, e.g. "btc-000_okt"
    /// * `granularity` - Candle width in seconds, one of [`params::CANDLE_GRANULARITIES`]
    /// * `size` - Number of candles, 1 to 1000
    pub async fn query_candles(
        &self,
        product: &str,
        granularity: i64,
        size: i64,
    ) -> Result<Vec<Vec<String>>> {
        params::check_query_candles_params(product, granularity, size)?;
        let params = QueryKlinesParams::new(product, granularity, size);
        query_data(self.transport, CANDLES_PATH, &params).await
    }

    /// Get the tickers of a product, or of every product when `product` is empty.
    ///
    /// `count` defaults to 10 and results are always sorted.
    pub async fn query_tickers(&self, product: &str, count: Option<i64>) -> Result<Vec<Ticker>> {
        let count = params::ticker_count(count)?;
        let params = QueryTickerParams::new(product, count, true);
        query_data(self.transport, TICKERS_PATH, &params).await
    }

    /// Get the deals of an address on a product.
    ///
    /// # Arguments
    /// * `address` - Account address (bech32)
    /// * `product` - Trading pair
    /// * `side` - "BUY", "SELL" or "" for both
    /// * `start` / `end` - Unix time window in seconds
    /// * `page` / `per_page` - Paging, (0, 0) means the first page of 50
    #[allow(clippy::too_many_arguments)]
    pub async fn query_deals(
        &self,
        address: &str,
        product: &str,
        side: &str,
        start: i64,
        end: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Deal>> {
        params::check_query_deals_params(address, product, side, start, end, page, per_page)?;
        let params = QueryDealsParams::new(address, product, start, end, page, per_page, side);
        query_list(self.transport, DEALS_PATH, &params).await
    }

    /// Get the open orders of an address. A zero window ends now.
    #[allow(clippy::too_many_arguments)]
    pub async fn query_open_orders(
        &self,
        address: &str,
        product: &str,
        side: &str,
        start: i64,
        end: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Order>> {
        self.query_orders(OPEN_ORDERS_PATH, address, product, side, start, end, page, per_page)
            .await
    }

    /// Get the closed orders of an address. A zero window ends now.
    #[allow(clippy::too_many_arguments)]
    pub async fn query_closed_orders(
        &self,
        address: &str,
        product: &str,
        side: &str,
        start: i64,
        end: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Order>> {
        self.query_orders(CLOSED_ORDERS_PATH, address, product, side, start, end, page, per_page)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    async fn query_orders(
        &self,
        path: &str,
        address: &str,
        product: &str,
        side: &str,
        start: i64,
        end: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Order>> {
        params::check_query_orders_params(address, product, side, start, end, page, per_page)?;
        let params =
            QueryOrderListParams::new(address, product, side, page, per_page, start, end, false);
        query_list(self.transport, path, &params).await
    }

    /// Get the latest match records of a product.
    pub async fn query_recent_tx_record(
        &self,
        product: &str,
        start: i64,
        end: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<MatchResult>> {
        params::check_query_match_params(product, start, end, page, per_page)?;
        let params = QueryMatchParams::new(product, start, end, page, per_page);
        query_list(self.transport, RECENT_TX_RECORD_PATH, &params).await
    }

    /// Get the transactions of an address.
    ///
    /// # Arguments
    /// * `tx_type` - Transaction kind filter, 0 for any
    pub async fn query_transactions(
        &self,
        address: &str,
        tx_type: i64,
        start: i64,
        end: i64,
        page: i64,
        per_page: i64,
    ) -> Result<Vec<Transaction>> {
        params::check_query_tx_list_params(address, tx_type, start, end, page, per_page)?;
        let params = QueryTxListParams::new(address, tx_type, start, end, page, per_page);
        query_list(self.transport, TRANSACTIONS_PATH, &params).await
    }
}
