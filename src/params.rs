//! Query parameter records and their validation
//!
//! Constructors only apply default substitution. The `check_*` functions hold
//! the cross-field rules and run before any parameter record is built, so an
//! invalid request never reaches the transport.

use serde::{Deserialize, Serialize};

use crate::address::{AccAddress, validate_acc_address};
use crate::error::{Error, Result};
use crate::types::Side;

const DEFAULT_BOOK_SIZE: i64 = 200;
const DEFAULT_PAGE: i64 = 1;
const DEFAULT_PER_PAGE: i64 = 50;
const DEFAULT_TICKERS_COUNT: i64 = 10;
const MAX_CANDLES_SIZE: i64 = 1000;

/// Candle widths in seconds accepted by the backend
pub const CANDLE_GRANULARITIES: [i64; 12] = [
    60, 180, 300, 900, 1800, 3600, 7200, 14400, 21600, 43200, 86400, 604800,
];

/// Params to query a specific token held by an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryAccTokenParams {
    pub symbol: String,
    pub show: String,
}

impl QueryAccTokenParams {
    pub fn new(symbol: impl Into<String>, show: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            show: show.into(),
        }
    }
}

/// Params to query the depth book of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryDepthBookParams {
    pub product: String,
    pub size: i64,
}

impl QueryDepthBookParams {
    /// A zero size falls back to 200 levels.
    pub fn new(product: impl Into<String>, size: i64) -> Self {
        Self {
            product: product.into(),
            size: if size == 0 { DEFAULT_BOOK_SIZE } else { size },
        }
    }
}

/// Params to query the klines of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryKlinesParams {
    pub product: String,
    pub granularity: i64,
    pub size: i64,
}

impl QueryKlinesParams {
    pub fn new(product: impl Into<String>, granularity: i64, size: i64) -> Self {
        Self {
            product: product.into(),
            granularity,
            size,
        }
    }
}

/// Params to query tickers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTickerParams {
    pub product: String,
    pub count: i64,
    pub sort: bool,
}

impl QueryTickerParams {
    pub fn new(product: impl Into<String>, count: i64, sort: bool) -> Self {
        Self {
            product: product.into(),
            count,
            sort,
        }
    }
}

/// Params to query match (trade) records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryMatchParams {
    pub product: String,
    pub start: i64,
    pub end: i64,
    pub page: i64,
    pub per_page: i64,
}

impl QueryMatchParams {
    pub fn new(product: impl Into<String>, start: i64, end: i64, page: i64, per_page: i64) -> Self {
        let (page, per_page) = default_paging(page, per_page);
        Self {
            product: product.into(),
            start,
            end,
            page,
            per_page,
        }
    }
}

/// Params to query open or closed orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryOrderListParams {
    pub address: String,
    pub product: String,
    pub page: i64,
    pub per_page: i64,
    pub start: i64,
    pub end: i64,
    pub side: String,
    pub hide_no_fill: bool,
}

impl QueryOrderListParams {
    /// When both `start` and `end` are zero, `end` becomes the current unix time.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        address: impl Into<String>,
        product: impl Into<String>,
        side: impl Into<String>,
        page: i64,
        per_page: i64,
        start: i64,
        end: i64,
        hide_no_fill: bool,
    ) -> Self {
        let (page, per_page) = default_paging(page, per_page);
        let end = if start == 0 && end == 0 {
            chrono::Utc::now().timestamp()
        } else {
            end
        };
        Self {
            address: address.into(),
            product: product.into(),
            page,
            per_page,
            start,
            end,
            side: side.into(),
            hide_no_fill,
        }
    }
}

/// Params to query the deals of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryDealsParams {
    pub address: String,
    pub product: String,
    pub start: i64,
    pub end: i64,
    pub page: i64,
    pub per_page: i64,
    pub side: String,
}

impl QueryDealsParams {
    pub fn new(
        address: impl Into<String>,
        product: impl Into<String>,
        start: i64,
        end: i64,
        page: i64,
        per_page: i64,
        side: impl Into<String>,
    ) -> Self {
        let (page, per_page) = default_paging(page, per_page);
        Self {
            address: address.into(),
            product: product.into(),
            start,
            end,
            page,
            per_page,
            side: side.into(),
        }
    }
}

/// Params to query the transactions of an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryTxListParams {
    pub address: String,
    pub tx_type: i64,
    pub start_time: i64,
    pub end_time: i64,
    pub page: i64,
    pub per_page: i64,
}

impl QueryTxListParams {
    pub fn new(
        address: impl Into<String>,
        tx_type: i64,
        start_time: i64,
        end_time: i64,
        page: i64,
        per_page: i64,
    ) -> Self {
        let (page, per_page) = default_paging(page, per_page);
        Self {
            address: address.into(),
            tx_type,
            start_time,
            end_time,
            page,
            per_page,
        }
    }
}

/// Params to query delegator info
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDelegatorParams {
    #[serde(rename = "DelegatorAddr")]
    pub delegator_addr: AccAddress,
}

impl QueryDelegatorParams {
    pub fn new(delegator_addr: AccAddress) -> Self {
        Self { delegator_addr }
    }
}

/// Params to query token pairs listed on the dex
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryDexInfoParams {
    pub owner: String,
    pub page: i64,
    pub per_page: i64,
}

impl QueryDexInfoParams {
    /// Validates the owner address (empty means any owner) and requires
    /// positive paging.
    pub fn new(owner: impl Into<String>, page: i64, per_page: i64) -> Result<Self> {
        let owner = owner.into();
        if !owner.is_empty() && validate_acc_address(&owner).is_err() {
            return Err(Error::Address(format!("invalid address: {}", owner)));
        }
        if page <= 0 {
            return Err(Error::InvalidParameter(format!("invalid page: {}", page)));
        }
        if per_page <= 0 {
            return Err(Error::InvalidParameter(format!("invalid per-page: {}", per_page)));
        }
        Ok(Self {
            owner,
            page,
            per_page,
        })
    }
}

/// Params to query an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryAccountParams {
    pub address: AccAddress,
}

fn default_paging(page: i64, per_page: i64) -> (i64, i64) {
    if page == 0 && per_page == 0 {
        (DEFAULT_PAGE, DEFAULT_PER_PAGE)
    } else {
        (page, per_page)
    }
}

// ============================================================================
// Cross-field validation
// ============================================================================

/// Products are required wherever one is named.
pub fn check_product(product: &str) -> Result<()> {
    if product.is_empty() {
        return Err(Error::InvalidParameter("empty product".to_string()));
    }
    Ok(())
}

/// Side filters are either empty or exactly BUY / SELL.
pub fn check_side(side: &str) -> Result<()> {
    if side.is_empty() {
        return Ok(());
    }
    side.parse::<Side>().map(|_| ())
}

/// Times and paging must be non-negative and `start` may not be after `end`.
pub fn check_paging(start: i64, end: i64, page: i64, per_page: i64) -> Result<()> {
    for (name, value) in [("start", start), ("end", end), ("page", page), ("per-page", per_page)] {
        if value < 0 {
            return Err(Error::InvalidParameter(format!(
                "invalid {}: {} (negative)",
                name, value
            )));
        }
    }
    if start > end {
        return Err(Error::InvalidParameter(format!(
            "invalid time range: start {} is later than end {}",
            start, end
        )));
    }
    Ok(())
}

/// Rules shared by the open / closed order list queries.
#[allow(clippy::too_many_arguments)]
pub fn check_query_orders_params(
    address: &str,
    product: &str,
    side: &str,
    start: i64,
    end: i64,
    page: i64,
    per_page: i64,
) -> Result<()> {
    validate_acc_address(address)?;
    check_product(product)?;
    check_side(side)?;
    check_paging(start, end, page, per_page)
}

#[allow(clippy::too_many_arguments)]
pub fn check_query_deals_params(
    address: &str,
    product: &str,
    side: &str,
    start: i64,
    end: i64,
    page: i64,
    per_page: i64,
) -> Result<()> {
    check_query_orders_params(address, product, side, start, end, page, per_page)
}

pub fn check_query_match_params(
    product: &str,
    start: i64,
    end: i64,
    page: i64,
    per_page: i64,
) -> Result<()> {
    check_product(product)?;
    check_paging(start, end, page, per_page)
}

pub fn check_query_tx_list_params(
    address: &str,
    tx_type: i64,
    start: i64,
    end: i64,
    page: i64,
    per_page: i64,
) -> Result<()> {
    validate_acc_address(address)?;
    if tx_type < 0 {
        return Err(Error::InvalidParameter(format!("invalid tx type: {}", tx_type)));
    }
    check_paging(start, end, page, per_page)
}

pub fn check_query_candles_params(product: &str, granularity: i64, size: i64) -> Result<()> {
    check_product(product)?;
    if !CANDLE_GRANULARITIES.contains(&granularity) {
        return Err(Error::InvalidParameter(format!(
            "invalid granularity: {}",
            granularity
        )));
    }
    if size <= 0 || size > MAX_CANDLES_SIZE {
        return Err(Error::InvalidParameter(format!(
            "invalid size: {} (expected 1..={})",
            size, MAX_CANDLES_SIZE
        )));
    }
    Ok(())
}

/// Resolve the optional ticker count: absent means 10, negative is rejected.
pub fn ticker_count(count: Option<i64>) -> Result<i64> {
    match count {
        None => Ok(DEFAULT_TICKERS_COUNT),
        Some(count) if count < 0 => Err(Error::InvalidParameter(format!(
            "invalid count: {} (negative)",
            count
        ))),
        Some(count) => Ok(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR: &str = "okchain1dcsxvxgj374dv3wt9szflf9nz6342juzzkjnlz";
    const PRODUCT: &str = "btc-000_okt";

    #[test]
    fn test_paging_defaults() {
        let params = QueryMatchParams::new(PRODUCT, 0, 0, 0, 0);
        assert_eq!((params.page, params.per_page), (1, 50));

        let params = QueryDealsParams::new(ADDR, PRODUCT, 0, 0, 0, 0, "BUY");
        assert_eq!((params.page, params.per_page), (1, 50));

        let params = QueryTxListParams::new(ADDR, 1, 0, 0, 0, 0);
        assert_eq!((params.page, params.per_page), (1, 50));

        // only the (0, 0) pair is substituted
        let params = QueryMatchParams::new(PRODUCT, 0, 0, 0, 30);
        assert_eq!((params.page, params.per_page), (0, 30));
        let params = QueryMatchParams::new(PRODUCT, 0, 0, 2, 30);
        assert_eq!((params.page, params.per_page), (2, 30));
    }

    #[test]
    fn test_order_list_end_defaults_to_now() {
        let before = chrono::Utc::now().timestamp();
        let params = QueryOrderListParams::new(ADDR, PRODUCT, "", 0, 0, 0, 0, false);
        let after = chrono::Utc::now().timestamp();
        assert_eq!(params.start, 0);
        assert!(params.end >= before && params.end <= after);
        assert_eq!((params.page, params.per_page), (1, 50));

        let params = QueryOrderListParams::new(ADDR, PRODUCT, "", 1, 30, 0, 100, false);
        assert_eq!((params.start, params.end), (0, 100));
    }

    #[test]
    fn test_depth_book_default_size() {
        assert_eq!(QueryDepthBookParams::new(PRODUCT, 0).size, 200);
        assert_eq!(QueryDepthBookParams::new(PRODUCT, 5).size, 5);
    }

    #[test]
    fn test_dex_info_params_validation() {
        let params = QueryDexInfoParams::new("", 1, 10).unwrap();
        assert_eq!(params.owner, "");
        assert!(QueryDexInfoParams::new(ADDR, 1, 10).is_ok());

        let err = QueryDexInfoParams::new(&ADDR[1..], 1, 10).unwrap_err();
        assert!(err.to_string().contains(&ADDR[1..]));
        let err = QueryDexInfoParams::new(ADDR, 0, 10).unwrap_err();
        assert!(err.to_string().contains("invalid page: 0"));
        let err = QueryDexInfoParams::new(ADDR, 1, -1).unwrap_err();
        assert!(err.to_string().contains("invalid per-page: -1"));
    }

    #[test]
    fn test_check_query_orders_params_matrix() {
        assert!(check_query_orders_params(ADDR, PRODUCT, "BUY", 0, 0, 1, 30).is_ok());
        assert!(check_query_orders_params(ADDR, PRODUCT, "", 0, 0, 1, 30).is_ok());

        let cases = [
            (&ADDR[1..], PRODUCT, "BUY", 0, 0, 1, 30),
            (ADDR, "", "BUY", 0, 0, 1, 30),
            (ADDR, PRODUCT, "BUY&&SELL", 0, 0, 1, 30),
            (ADDR, PRODUCT, "BUY", 1, 0, 1, 30),
            (ADDR, PRODUCT, "BUY", -1, 0, 1, 30),
            (ADDR, PRODUCT, "BUY", 0, -1, 1, 30),
            (ADDR, PRODUCT, "BUY", 0, 0, -1, 30),
            (ADDR, PRODUCT, "BUY", 0, 0, 1, -1),
        ];
        for (addr, product, side, start, end, page, per_page) in cases {
            let err = check_query_orders_params(addr, product, side, start, end, page, per_page)
                .unwrap_err();
            assert!(err.is_invalid_input(), "unexpected error kind: {:?}", err);
        }
    }

    #[test]
    fn test_check_query_tx_list_params() {
        assert!(check_query_tx_list_params(ADDR, 2, 0, 0, 1, 30).is_ok());
        assert!(check_query_tx_list_params(ADDR, -1, 0, 0, 1, 30).is_err());
        assert!(check_query_tx_list_params(&ADDR[1..], 2, 0, 0, 1, 30).is_err());
        assert!(check_query_tx_list_params(ADDR, 2, 1, 0, 1, 30).is_err());
    }

    #[test]
    fn test_check_query_candles_params() {
        assert!(check_query_candles_params(PRODUCT, 60, 1).is_ok());
        assert!(check_query_candles_params("", 60, 1).is_err());
        assert!(check_query_candles_params(PRODUCT, 61, 1).is_err());
        assert!(check_query_candles_params(PRODUCT, 60, 0).is_err());
        assert!(check_query_candles_params(PRODUCT, 60, 1001).is_err());
    }

    #[test]
    fn test_ticker_count() {
        assert_eq!(ticker_count(None).unwrap(), 10);
        assert_eq!(ticker_count(Some(0)).unwrap(), 0);
        assert_eq!(ticker_count(Some(3)).unwrap(), 3);
        assert!(ticker_count(Some(-1)).is_err());
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(QueryTickerParams::new(PRODUCT, 10, true)).unwrap();
        assert_eq!(json, serde_json::json!({"product": PRODUCT, "count": 10, "sort": true}));

        let json = serde_json::to_value(QueryMatchParams::new(PRODUCT, 0, 0, 1, 30)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"Product": PRODUCT, "Start": 0, "End": 0, "Page": 1, "PerPage": 30})
        );

        let addr = AccAddress::from_bech32(ADDR).unwrap();
        let json = serde_json::to_value(QueryDelegatorParams::new(addr)).unwrap();
        assert_eq!(json, serde_json::json!({"DelegatorAddr": ADDR}));
    }
}
