//! Order module: depth book queries and order transactions

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::address::AccAddress;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::params::{self, QueryDepthBookParams};
use crate::rpc::TxResponse;
use crate::transport::{query_data, ChainTransport};
use crate::tx::{sign_and_broadcast, Msg, Signer, TxContext};
use crate::types::{dec_string, utils, Side};

pub const DEPTH_BOOK_PATH: &str = "custom/order/depthbook";

/// One price level of the depth book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookResItem {
    pub price: Decimal,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRes {
    #[serde(default)]
    pub asks: Vec<BookResItem>,
    #[serde(default)]
    pub bids: Vec<BookResItem>,
}

/// Per-order outcome reported in the `orders` event attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderResult {
    #[serde(default)]
    pub code: u32,
    #[serde(default, rename = "msg")]
    pub message: String,
    #[serde(rename = "orderid")]
    pub order_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "dec_string")]
    pub price: Decimal,
    pub product: String,
    #[serde(with = "dec_string")]
    pub quantity: Decimal,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgNewOrder {
    pub order_items: Vec<OrderItem>,
    pub sender: AccAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgCancelOrder {
    pub order_ids: Vec<String>,
    pub sender: AccAddress,
}

/// Collect the ids of the orders created by a transaction.
///
/// Attributes whose value is not a valid order result list are logged and skipped.
pub fn order_ids_from_response(response: &TxResponse) -> Vec<String> {
    let mut order_ids = Vec::new();
    let attributes = response
        .events
        .iter()
        .filter(|event| event.event_type == "message")
        .flat_map(|event| event.attributes.iter())
        .filter(|attribute| attribute.key == "orders");

    for attribute in attributes {
        match serde_json::from_str::<Vec<OrderResult>>(&attribute.value) {
            Ok(results) => order_ids.extend(results.into_iter().map(|r| r.order_id)),
            Err(e) => warn!("Skipping malformed orders attribute: {}", e),
        }
    }
    order_ids
}

fn parse_positive(name: &str, raw: &str) -> Result<Decimal> {
    let value = utils::parse_dec(raw)?;
    if value <= Decimal::ZERO {
        return Err(Error::InvalidParameter(format!(
            "invalid {}: {} (must be positive)",
            name, raw
        )));
    }
    Ok(value)
}

/// Client of the order module
pub struct OrderClient<'a, T: ?Sized> {
    transport: &'a T,
    config: &'a ClientConfig,
}

impl<'a, T: ChainTransport + ?Sized> OrderClient<'a, T> {
    pub fn new(transport: &'a T, config: &'a ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Get the depth book of a product. A zero size returns 200 levels.
    pub async fn query_depth_book(&self, product: &str, size: i64) -> Result<BookRes> {
        params::check_product(product)?;
        if size < 0 {
            return Err(Error::InvalidParameter(format!(
                "invalid size: {} (negative)",
                size
            )));
        }
        let params = QueryDepthBookParams::new(product, size);
        query_data(self.transport, DEPTH_BOOK_PATH, &params).await
    }

    /// Place a limit order.
    ///
    /// # Arguments
    /// * `product` - Trading pair, e.g. "btc-000_okt"
    /// * `side` - "BUY" or "SELL"
    /// * `price` / `quantity` - Positive decimals with at most 8 places
    pub async fn new_order(
        &self,
        signer: &dyn Signer,
        product: &str,
        side: &str,
        price: &str,
        quantity: &str,
        ctx: &TxContext,
    ) -> Result<TxResponse> {
        params::check_product(product)?;
        let item = OrderItem {
            price: parse_positive("price", price)?,
            product: product.to_string(),
            quantity: parse_positive("quantity", quantity)?,
            side: side.parse()?,
        };
        let msg = Msg::NewOrder(MsgNewOrder {
            order_items: vec![item],
            sender: signer.address(),
        });
        sign_and_broadcast(self.transport, self.config, signer, vec![msg], ctx).await
    }

    /// Cancel one or more open orders by id.
    pub async fn cancel_order(
        &self,
        signer: &dyn Signer,
        order_ids: &[&str],
        ctx: &TxContext,
    ) -> Result<TxResponse> {
        if order_ids.is_empty() || order_ids.iter().any(|id| id.is_empty()) {
            return Err(Error::InvalidParameter(format!(
                "invalid order ids: {:?}",
                order_ids
            )));
        }
        let msg = Msg::CancelOrder(MsgCancelOrder {
            order_ids: order_ids.iter().map(|id| id.to_string()).collect(),
            sender: signer.address(),
        });
        sign_and_broadcast(self.transport, self.config, signer, vec![msg], ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::fixtures;
    use crate::rpc::{Attribute, StringEvent};
    use crate::transport::MockChainTransport;
    use crate::tx::test_signer::FixedSigner;
    use crate::types::BroadcastMode;
    use serde_json::json;
    use std::str::FromStr;

    const ADDR: &str = "okchain1dcsxvxgj374dv3wt9szflf9nz6342juzzkjnlz";
    const PRODUCT: &str = "btc-000_okt";

    fn config() -> ClientConfig {
        ClientConfig::new("testURL", "testChain", BroadcastMode::Block, "0.01okt", 200000).unwrap()
    }

    fn attribute(key: &str, value: &str) -> Attribute {
        Attribute {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_order_ids_from_response() {
        let response = TxResponse {
            events: vec![
                StringEvent {
                    event_type: "message".to_string(),
                    attributes: vec![
                        attribute("sender", ADDR),
                        attribute(
                            "orders",
                            r#"[{"code":0,"msg":"","orderid":"ID0000000001-1"},{"code":0,"msg":"","orderid":"ID0000000001-2"}]"#,
                        ),
                        attribute("orders", "not json"),
                    ],
                },
                StringEvent {
                    event_type: "transfer".to_string(),
                    attributes: vec![attribute("orders", r#"[{"orderid":"ignored"}]"#)],
                },
            ],
            ..Default::default()
        };

        assert_eq!(
            order_ids_from_response(&response),
            vec!["ID0000000001-1", "ID0000000001-2"]
        );
        assert!(order_ids_from_response(&TxResponse::default()).is_empty());
    }

    #[tokio::test]
    async fn test_query_depth_book() {
        let bytes = fixtures::base_response(json!({
            "asks": [{"price": "10.24", "quantity": "1.024"}],
            "bids": [{"price": "5.12", "quantity": "2.048"}],
        }));

        let mut mock = MockChainTransport::new();
        mock.expect_query()
            .withf(|path, data| {
                path == DEPTH_BOOK_PATH && data == br#"{"Product":"btc-000_okt","Size":200}"#
            })
            .times(1)
            .returning(move |_, _| Ok(bytes.clone()));
        let config = config();
        let book = OrderClient::new(&mock, &config)
            .query_depth_book(PRODUCT, 0)
            .await
            .unwrap();
        assert_eq!(book.asks[0].price, Decimal::from_str("10.24").unwrap());
        assert_eq!(book.bids[0].quantity, Decimal::from_str("2.048").unwrap());

        let idle = MockChainTransport::new();
        let client = OrderClient::new(&idle, &config);
        assert!(client.query_depth_book("", 0).await.is_err());
        assert!(client.query_depth_book(PRODUCT, -1).await.is_err());
    }

    #[tokio::test]
    async fn test_new_and_cancel_order() {
        let config = config();
        let signer = FixedSigner {
            address: AccAddress::from_bech32(ADDR).unwrap(),
        };
        let ctx = TxContext::new(1, 2);

        let mut mock = MockChainTransport::new();
        mock.expect_broadcast()
            .withf(|tx, _| {
                let json = serde_json::to_value(&tx.msg[0]).unwrap();
                json["type"] == "okchain/order/MsgNew"
                    && json["value"]["order_items"][0]["price"] == "10.24000000"
                    && json["value"]["order_items"][0]["side"] == "BUY"
            })
            .times(1)
            .returning(|_, _| Ok(TxResponse::default()));
        mock.expect_broadcast()
            .withf(|tx, _| matches!(&tx.msg[0], Msg::CancelOrder(m) if m.order_ids == ["ID0000000001-1"]))
            .times(1)
            .returning(|_, _| Ok(TxResponse::default()));
        let client = OrderClient::new(&mock, &config);

        client
            .new_order(&signer, PRODUCT, "BUY", "10.24", "1", &ctx)
            .await
            .unwrap();
        client
            .cancel_order(&signer, &["ID0000000001-1"], &ctx)
            .await
            .unwrap();

        assert!(client
            .new_order(&signer, PRODUCT, "BUY&&SELL", "10.24", "1", &ctx)
            .await
            .unwrap_err()
            .is_invalid_input());
        assert!(client
            .new_order(&signer, PRODUCT, "SELL", "-1", "1", &ctx)
            .await
            .is_err());
        assert!(client
            .new_order(&signer, PRODUCT, "SELL", "1", "0.000000001", &ctx)
            .await
            .is_err());
        assert!(client.new_order(&signer, "", "SELL", "1", "1", &ctx).await.is_err());
        assert!(client.cancel_order(&signer, &[], &ctx).await.is_err());
        assert!(client.cancel_order(&signer, &[""], &ctx).await.is_err());
    }
}
