//! Market data example: tickers, depth book and recent matches of a product

use okchain_sdk::{ClientConfig, OkChainClient, Result};

const PRODUCT: &str = "btc-000_okt";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Endpoints come from OKCHAIN_NODE_URI / OKCHAIN_CHAIN_ID
    let client = OkChainClient::new(ClientConfig::default())?;
    println!("Querying {} on {}", PRODUCT, client.config().node_uri);

    let tickers = client.backend().query_tickers(PRODUCT, None).await?;
    for ticker in &tickers {
        println!(
            "✓ {} price {} (24h high {}, low {}, volume {})",
            ticker.product, ticker.price, ticker.high, ticker.low, ticker.volume
        );
    }

    let book = client.order().query_depth_book(PRODUCT, 5).await?;
    println!("Depth book:");
    for ask in book.asks.iter().rev() {
        println!("  ask {} @ {}", ask.quantity, ask.price);
    }
    for bid in &book.bids {
        println!("  bid {} @ {}", bid.quantity, bid.price);
    }

    match client.backend().query_recent_tx_record(PRODUCT, 0, 0, 1, 10).await {
        Ok(records) => {
            println!("Recent matches:");
            for record in records {
                println!("  #{} {} @ {}", record.block_height, record.quantity, record.price);
            }
        }
        Err(e) => println!("⚠ Recent matches not available: {}", e),
    }

    Ok(())
}
