//! OKChain CLI - Command-line interface for the OKChain SDK
//!
//! Queries market data, staking state and account balances from a node and
//! prints the decoded records as JSON.

use clap::{Parser, Subcommand};
use okchain_sdk::{ClientConfig, OkChainClient, Result};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "okchain-cli")]
#[command(about = "OKChain SDK Command Line Interface", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Tendermint RPC endpoint (defaults to $OKCHAIN_NODE_URI)
    #[arg(short, long)]
    node: Option<String>,

    /// Chain id (defaults to $OKCHAIN_CHAIN_ID)
    #[arg(short, long)]
    chain_id: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Latest tickers of a product, or of every product
    Tickers {
        #[arg(short, long, default_value = "")]
        product: String,
        /// Number of tickers (defaults to 10)
        #[arg(short, long)]
        count: Option<i64>,
    },
    /// Candle rows of a product
    Candles {
        product: String,
        /// Candle width in seconds
        #[arg(short, long, default_value_t = 60)]
        granularity: i64,
        #[arg(short, long, default_value_t = 100)]
        size: i64,
    },
    /// Deals of an address on a product
    Deals {
        address: String,
        product: String,
        #[command(flatten)]
        filter: OrderFilter,
    },
    /// Open orders of an address
    OpenOrders {
        address: String,
        product: String,
        #[command(flatten)]
        filter: OrderFilter,
    },
    /// Closed orders of an address
    ClosedOrders {
        address: String,
        product: String,
        #[command(flatten)]
        filter: OrderFilter,
    },
    /// Recent match records of a product
    Matches {
        product: String,
        #[command(flatten)]
        window: Window,
    },
    /// Transactions of an address
    Transactions {
        address: String,
        /// Transaction kind, 0 for any
        #[arg(short = 't', long, default_value_t = 0)]
        tx_type: i64,
        #[command(flatten)]
        window: Window,
    },
    /// Every validator
    Validators,
    /// One validator by operator address
    Validator { address: String },
    /// Delegation state of an account
    Delegator { address: String },
    /// Token pairs listed on the dex
    Products {
        #[arg(short, long, default_value = "")]
        owner: String,
        #[arg(long, default_value_t = 1)]
        page: i64,
        #[arg(long, default_value_t = 50)]
        per_page: i64,
    },
    /// Depth book of a product
    DepthBook {
        product: String,
        /// Levels per side, 0 for the default of 200
        #[arg(short, long, default_value_t = 0)]
        size: i64,
    },
    /// Token balances of an account
    Tokens {
        address: String,
        #[arg(short, long)]
        symbol: Option<String>,
    },
    /// Account number and sequence of an account
    Account { address: String },
}

#[derive(clap::Args)]
struct Window {
    /// Start of the time window (unix seconds)
    #[arg(long, default_value_t = 0)]
    start: i64,
    /// End of the time window (unix seconds)
    #[arg(long, default_value_t = 0)]
    end: i64,
    #[arg(long, default_value_t = 0)]
    page: i64,
    #[arg(long, default_value_t = 0)]
    per_page: i64,
}

#[derive(clap::Args)]
struct OrderFilter {
    /// BUY or SELL, empty for both
    #[arg(long, default_value = "")]
    side: String,
    #[command(flatten)]
    window: Window,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        tracing_subscriber::fmt().with_env_filter("info").init();
    }

    let mut config = ClientConfig::default();
    if let Some(node) = &cli.node {
        config.node_uri = node.trim_end_matches('/').to_string();
    }
    if let Some(chain_id) = &cli.chain_id {
        config.chain_id = chain_id.clone();
    }
    let client = OkChainClient::new(config)?;

    match &cli.command {
        Commands::Tickers { product, count } => {
            print_json(&client.backend().query_tickers(product, *count).await?)?;
        }
        Commands::Candles {
            product,
            granularity,
            size,
        } => {
            print_json(
                &client
                    .backend()
                    .query_candles(product, *granularity, *size)
                    .await?,
            )?;
        }
        Commands::Deals {
            address,
            product,
            filter,
        } => {
            let w = &filter.window;
            let deals = client
                .backend()
                .query_deals(address, product, &filter.side, w.start, w.end, w.page, w.per_page)
                .await?;
            print_json(&deals)?;
        }
        Commands::OpenOrders {
            address,
            product,
            filter,
        } => {
            let w = &filter.window;
            let orders = client
                .backend()
                .query_open_orders(address, product, &filter.side, w.start, w.end, w.page, w.per_page)
                .await?;
            print_json(&orders)?;
        }
        Commands::ClosedOrders {
            address,
            product,
            filter,
        } => {
            let w = &filter.window;
            let orders = client
                .backend()
                .query_closed_orders(address, product, &filter.side, w.start, w.end, w.page, w.per_page)
                .await?;
            print_json(&orders)?;
        }
        Commands::Matches { product, window: w } => {
            let records = client
                .backend()
                .query_recent_tx_record(product, w.start, w.end, w.page, w.per_page)
                .await?;
            print_json(&records)?;
        }
        Commands::Transactions {
            address,
            tx_type,
            window: w,
        } => {
            let txs = client
                .backend()
                .query_transactions(address, *tx_type, w.start, w.end, w.page, w.per_page)
                .await?;
            print_json(&txs)?;
        }
        Commands::Validators => {
            print_json(&client.staking().query_validators().await?)?;
        }
        Commands::Validator { address } => {
            print_json(&client.staking().query_validator(address).await?)?;
        }
        Commands::Delegator { address } => {
            print_json(&client.staking().query_delegator(address).await?)?;
        }
        Commands::Products {
            owner,
            page,
            per_page,
        } => {
            print_json(&client.dex().query_products(owner, *page, *per_page).await?)?;
        }
        Commands::DepthBook { product, size } => {
            print_json(&client.order().query_depth_book(product, *size).await?)?;
        }
        Commands::Tokens { address, symbol } => {
            let info = client
                .token()
                .query_account_tokens(address, symbol.as_deref())
                .await?;
            print_json(&info)?;
        }
        Commands::Account { address } => {
            let account = client.auth().query_account(address).await?;
            println!("Address: {}", account.address);
            println!("Account number: {}", account.account_number);
            println!("Sequence: {}", account.sequence);
            for coin in &account.coins {
                println!("  {}", coin);
            }
        }
    }

    Ok(())
}
