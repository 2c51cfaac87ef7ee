//! Token module: balances, transfers and minting

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::AccAddress;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::params::QueryAccTokenParams;
use crate::rpc::TxResponse;
use crate::transport::{query_data, ChainTransport};
use crate::tx::{sign_and_broadcast, Msg, Signer, TxContext};
use crate::types::{utils, DecCoin};

pub const ACCOUNT_TOKENS_PATH: &str = "custom/token/accounts";

/// Balance of one token held by an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinInfo {
    pub symbol: String,
    pub available: Decimal,
    pub freeze: Decimal,
    pub locked: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountTokensInfo {
    pub address: String,
    #[serde(default)]
    pub currencies: Vec<CoinInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgSend {
    pub amount: Vec<DecCoin>,
    pub from_address: AccAddress,
    pub to_address: AccAddress,
}

/// Recipient and coins of one leg of a multi-send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferUnit {
    pub coins: Vec<DecCoin>,
    pub to: AccAddress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgMultiSend {
    pub from: AccAddress,
    pub transfers: Vec<TransferUnit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsgMint {
    pub amount: DecCoin,
    pub owner: AccAddress,
}

fn parse_positive_coins(raw: &str) -> Result<Vec<DecCoin>> {
    let coins = utils::parse_dec_coins(raw)?;
    if coins.is_empty() || coins.iter().any(|coin| coin.amount.is_zero()) {
        return Err(Error::InvalidParameter(format!(
            "invalid amount {:?}: coins must be positive",
            raw
        )));
    }
    Ok(coins)
}

/// Parse multi-send legs, one per line: `<address> <coins>`.
///
/// ```text
/// okchain1dcsxvxgj374dv3wt9szflf9nz6342juzzkjnlz 1.024okt,2.048btc-000
/// okchain1npm82ty95j9s7xja5s92hajwszdklh7kch23as 10okt
/// ```
pub fn parse_transfer_units(raw: &str) -> Result<Vec<TransferUnit>> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| -> Result<TransferUnit> {
            let (to, coins) = line.split_once(char::is_whitespace).ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "invalid transfer {:?}: expected <address> <coins>",
                    line
                ))
            })?;
            Ok(TransferUnit {
                coins: parse_positive_coins(coins.trim())?,
                to: AccAddress::from_bech32(to)?,
            })
        })
        .collect()
}

/// Client of the token module
pub struct TokenClient<'a, T: ?Sized> {
    transport: &'a T,
    config: &'a ClientConfig,
}

impl<'a, T: ChainTransport + ?Sized> TokenClient<'a, T> {
    pub fn new(transport: &'a T, config: &'a ClientConfig) -> Self {
        Self { transport, config }
    }

    /// Get the token balances of an account.
    ///
    /// # Arguments
    /// * `address` - Account address (bech32)
    /// * `symbol` - Restrict the result to one token, or `None` for every token
    pub async fn query_account_tokens(
        &self,
        address: &str,
        symbol: Option<&str>,
    ) -> Result<AccountTokensInfo> {
        let account = AccAddress::from_bech32(address)?;
        let params = match symbol {
            Some(symbol) => QueryAccTokenParams::new(symbol, "partial"),
            None => QueryAccTokenParams::new("", "all"),
        };
        let path = format!("{}/{}", ACCOUNT_TOKENS_PATH, account);
        query_data(self.transport, &path, &params).await
    }

    /// Transfer coins, e.g. `amount = "10.24okt,1btc-000"`.
    pub async fn send(
        &self,
        signer: &dyn Signer,
        to: &str,
        amount: &str,
        ctx: &TxContext,
    ) -> Result<TxResponse> {
        let msg = Msg::Send(MsgSend {
            amount: parse_positive_coins(amount)?,
            from_address: signer.address(),
            to_address: AccAddress::from_bech32(to)?,
        });
        sign_and_broadcast(self.transport, self.config, signer, vec![msg], ctx).await
    }

    /// Transfer coins to several recipients in one message.
    pub async fn multi_send(
        &self,
        signer: &dyn Signer,
        transfers: Vec<TransferUnit>,
        ctx: &TxContext,
    ) -> Result<TxResponse> {
        if transfers.is_empty() {
            return Err(Error::InvalidParameter("no transfers to send".to_string()));
        }
        if transfers
            .iter()
            .any(|unit| unit.coins.is_empty() || unit.coins.iter().any(|c| c.amount.is_zero()))
        {
            return Err(Error::InvalidParameter(
                "every transfer needs a positive amount".to_string(),
            ));
        }
        let msg = Msg::MultiSend(MsgMultiSend {
            from: signer.address(),
            transfers,
        });
        sign_and_broadcast(self.transport, self.config, signer, vec![msg], ctx).await
    }

    /// Mint more of a token owned by the signer, e.g. `amount = "1024xxb-781"`.
    pub async fn mint(&self, signer: &dyn Signer, amount: &str, ctx: &TxContext) -> Result<TxResponse> {
        let amount = utils::parse_dec_coin(amount)?;
        if amount.amount.is_zero() {
            return Err(Error::InvalidParameter(format!(
                "invalid mint amount: {}",
                amount
            )));
        }
        let msg = Msg::Mint(MsgMint {
            amount,
            owner: signer.address(),
        });
        sign_and_broadcast(self.transport, self.config, signer, vec![msg], ctx).await
    }
}
