//! Exchange access used by the trade workflow.
//!
//! The workflow only sees [`ExchangeGateway`]; the Binance spot REST client
//! behind the `binance_exec` feature is one implementation of it.

pub mod errors;

#[cfg(feature = "binance_exec")]
pub mod binance;

pub use errors::{ExchangeError, ExchangeErrorKind, INVALID_SYMBOL_TEXT};

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{Balances, BuyOrder, OcoResult, OcoSellRequest};

#[async_trait]
pub trait ExchangeGateway: Send + Sync {
    /// `false` when the exchange cannot be reached.
    async fn check_connectivity(&self) -> bool;

    async fn fetch_balances(&self) -> Result<Balances, ExchangeError>;

    /// Market buy spending `quote_amount` of the quote asset on `pair`.
    async fn market_buy(&self, pair: &str, quote_amount: Decimal) -> Result<BuyOrder, ExchangeError>;

    /// Take-profit limit and stop-limit sell submitted as one OCO list.
    async fn oco_sell(&self, request: &OcoSellRequest) -> Result<OcoResult, ExchangeError>;
}
