//! Data carried through one trading cycle.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order type as reported by the exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    LimitMaker,
    StopLoss,
    StopLossLimit,
    TakeProfit,
    TakeProfitLimit,
    #[serde(other)]
    Other,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::LimitMaker => "LIMIT_MAKER",
            OrderType::StopLoss => "STOP_LOSS",
            OrderType::StopLossLimit => "STOP_LOSS_LIMIT",
            OrderType::TakeProfit => "TAKE_PROFIT",
            OrderType::TakeProfitLimit => "TAKE_PROFIT_LIMIT",
            OrderType::Other => "OTHER",
        };
        f.write_str(label)
    }
}

/// Free balances shown to the operator at the start of every cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balances {
    /// Asset spent on market buys (budget ceiling).
    pub quote: Decimal,
    /// Display-only balance.
    pub secondary: Decimal,
}

/// Operator answers for one cycle, filled in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeParameters {
    pub take_profit_percent: Option<Decimal>,
    pub budget_quote: Option<Decimal>,
    pub coin_symbol: Option<String>,
}

impl TradeParameters {
    /// All three answers, or `None` while any is still missing.
    pub fn complete(&self) -> Option<(Decimal, Decimal, &str)> {
        Some((
            self.take_profit_percent?,
            self.budget_quote?,
            self.coin_symbol.as_deref()?,
        ))
    }
}

/// One execution inside a market order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFill {
    pub price: Decimal,
    pub quantity: Decimal,
}

/// Exchange acknowledgement of a filled market buy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyOrder {
    pub order_id: u64,
    pub transact_time: DateTime<Utc>,
    pub executed_qty: Decimal,
    pub orig_qty: Decimal,
    pub order_type: OrderType,
    pub fills: Vec<OrderFill>,
}

/// The buy that the sell side is anchored to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillResult {
    pub price: Decimal,
    pub quantity: Decimal,
    pub order_id: u64,
    pub transact_time: DateTime<Utc>,
    pub executed_qty: Decimal,
    pub orig_qty: Decimal,
    pub order_type: OrderType,
}

impl FillResult {
    /// Takes the most recent fill of the order; `None` when the order has no fills.
    pub fn from_order(order: &BuyOrder) -> Option<Self> {
        let last = order.fills.last()?;
        Some(Self {
            price: last.price,
            quantity: last.quantity,
            order_id: order.order_id,
            transact_time: order.transact_time,
            executed_qty: order.executed_qty,
            orig_qty: order.orig_qty,
            order_type: order.order_type,
        })
    }
}

/// Prices of the three OCO legs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SellLevels {
    pub take_profit_price: Decimal,
    pub stop_price: Decimal,
    pub stop_limit_price: Decimal,
}

/// Everything the gateway needs to place the protective sell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcoSellRequest {
    pub pair: String,
    pub quantity: Decimal,
    pub levels: SellLevels,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeProfitLeg {
    pub price: Decimal,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopLeg {
    pub stop_price: Decimal,
    pub limit_price: Decimal,
    pub quantity: Decimal,
}

/// Accepted OCO order list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcoResult {
    pub transact_time: DateTime<Utc>,
    pub take_profit_leg: TakeProfitLeg,
    pub stop_leg: StopLeg,
}
