use crate::models::{Balances, FillResult, OcoResult, SellLevels, TradeParameters};

/// Position of the trade workflow. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeState {
    CollectTakeProfit,
    CollectBudget,
    CollectCoinSymbol,
    PlaceMarketBuy,
    ReportBuy,
    ComputeSellLevels,
    PlaceOcoSell,
    ReportSell,
    AskRepeat,
    Terminated,
}

/// Everything one trading cycle accumulates. Replaced wholesale when a new
/// cycle starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleState {
    pub balances: Balances,
    pub params: TradeParameters,
    pub fill: Option<FillResult>,
    pub levels: Option<SellLevels>,
    pub oco: Option<OcoResult>,
}

impl CycleState {
    pub fn new(balances: Balances) -> Self {
        Self {
            balances,
            ..Self::default()
        }
    }

    /// Earliest state whose inputs are still missing, used when a state is
    /// entered without the data it consumes.
    pub fn resume_point(&self) -> TradeState {
        if self.params.take_profit_percent.is_none() {
            TradeState::CollectTakeProfit
        } else if self.params.budget_quote.is_none() {
            TradeState::CollectBudget
        } else if self.params.coin_symbol.is_none() {
            TradeState::CollectCoinSymbol
        } else if self.fill.is_none() {
            TradeState::PlaceMarketBuy
        } else if self.levels.is_none() {
            TradeState::ComputeSellLevels
        } else {
            TradeState::AskRepeat
        }
    }
}

/// Exchange symbol for a coin bought with `quote_asset` (`ada` + `BTC` -> `ADABTC`).
pub fn trading_pair(coin_symbol: &str, quote_asset: &str) -> String {
    format!("{}{}", coin_symbol.to_uppercase(), quote_asset.to_uppercase())
}
