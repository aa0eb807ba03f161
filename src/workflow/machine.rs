//! The buy-then-protect loop.
//!
//! Each [`TradeState`] is handled by [`TradeWorkflow::step`], which takes the
//! cycle by value and hands back the next state together with the updated
//! cycle. Operator answers and gateway responses are awaited one at a time;
//! there is no timeout on an outstanding order call.

use log::{debug, info, warn};
use thiserror::Error;

use crate::exchanges::{ExchangeError, ExchangeErrorKind, ExchangeGateway};
use crate::models::{FillResult, OcoSellRequest};
use crate::strategy::{STOP_LIMIT_PERCENT, STOP_PERCENT, sell_levels};
use crate::utils::time::{format_timestamp, now_stamp};
use crate::workflow::messages;
use crate::workflow::operator::{Operator, Tone};
use crate::workflow::state::{CycleState, TradeState, trading_pair};
use crate::workflow::validator;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Asset spent on buys and appended to the coin name to form the pair.
    pub quote_asset: String,
    /// Balance shown next to the quote balance.
    pub secondary_asset: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            quote_asset: "BTC".to_string(),
            secondary_asset: "USDT".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Setup could not reach the exchange or read balances. Not retried.
    #[error("{message}")]
    Fatal {
        message: String,
        #[source]
        source: Option<ExchangeError>,
    },
    #[error("operator input closed: {0}")]
    InputClosed(#[from] std::io::Error),
}

pub struct TradeWorkflow<G, O> {
    gateway: G,
    operator: O,
    config: WorkflowConfig,
}

impl<G, O> TradeWorkflow<G, O>
where
    G: ExchangeGateway,
    O: Operator,
{
    pub fn new(gateway: G, operator: O, config: WorkflowConfig) -> Self {
        Self {
            gateway,
            operator,
            config,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    /// Checks connectivity, reads balances and runs cycles until the operator
    /// declines another one.
    pub async fn run(&mut self) -> Result<(), WorkflowError> {
        self.ensure_connected().await?;

        let mut cycle = self.begin_cycle().await?;
        let mut state = TradeState::CollectTakeProfit;
        while state != TradeState::Terminated {
            let (next, updated) = self.step(state, cycle).await?;
            debug!("workflow {state:?} -> {next:?}");
            state = next;
            cycle = updated;
        }
        info!("workflow terminated by operator");
        Ok(())
    }

    pub async fn ensure_connected(&mut self) -> Result<(), WorkflowError> {
        if self.gateway.check_connectivity().await {
            return Ok(());
        }
        self.operator.tell(Tone::Error, messages::CANT_CONNECT);
        Err(WorkflowError::Fatal {
            message: messages::CANT_CONNECT.to_string(),
            source: None,
        })
    }

    /// Fresh cycle with freshly fetched balances.
    pub async fn begin_cycle(&mut self) -> Result<CycleState, WorkflowError> {
        let balances = match self.gateway.fetch_balances().await {
            Ok(balances) => balances,
            Err(err) => {
                warn!("balance fetch failed: {err}");
                let message = messages::cant_get_balance(
                    &self.config.quote_asset,
                    &self.config.secondary_asset,
                );
                self.operator.tell(Tone::Error, &message);
                return Err(WorkflowError::Fatal {
                    message,
                    source: Some(ExchangeError {
                        kind: ExchangeErrorKind::ConnectivityFailure,
                        ..err
                    }),
                });
            }
        };

        let quote = &self.config.quote_asset;
        let secondary = &self.config.secondary_asset;
        self.operator.tell(
            Tone::Info,
            &format!("Available {quote}: {}", balances.quote.normalize()),
        );
        self.operator.tell(
            Tone::Info,
            &format!("Available {secondary}: {}", balances.secondary.normalize()),
        );
        self.operator.tell(
            Tone::Info,
            &format!("Stop at {STOP_PERCENT}%. Stop limit at {STOP_LIMIT_PERCENT}%."),
        );
        Ok(CycleState::new(balances))
    }

    /// Handles one state and returns the next one.
    pub async fn step(
        &mut self,
        state: TradeState,
        mut cycle: CycleState,
    ) -> Result<(TradeState, CycleState), WorkflowError> {
        let next = match state {
            TradeState::CollectTakeProfit => {
                let answer = self.operator.ask(messages::TAKE_PROFIT_PROMPT).await?;
                match validator::validate_number(&answer) {
                    Ok(percent) => {
                        cycle.params.take_profit_percent = Some(percent);
                        TradeState::CollectBudget
                    }
                    Err(err) => {
                        self.operator.tell(Tone::Warning, &err.to_string());
                        TradeState::CollectTakeProfit
                    }
                }
            }
            TradeState::CollectBudget => {
                let prompt = messages::budget_prompt(&self.config.quote_asset);
                let answer = self.operator.ask(&prompt).await?;
                match validator::validate_budget(&answer, cycle.balances.quote) {
                    Ok(budget) => {
                        cycle.params.budget_quote = Some(budget);
                        TradeState::CollectCoinSymbol
                    }
                    Err(err) => {
                        self.operator.tell(Tone::Warning, &err.to_string());
                        TradeState::CollectBudget
                    }
                }
            }
            TradeState::CollectCoinSymbol => {
                let answer = self.operator.ask(messages::COIN_PROMPT).await?;
                match validator::validate(&answer, false) {
                    Ok(parsed) => {
                        cycle.params.coin_symbol = Some(parsed.into_text());
                        TradeState::PlaceMarketBuy
                    }
                    Err(err) => {
                        self.operator.tell(Tone::Warning, &err.to_string());
                        TradeState::CollectCoinSymbol
                    }
                }
            }
            TradeState::PlaceMarketBuy => self.place_market_buy(&mut cycle).await,
            TradeState::ReportBuy => match &cycle.fill {
                Some(fill) => {
                    self.report_buy(fill);
                    TradeState::ComputeSellLevels
                }
                None => self.recover(state, &cycle),
            },
            TradeState::ComputeSellLevels => {
                match (&cycle.fill, cycle.params.take_profit_percent) {
                    (Some(fill), Some(take_profit)) => {
                        let levels = sell_levels(fill.price, take_profit);
                        info!(
                            "sell levels from fill {}: take profit {}, stop {}, stop limit {}",
                            fill.price,
                            levels.take_profit_price,
                            levels.stop_price,
                            levels.stop_limit_price
                        );
                        cycle.levels = Some(levels);
                        self.operator
                            .tell(Tone::Info, &format!("[{}] Requesting OCO order...", now_stamp()));
                        TradeState::PlaceOcoSell
                    }
                    _ => self.recover(state, &cycle),
                }
            }
            TradeState::PlaceOcoSell => self.place_oco_sell(&mut cycle).await,
            TradeState::ReportSell => {
                self.report_sell(&cycle);
                TradeState::AskRepeat
            }
            TradeState::AskRepeat => {
                let answer = self.operator.ask(messages::REPEAT_PROMPT).await?;
                match answer.trim() {
                    "yes" => {
                        cycle = self.begin_cycle().await?;
                        TradeState::CollectTakeProfit
                    }
                    "no" => TradeState::Terminated,
                    _ => TradeState::AskRepeat,
                }
            }
            TradeState::Terminated => TradeState::Terminated,
        };
        Ok((next, cycle))
    }

    async fn place_market_buy(&mut self, cycle: &mut CycleState) -> TradeState {
        let Some((_, budget, symbol)) = cycle.params.complete() else {
            return self.recover(TradeState::PlaceMarketBuy, cycle);
        };
        let pair = trading_pair(symbol, &self.config.quote_asset);

        self.operator
            .tell(Tone::Info, &format!("[{}] Placing market order...", now_stamp()));
        info!("market buy {pair} for {budget} {}", self.config.quote_asset);

        let result = self.gateway.market_buy(&pair, budget).await;
        let order = match result {
            Ok(order) => order,
            Err(err) => return self.route_buy_failure(err, cycle),
        };

        match FillResult::from_order(&order) {
            Some(fill) => {
                info!(
                    "market buy {pair} filled: order {} at {} qty {}",
                    fill.order_id, fill.price, fill.executed_qty
                );
                cycle.fill = Some(fill);
                TradeState::ReportBuy
            }
            None => {
                let err = ExchangeError::classify(format!(
                    "Market order {} returned no fills.",
                    order.order_id
                ));
                self.route_buy_failure(err, cycle)
            }
        }
    }

    fn route_buy_failure(&mut self, err: ExchangeError, cycle: &mut CycleState) -> TradeState {
        warn!("market buy failed ({:?}): {}", err.kind, err.raw_message);
        let message = err.operator_message(&self.config.quote_asset);
        self.operator.tell(Tone::Error, &message);

        match err.kind {
            ExchangeErrorKind::InvalidSymbol => {
                cycle.params.coin_symbol = None;
                TradeState::CollectCoinSymbol
            }
            ExchangeErrorKind::RateOrSizeRejected
            | ExchangeErrorKind::ConnectivityFailure
            | ExchangeErrorKind::Unknown => {
                cycle.params.budget_quote = None;
                cycle.params.coin_symbol = None;
                TradeState::CollectBudget
            }
        }
    }

    async fn place_oco_sell(&mut self, cycle: &mut CycleState) -> TradeState {
        let (Some(fill), Some(levels), Some(symbol)) =
            (&cycle.fill, cycle.levels, cycle.params.coin_symbol.as_deref())
        else {
            return self.recover(TradeState::PlaceOcoSell, cycle);
        };

        let request = OcoSellRequest {
            pair: trading_pair(symbol, &self.config.quote_asset),
            quantity: fill.executed_qty,
            levels,
        };
        info!(
            "oco sell {} qty {}: {} / {} / {}",
            request.pair,
            request.quantity,
            levels.take_profit_price,
            levels.stop_price,
            levels.stop_limit_price
        );

        match self.gateway.oco_sell(&request).await {
            Ok(oco) => {
                cycle.oco = Some(oco);
                TradeState::ReportSell
            }
            Err(err) => {
                // The buy already executed and is not rolled back.
                warn!("oco sell failed ({:?}): {}", err.kind, err.raw_message);
                self.operator.tell(Tone::Alert, messages::OCO_FAILED);
                let message = err.operator_message(&self.config.quote_asset);
                self.operator.tell(Tone::Error, &message);
                TradeState::AskRepeat
            }
        }
    }

    fn report_buy(&mut self, fill: &FillResult) {
        let lines = [
            format!("\tDate: {}", format_timestamp(fill.transact_time)),
            format!("\tOrder ID: {}", fill.order_id),
            format!("\tType: {}", fill.order_type),
            format!("\tExecuted Quantity: {}", fill.executed_qty.normalize()),
            format!("\tAmount Quantity: {}", fill.orig_qty.normalize()),
            format!("\tBought at: {}", fill.price.normalize()),
        ];
        self.operator.tell(Tone::Success, messages::BUY_FILLED);
        for line in &lines {
            self.operator.tell(Tone::Info, line);
        }
    }

    fn report_sell(&mut self, cycle: &CycleState) {
        let Some(oco) = &cycle.oco else {
            return;
        };
        let coin = cycle
            .params
            .coin_symbol
            .as_deref()
            .unwrap_or_default()
            .to_uppercase();
        let take = &oco.take_profit_leg;
        let stop = &oco.stop_leg;
        let lines = [
            format!("\tDate: {}", format_timestamp(oco.transact_time)),
            format!(
                "\tTake profit limit order placed at {} ({} {coin})",
                take.price.normalize(),
                take.quantity.normalize()
            ),
            format!(
                "\tStop loss placed at {} ({} {coin})",
                stop.stop_price.normalize(),
                stop.quantity.normalize()
            ),
            format!(
                "\tStop limit placed at {} ({} {coin})",
                stop.limit_price.normalize(),
                stop.quantity.normalize()
            ),
        ];
        self.operator.tell(Tone::Success, messages::OCO_PLACED);
        for line in &lines {
            self.operator.tell(Tone::Info, line);
        }
    }

    fn recover(&mut self, state: TradeState, cycle: &CycleState) -> TradeState {
        let resume = cycle.resume_point();
        warn!("entered {state:?} without its inputs, resuming at {resume:?}");
        resume
    }
}
