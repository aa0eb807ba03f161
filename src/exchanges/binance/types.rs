//! Binance spot REST payloads.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::{BuyOrder, OrderFill, OrderType};
use crate::utils::time::from_unix_millis;

/// Body of every non-2xx response: `{"code": -1013, "msg": "Filter failure: MARKET_LOT_SIZE"}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    pub msg: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountResponse {
    pub balances: Vec<AssetBalance>,
}

#[derive(Debug, Deserialize)]
pub struct AssetBalance {
    pub asset: String,
    pub free: Decimal,
    pub locked: Decimal,
}

impl AccountResponse {
    pub fn free(&self, asset: &str) -> Option<Decimal> {
        self.balances
            .iter()
            .find(|balance| balance.asset.eq_ignore_ascii_case(asset))
            .map(|balance| balance.free)
    }
}

/// `newOrderRespType=FULL` response of `POST /api/v3/order`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub symbol: String,
    pub order_id: u64,
    pub transact_time: i64,
    pub orig_qty: Decimal,
    pub executed_qty: Decimal,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(default)]
    pub fills: Vec<FillEntry>,
}

#[derive(Debug, Deserialize)]
pub struct FillEntry {
    pub price: Decimal,
    pub qty: Decimal,
}

impl From<OrderResponse> for BuyOrder {
    fn from(resp: OrderResponse) -> Self {
        BuyOrder {
            order_id: resp.order_id,
            transact_time: from_unix_millis(resp.transact_time),
            executed_qty: resp.executed_qty,
            orig_qty: resp.orig_qty,
            order_type: resp.order_type,
            fills: resp
                .fills
                .into_iter()
                .map(|fill| OrderFill {
                    price: fill.price,
                    quantity: fill.qty,
                })
                .collect(),
        }
    }
}

/// Response of `POST /api/v3/order/oco`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcoResponse {
    pub order_list_id: i64,
    #[serde(alias = "transactTime")]
    pub transaction_time: i64,
    pub order_reports: Vec<OrderReport>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReport {
    pub order_id: u64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub price: Decimal,
    pub orig_qty: Decimal,
    #[serde(default)]
    pub stop_price: Option<Decimal>,
}

impl OcoResponse {
    pub fn report(&self, order_type: OrderType) -> Option<&OrderReport> {
        self.order_reports
            .iter()
            .find(|report| report.order_type == order_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_full_market_order() {
        let raw = r#"{
            "symbol": "ADABTC", "orderId": 28, "orderListId": -1,
            "clientOrderId": "6gCrw2kRUAF9CvJDGP16IP", "transactTime": 1507725176595,
            "price": "0.00000000", "origQty": "1500.00000000", "executedQty": "1500.00000000",
            "cummulativeQuoteQty": "0.13579500", "status": "FILLED", "timeInForce": "GTC",
            "type": "MARKET", "side": "BUY",
            "fills": [
                {"price": "0.00009050", "qty": "1000.00000000", "commission": "1.0", "commissionAsset": "ADA", "tradeId": 56},
                {"price": "0.00009053", "qty": "500.00000000", "commission": "0.5", "commissionAsset": "ADA", "tradeId": 57}
            ]
        }"#;
        let resp: OrderResponse = serde_json::from_str(raw).unwrap();
        let order = BuyOrder::from(resp);
        assert_eq!(order.order_id, 28);
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.executed_qty, dec!(1500));
        assert_eq!(order.fills.len(), 2);
        assert_eq!(order.fills[1].price, dec!(0.00009053));
        assert_eq!(order.transact_time.timestamp_millis(), 1507725176595);
    }

    #[test]
    fn parses_oco_reports() {
        let raw = r#"{
            "orderListId": 0, "contingencyType": "OCO", "listStatusType": "EXEC_STARTED",
            "listOrderStatus": "EXECUTING", "listClientOrderId": "JYVpp3F0f5CAG15DhtrqLp",
            "transactionTime": 1563417480525, "symbol": "ADABTC",
            "orders": [],
            "orderReports": [
                {"symbol": "ADABTC", "orderId": 2, "orderListId": 0, "clientOrderId": "a",
                 "transactTime": 1563417480525, "price": "0.00004500", "origQty": "1500.00000000",
                 "executedQty": "0.00000000", "cummulativeQuoteQty": "0.00000000", "status": "NEW",
                 "timeInForce": "GTC", "type": "STOP_LOSS_LIMIT", "side": "SELL", "stopPrice": "0.00005000"},
                {"symbol": "ADABTC", "orderId": 3, "orderListId": 0, "clientOrderId": "b",
                 "transactTime": 1563417480525, "price": "0.00013580", "origQty": "1500.00000000",
                 "executedQty": "0.00000000", "cummulativeQuoteQty": "0.00000000", "status": "NEW",
                 "timeInForce": "GTC", "type": "LIMIT_MAKER", "side": "SELL"}
            ]
        }"#;
        let resp: OcoResponse = serde_json::from_str(raw).unwrap();
        let stop = resp.report(OrderType::StopLossLimit).unwrap();
        assert_eq!(stop.stop_price, Some(dec!(0.00005)));
        let take = resp.report(OrderType::LimitMaker).unwrap();
        assert_eq!(take.price, dec!(0.0001358));
        assert!(take.stop_price.is_none());
    }

    #[test]
    fn finds_free_balance_by_asset() {
        let raw = r#"{"balances": [
            {"asset": "BTC", "free": "0.01500000", "locked": "0.00000000"},
            {"asset": "USDT", "free": "120.5", "locked": "3"}
        ]}"#;
        let account: AccountResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(account.free("BTC"), Some(dec!(0.015)));
        assert_eq!(account.free("usdt"), Some(dec!(120.5)));
        assert_eq!(account.free("ETH"), None);
    }
}
