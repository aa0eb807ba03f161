//! Signed Binance spot REST client.
//!
//! Signed endpoints take the HMAC-SHA256 of the url-encoded query (hex) as a
//! trailing `signature` parameter and the api key in `X-MBX-APIKEY`.

use std::sync::Arc;

use async_trait::async_trait;
use hmac::{Hmac, Mac};
use log::{debug, warn};
use reqwest::{Client, Method, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use sha2::Sha256;

use super::types::{AccountResponse, ApiErrorBody, OcoResponse, OrderResponse};
use crate::config::Credentials;
use crate::exchanges::{ExchangeError, ExchangeGateway};
use crate::models::{
    Balances, BuyOrder, OcoResult, OcoSellRequest, OrderType, StopLeg, TakeProfitLeg,
};
use crate::utils::time::{current_unix_millis, from_unix_millis};

pub const BINANCE_REST_URL: &str = "https://api.binance.com";

const PING: &str = "/api/v3/ping";
const ACCOUNT: &str = "/api/v3/account";
const ORDER: &str = "/api/v3/order";
const ORDER_OCO: &str = "/api/v3/order/oco";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinanceConfig {
    pub rest_url: String,
    pub recv_window: u64,
    pub quote_asset: String,
    pub secondary_asset: String,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            rest_url: BINANCE_REST_URL.to_string(),
            recv_window: 5_000,
            quote_asset: "BTC".to_string(),
            secondary_asset: "USDT".to_string(),
        }
    }
}

#[derive(Clone)]
pub struct BinanceClient {
    cfg: BinanceConfig,
    credentials: Credentials,
    http: Client,
    timestamp_fn: Arc<dyn Fn() -> i64 + Send + Sync>,
}

impl BinanceClient {
    pub fn new(cfg: BinanceConfig, credentials: Credentials) -> Self {
        Self {
            cfg,
            credentials,
            http: Client::new(),
            timestamp_fn: Arc::new(current_unix_millis),
        }
    }

    pub fn with_timestamp_fn(mut self, timestamp_fn: Arc<dyn Fn() -> i64 + Send + Sync>) -> Self {
        self.timestamp_fn = timestamp_fn;
        self
    }

    fn signed_query(&self, mut params: Vec<(&'static str, String)>) -> Result<String, ExchangeError> {
        params.push(("recvWindow", self.cfg.recv_window.to_string()));
        params.push(("timestamp", (self.timestamp_fn)().to_string()));
        let query = serde_urlencoded::to_string(&params)
            .map_err(|err| ExchangeError::unknown(format!("cannot encode request: {err}")))?;
        let signature = sign_query(&self.credentials.api_secret, &query)?;
        Ok(format!("{query}&signature={signature}"))
    }

    async fn send_signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Vec<(&'static str, String)>,
    ) -> Result<T, ExchangeError> {
        let query = self.signed_query(params)?;
        let url = format!("{}{}?{}", self.cfg.rest_url, path, query);
        debug!("{method} {path}");

        let resp = self
            .http
            .request(method, url)
            .header("X-MBX-APIKEY", &self.credentials.api_key)
            .send()
            .await
            .map_err(|err| ExchangeError::connectivity(err.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| ExchangeError::connectivity(err.to_string()))?;

        if !status.is_success() {
            return Err(map_rest_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|err| {
            warn!("unexpected {path} response: {body}");
            ExchangeError::unknown(format!("Unexpected exchange response ({err})"))
        })
    }
}

#[async_trait]
impl ExchangeGateway for BinanceClient {
    async fn check_connectivity(&self) -> bool {
        let url = format!("{}{}", self.cfg.rest_url, PING);
        match self.http.get(url).send().await {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!("ping answered {}", resp.status());
                false
            }
            Err(err) => {
                warn!("ping failed: {err}");
                false
            }
        }
    }

    async fn fetch_balances(&self) -> Result<Balances, ExchangeError> {
        let account: AccountResponse = self.send_signed(Method::GET, ACCOUNT, Vec::new()).await?;
        let free = |asset: &str| {
            account.free(asset).unwrap_or_else(|| {
                debug!("no {asset} balance on account, using zero");
                Decimal::ZERO
            })
        };
        Ok(Balances {
            quote: free(&self.cfg.quote_asset),
            secondary: free(&self.cfg.secondary_asset),
        })
    }

    async fn market_buy(&self, pair: &str, quote_amount: Decimal) -> Result<BuyOrder, ExchangeError> {
        let params = vec![
            ("symbol", pair.to_string()),
            ("side", "BUY".to_string()),
            ("type", "MARKET".to_string()),
            ("quoteOrderQty", quote_amount.normalize().to_string()),
            ("newOrderRespType", "FULL".to_string()),
        ];
        let resp: OrderResponse = self.send_signed(Method::POST, ORDER, params).await?;
        debug!("order {} on {} acknowledged", resp.order_id, resp.symbol);
        Ok(resp.into())
    }

    async fn oco_sell(&self, request: &OcoSellRequest) -> Result<OcoResult, ExchangeError> {
        let levels = &request.levels;
        let params = vec![
            ("symbol", request.pair.clone()),
            ("side", "SELL".to_string()),
            ("quantity", request.quantity.normalize().to_string()),
            ("price", levels.take_profit_price.normalize().to_string()),
            ("stopPrice", levels.stop_price.normalize().to_string()),
            ("stopLimitPrice", levels.stop_limit_price.normalize().to_string()),
            ("stopLimitTimeInForce", "GTC".to_string()),
        ];
        let resp: OcoResponse = self.send_signed(Method::POST, ORDER_OCO, params).await?;
        debug!("oco list {} accepted", resp.order_list_id);
        oco_result(&resp)
    }
}

fn oco_result(resp: &OcoResponse) -> Result<OcoResult, ExchangeError> {
    let take = resp
        .report(OrderType::LimitMaker)
        .ok_or_else(|| ExchangeError::unknown("OCO response has no take profit leg"))?;
    let stop = resp
        .report(OrderType::StopLossLimit)
        .ok_or_else(|| ExchangeError::unknown("OCO response has no stop loss leg"))?;

    Ok(OcoResult {
        transact_time: from_unix_millis(resp.transaction_time),
        take_profit_leg: TakeProfitLeg {
            price: take.price,
            quantity: take.orig_qty,
        },
        stop_leg: StopLeg {
            stop_price: stop.stop_price.unwrap_or(stop.price),
            limit_price: stop.price,
            quantity: stop.orig_qty,
        },
    })
}

/// Exchange `msg` is classified; bodies that are not exchange errors are not.
fn map_rest_error(status: StatusCode, body: &str) -> ExchangeError {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(api) => {
            warn!("exchange rejected request ({status}, code {}): {}", api.code, api.msg);
            ExchangeError::classify(api.msg)
        }
        Err(_) => ExchangeError::unknown(format!("HTTP {} {}", status.as_u16(), body.trim())),
    }
}

fn sign_query(secret: &str, query: &str) -> Result<String, ExchangeError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|err| ExchangeError::unknown(format!("cannot sign request: {err}")))?;
    mac.update(query.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchanges::ExchangeErrorKind;
    use crate::models::SellLevels;
    use httpmock::prelude::*;
    use rust_decimal_macros::dec;

    fn client(rest_url: String) -> BinanceClient {
        let cfg = BinanceConfig {
            rest_url,
            ..BinanceConfig::default()
        };
        let credentials = Credentials {
            api_key: "test-key".to_string(),
            api_secret: "testsecret".to_string(),
        };
        BinanceClient::new(cfg, credentials).with_timestamp_fn(Arc::new(|| 1_700_000_000_000))
    }

    #[test]
    fn signing_matches_documented_vector() {
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            sign_query(secret, query).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn signed_query_appends_window_timestamp_and_signature() {
        let client = client(BINANCE_REST_URL.to_string());
        let query = client
            .signed_query(vec![("symbol", "ADABTC".to_string())])
            .unwrap();
        assert!(query.starts_with("symbol=ADABTC&recvWindow=5000&timestamp=1700000000000&signature="));
        let signature = query.rsplit('=').next().unwrap();
        assert_eq!(signature.len(), 64);
    }

    #[test]
    fn non_exchange_error_body_is_not_classified() {
        let err = map_rest_error(StatusCode::BAD_GATEWAY, "<html>bad gateway: upstream</html>");
        assert_eq!(err.kind, ExchangeErrorKind::Unknown);
    }

    #[tokio::test]
    async fn market_buy_sends_quote_amount_and_reads_fills() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v3/order")
                    .header("X-MBX-APIKEY", "test-key")
                    .query_param("symbol", "ADABTC")
                    .query_param("side", "BUY")
                    .query_param("type", "MARKET")
                    .query_param("quoteOrderQty", "0.01")
                    .query_param("newOrderRespType", "FULL")
                    .query_param("timestamp", "1700000000000")
                    .query_param_exists("signature");
                then.status(200)
                    .header("content-type", "application/json")
                    .body(
                        r#"{"symbol":"ADABTC","orderId":7,"transactTime":1700000000001,
                            "origQty":"110.0","executedQty":"110.0","type":"MARKET",
                            "fills":[{"price":"0.00009053","qty":"110.0"}]}"#,
                    );
            })
            .await;

        let order = client(server.base_url())
            .market_buy("ADABTC", dec!(0.0100))
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(order.order_id, 7);
        assert_eq!(order.fills[0].price, dec!(0.00009053));
    }

    #[tokio::test]
    async fn rejected_buy_is_classified_from_msg() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v3/order");
                then.status(400)
                    .body(r#"{"code":-1013,"msg":"Filter failure: MARKET_LOT_SIZE"}"#);
            })
            .await;

        let err = client(server.base_url())
            .market_buy("ADABTC", dec!(5))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ExchangeErrorKind::RateOrSizeRejected);
        assert_eq!(err.code.as_deref(), Some("MARKET_LOT_SIZE"));
    }

    #[tokio::test]
    async fn invalid_symbol_is_classified() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v3/order");
                then.status(400).body(r#"{"code":-1121,"msg":"Invalid symbol."}"#);
            })
            .await;

        let err = client(server.base_url())
            .market_buy("NOPEBTC", dec!(0.01))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ExchangeErrorKind::InvalidSymbol);
    }

    #[tokio::test]
    async fn oco_sell_submits_three_prices() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v3/order/oco")
                    .query_param("symbol", "ADABTC")
                    .query_param("side", "SELL")
                    .query_param("quantity", "110")
                    .query_param("price", "0.0002")
                    .query_param("stopPrice", "0.0001")
                    .query_param("stopLimitPrice", "0.0001")
                    .query_param("stopLimitTimeInForce", "GTC");
                then.status(200).body(
                    r#"{"orderListId":3,"transactionTime":1700000000002,"orderReports":[
                        {"orderId":11,"type":"STOP_LOSS_LIMIT","price":"0.0001","origQty":"110","stopPrice":"0.0001"},
                        {"orderId":12,"type":"LIMIT_MAKER","price":"0.0002","origQty":"110"}]}"#,
                );
            })
            .await;

        let request = OcoSellRequest {
            pair: "ADABTC".to_string(),
            quantity: dec!(110.00000000),
            levels: SellLevels {
                take_profit_price: dec!(0.0002),
                stop_price: dec!(0.0001),
                stop_limit_price: dec!(0.0001),
            },
        };
        let oco = client(server.base_url()).oco_sell(&request).await.unwrap();
        mock.assert_async().await;
        assert_eq!(oco.take_profit_leg.price, dec!(0.0002));
        assert_eq!(oco.stop_leg.stop_price, dec!(0.0001));
        assert_eq!(oco.stop_leg.quantity, dec!(110));
    }

    #[tokio::test]
    async fn balances_default_missing_assets_to_zero() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v3/account");
                then.status(200)
                    .body(r#"{"balances":[{"asset":"BTC","free":"0.25","locked":"0"}]}"#);
            })
            .await;

        let balances = client(server.base_url()).fetch_balances().await.unwrap();
        assert_eq!(balances.quote, dec!(0.25));
        assert_eq!(balances.secondary, Decimal::ZERO);
    }

    #[tokio::test]
    async fn unreachable_exchange_is_connectivity_failure() {
        let client = client("http://127.0.0.1:1".to_string());
        assert!(!client.check_connectivity().await);
        let err = client.fetch_balances().await.unwrap_err();
        assert_eq!(err.kind, ExchangeErrorKind::ConnectivityFailure);
    }
}
