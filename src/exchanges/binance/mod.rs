//! Binance spot REST gateway.

pub mod client;
pub mod types;

pub use client::{BINANCE_REST_URL, BinanceClient, BinanceConfig};
