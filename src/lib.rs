pub mod exchanges;
pub mod models;
pub mod strategy;
pub mod utils;
pub mod workflow;

#[cfg(feature = "binance_exec")]
pub mod config;

#[cfg(feature = "binance_exec")]
pub mod console;
