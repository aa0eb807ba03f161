//! `settings.ini` loading.
//!
//! ```ini
//! API_KEY=...
//! API_SECRET=...
//!
//! [bot]
//! quote_asset=BTC
//! secondary_asset=USDT
//!
//! [binance]
//! rest_url=https://api.binance.com
//! recv_window=5000
//! ```
//!
//! `OCO_API_KEY`, `OCO_API_SECRET` and `OCO_<SECTION>__<KEY>` override the file.

use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;

use crate::exchanges::binance::{BINANCE_REST_URL, BinanceConfig};
use crate::workflow::WorkflowConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid settings file.")]
    Load(#[from] ::config::ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsError {
    #[error("Please put your api key & secret on the settings file.")]
    Empty,
    #[error("Invalid settings file.")]
    Invalid(String),
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask(&self.api_key))
            .field("api_secret", &"***")
            .finish()
    }
}

fn mask(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{prefix}***")
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotSettings {
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,
    #[serde(default = "default_secondary_asset")]
    pub secondary_asset: String,
}

fn default_quote_asset() -> String {
    "BTC".to_string()
}

fn default_secondary_asset() -> String {
    "USDT".to_string()
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            quote_asset: default_quote_asset(),
            secondary_asset: default_secondary_asset(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BinanceSettings {
    #[serde(default = "default_rest_url")]
    pub rest_url: String,
    #[serde(default = "default_recv_window")]
    pub recv_window: u64,
}

fn default_rest_url() -> String {
    BINANCE_REST_URL.to_string()
}

fn default_recv_window() -> u64 {
    5_000
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            rest_url: default_rest_url(),
            recv_window: default_recv_window(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_secret: Option<String>,
    #[serde(default)]
    pub bot: BotSettings,
    #[serde(default)]
    pub binance: BinanceSettings,
}

impl Settings {
    /// Reads the ini file (if present) and the `OCO_` environment on top.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_string_lossy().into_owned();
        let settings = Config::builder()
            .add_source(File::new(&path, FileFormat::Ini).required(false))
            .add_source(
                Environment::with_prefix("OCO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn credentials(&self) -> Result<Credentials, CredentialsError> {
        let api_key = self.api_key.as_deref().map(str::trim).unwrap_or_default();
        let api_secret = self.api_secret.as_deref().map(str::trim).unwrap_or_default();
        if api_key.is_empty() || api_secret.is_empty() {
            return Err(CredentialsError::Empty);
        }
        for (name, value) in [("API_KEY", api_key), ("API_SECRET", api_secret)] {
            if !value.chars().all(|c| c.is_ascii_graphic()) {
                return Err(CredentialsError::Invalid(format!(
                    "{name} contains characters that are not allowed"
                )));
            }
        }
        Ok(Credentials {
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        })
    }

    pub fn binance_config(&self) -> BinanceConfig {
        BinanceConfig {
            rest_url: self.binance.rest_url.trim_end_matches('/').to_string(),
            recv_window: self.binance.recv_window,
            quote_asset: self.bot.quote_asset.to_uppercase(),
            secondary_asset: self.bot.secondary_asset.to_uppercase(),
        }
    }

    pub fn workflow_config(&self) -> WorkflowConfig {
        WorkflowConfig {
            quote_asset: self.bot.quote_asset.to_uppercase(),
            secondary_asset: self.bot.secondary_asset.to_uppercase(),
        }
    }
}
