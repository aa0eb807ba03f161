//! Interactive single-position OCO trading bot for Binance spot.
//!
//! Reads `API_KEY`/`API_SECRET` from `settings.ini` (or `OCO_*` env vars),
//! then loops: take profit %, budget, coin, market buy, OCO sell, repeat.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use log::{LevelFilter, info};

use oco_bot::config::Settings;
use oco_bot::console::{ConsoleOperator, print_banner};
use oco_bot::exchanges::binance::BinanceClient;
use oco_bot::utils::logging::{init_logging, parse_level};
use oco_bot::workflow::{Operator, Tone, TradeWorkflow, WorkflowError};

#[derive(Parser)]
#[command(name = "oco_bot", about = "Market buy a coin and protect it with an OCO sell")]
struct Args {
    /// Settings file with API_KEY and API_SECRET
    #[arg(short, long, default_value = "settings.ini")]
    settings: String,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn", value_parser = parse_log_level)]
    log_level: LevelFilter,

    /// Skip the start-up banner
    #[arg(long)]
    no_banner: bool,
}

fn parse_log_level(raw: &str) -> Result<LevelFilter, String> {
    parse_level(raw).ok_or_else(|| format!("unknown log level `{raw}`"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    dotenv().ok();
    let args = Args::parse();
    init_logging(args.log_level);

    if !args.no_banner {
        print_banner();
    }

    let mut operator = ConsoleOperator::new();
    let settings = match Settings::load(&args.settings) {
        Ok(settings) => settings,
        Err(err) => {
            log::warn!("{}: {:?}", args.settings, err);
            operator.tell(Tone::Error, &err.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };
    let credentials = match settings.credentials() {
        Ok(credentials) => credentials,
        Err(err) => {
            log::warn!("{}: {:?}", args.settings, err);
            operator.tell(Tone::Error, &err.to_string());
            return Ok(ExitCode::FAILURE);
        }
    };
    info!("loaded credentials {credentials:?} from {}", args.settings);

    let client = BinanceClient::new(settings.binance_config(), credentials);
    let mut workflow = TradeWorkflow::new(client, operator, settings.workflow_config());

    match workflow.run().await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(WorkflowError::InputClosed(err)) => {
            info!("input closed: {err}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err @ WorkflowError::Fatal { .. }) => {
            log::error!("{err}");
            Ok(ExitCode::FAILURE)
        }
    }
}
