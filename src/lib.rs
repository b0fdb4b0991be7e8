pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::{AppConfig, DEFAULT_YAHOO_BASE_URL};
use anyhow::{Result, bail};
use crate::providers::caching::CachingRateFeed;
use crate::providers::yahoo_finance::YahooRateFeed;
use tracing::{debug, info};

pub enum AppCommand {
    Dashboard {
        amount: Option<f64>,
        window: Option<u32>,
        auto_refresh: bool,
    },
    Watch {
        amount: Option<f64>,
        window: Option<u32>,
    },
    Convert {
        amount: f64,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("penwatch starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let base_url = config
        .providers
        .yahoo
        .as_ref()
        .map_or(DEFAULT_YAHOO_BASE_URL, |p| &p.base_url);
    let feed = CachingRateFeed::new(YahooRateFeed::new(base_url));

    match command {
        AppCommand::Dashboard {
            amount,
            window,
            auto_refresh,
        } => {
            let (amount, window) = resolve_inputs(&config, amount, window)?;
            if auto_refresh || config.auto_refresh {
                cli::watch::run(&feed, amount, window).await
            } else {
                cli::dashboard::run(&feed, amount, window).await
            }
        }
        AppCommand::Watch { amount, window } => {
            let (amount, window) = resolve_inputs(&config, amount, window)?;
            cli::watch::run(&feed, amount, window).await
        }
        AppCommand::Convert { amount } => {
            validate_amount(amount)?;
            cli::convert::run(&feed, amount).await
        }
    }
}

/// Flags override config; both are validated the same way.
fn resolve_inputs(
    config: &AppConfig,
    amount: Option<f64>,
    window: Option<u32>,
) -> Result<(f64, u32)> {
    let amount = amount.unwrap_or(config.amount);
    validate_amount(amount)?;

    let window = window.unwrap_or(config.window_days);
    if !matches!(window, 7 | 30 | 365) {
        bail!("History window must be 7, 30 or 365 days, got {window}");
    }
    Ok((amount, window))
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount <= 0.0 {
        bail!("USD amount must be positive, got {amount}");
    }
    Ok(())
}
