//! Refresh driver: loads configuration, picks the quote source and renders a
//! snapshot on every interval tick until interrupted.

use std::path::Path;
use std::sync::Arc;

use marketwatch_core::{
    Clock, MarketWatch, QuoteSource, SyntheticSource, SystemClock, UniformQuantities,
    ValidatedConfig, WatchConfig, YahooChartSource,
};
use tokio::time::{self, MissedTickBehavior};
use tracing::info;

use crate::cli::Cli;
use crate::error::CliError;
use crate::output;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let source: Arc<dyn QuoteSource> = if cli.mock {
        Arc::new(SyntheticSource::new())
    } else {
        let timeout_ms = u64::try_from(config.fetch_timeout.as_millis()).unwrap_or(u64::MAX);
        Arc::new(YahooChartSource::default().with_timeout_ms(timeout_ms))
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    info!(
        provider = %source.id(),
        watchlist = config.watchlist.len(),
        ticker_list = config.ticker_list.len(),
        refresh_secs = config.refresh_interval.as_secs(),
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "starting market watch"
    );

    let refresh_interval = config.refresh_interval;
    let watch = MarketWatch::with_source(config, source, clock);
    let mut quantities = UniformQuantities::new();

    let mut ticker = time::interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            result = &mut shutdown => {
                result?;
                info!("shutdown requested");
                return Ok(());
            }
        }

        let snapshot = watch.refresh(&mut quantities).await;
        output::render(&snapshot, cli.format, cli.pretty)?;

        if cli.once {
            return Ok(());
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ValidatedConfig, CliError> {
    let config = match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration");
            WatchConfig::from_json_file(path)?
        }
        None => WatchConfig::default(),
    };
    Ok(config.validate()?)
}
