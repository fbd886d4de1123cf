//! One refresh tick: fetch (or reuse) quotes, read benchmark levels, gate
//! the session and hand back an owned [`WatchSnapshot`].

use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tracing::info;

use crate::clock::Clock;
use crate::config::ValidatedConfig;
use crate::data_source::QuoteSource;
use crate::market_clock::MarketSession;
use crate::metrics::QuantitySource;
use crate::table::{assemble, DisplayTable};
use crate::ticker::{ticker_strip, TickerStrip};
use crate::{ProviderId, QuoteAdapter, QuoteCache, Symbol, UtcDateTime};

pub const SYNTHETIC_DEPTH_NOTE: &str =
    "Bid/ask prices and quantities are synthetic placeholders, not real market depth";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexLevel {
    pub label: String,
    pub symbol: Symbol,
    /// `0.0` when the index could not be fetched.
    pub level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopBar {
    pub session: MarketSession,
    pub indices: Vec<IndexLevel>,
}

/// Everything a renderer needs for one tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchSnapshot {
    pub as_of: UtcDateTime,
    /// When the quotes behind `table` and `ticker` were fetched; older than
    /// `as_of` on a cache hit.
    pub quotes_as_of: UtcDateTime,
    pub provider: ProviderId,
    pub top_bar: TopBar,
    pub table: DisplayTable,
    pub ticker: TickerStrip,
    pub notes: Vec<String>,
}

pub struct MarketWatch {
    config: ValidatedConfig,
    universe: Vec<Symbol>,
    cache: QuoteCache,
    adapter: Arc<QuoteAdapter>,
    clock: Arc<dyn Clock>,
}

impl MarketWatch {
    pub fn new(
        config: ValidatedConfig,
        cache: QuoteCache,
        adapter: Arc<QuoteAdapter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let universe = config.fetch_universe();
        Self {
            config,
            universe,
            cache,
            adapter,
            clock,
        }
    }

    /// Wires an adapter and cache around `source` using the configured
    /// timeout, TTL and concurrency.
    pub fn with_source(
        config: ValidatedConfig,
        source: Arc<dyn QuoteSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let adapter = Arc::new(QuoteAdapter::new(source, config.fetch_timeout));
        let cache = QuoteCache::new(
            Arc::clone(&adapter) as _,
            Arc::clone(&clock),
            config.cache_ttl,
            config.max_concurrent_fetches,
        );
        Self::new(config, cache, adapter, clock)
    }

    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Builds the snapshot for one tick. Quotes go through the cache, so
    /// provider load is bounded by its TTL. Benchmark index levels bypass
    /// the cache: every call issues one request per benchmark.
    pub async fn refresh(&self, quantities: &mut dyn QuantitySource) -> WatchSnapshot {
        let (batch, indices) =
            tokio::join!(self.cache.fetch_batch(&self.universe), self.index_levels());

        let now = self.clock.now_utc();
        let session = self.config.session.session_at(now);
        let table = assemble(&self.config.watchlist, &batch, quantities);
        let ticker = ticker_strip(&self.config.ticker_list, &self.config.watchlist, &batch);

        info!(
            session = session.label(),
            rows = table.len(),
            ticker = ticker.entries.len(),
            unavailable = batch.unavailable_count(),
            "refresh tick complete"
        );

        WatchSnapshot {
            as_of: UtcDateTime::from_offset_datetime(now),
            quotes_as_of: batch.fetched_at,
            provider: self.adapter.provider(),
            top_bar: TopBar { session, indices },
            table,
            ticker,
            notes: vec![
                format!(
                    "Auto-refresh every {} sec",
                    self.config.refresh_interval.as_secs()
                ),
                String::from(SYNTHETIC_DEPTH_NOTE),
            ],
        }
    }

    async fn index_levels(&self) -> Vec<IndexLevel> {
        join_all(self.config.benchmarks.iter().map(|benchmark| async move {
            IndexLevel {
                label: benchmark.label.clone(),
                symbol: benchmark.symbol.clone(),
                level: self
                    .adapter
                    .index_level(&benchmark.symbol)
                    .await
                    .unwrap_or(0.0),
            }
        }))
        .await
    }
}
