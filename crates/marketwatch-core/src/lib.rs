//! # Marketwatch Core
//!
//! Refresh pipeline for a near-real-time market watch dashboard.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Quote sources (Yahoo chart endpoint, synthetic offline data) |
//! | [`cache`] | TTL quote cache with single-flight recomputation |
//! | [`circuit_breaker`] | Circuit breaker for the upstream provider |
//! | [`clock`] | Injectable monotonic and wall clocks |
//! | [`config`] | Startup configuration and validation |
//! | [`data_source`] | Quote source trait and its error type |
//! | [`domain`] | Symbols, quotes, batches, close series |
//! | [`error`] | Validation and configuration errors |
//! | [`http_client`] | HTTP transport seam |
//! | [`market_clock`] | Trading-session open/closed gate |
//! | [`metrics`] | Change, percent change and synthetic depth |
//! | [`pipeline`] | One refresh tick end to end |
//! | [`quote_adapter`] | Failure-absorbing per-symbol fetches |
//! | [`table`] | Ordered display rows |
//! | [`ticker`] | Ticker strip entries |
//!
//! ## Data flow
//!
//! ```text
//! tick ──▶ QuoteCache ──▶ QuoteAdapter ──▶ QuoteSource ──▶ HttpClient
//!              │
//!              ▼
//!          QuoteBatch ──▶ metrics ──▶ table / ticker ──▶ WatchSnapshot
//! ```
//!
//! No fetch error escapes [`QuoteAdapter`]; a symbol that cannot be fetched
//! renders as a zeroed row every tick.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marketwatch_core::{MarketWatch, SyntheticSource, SystemClock, UniformQuantities, WatchConfig};
//!
//! let config = WatchConfig::default().validate()?;
//! let watch = MarketWatch::with_source(config, Arc::new(SyntheticSource::new()), Arc::new(SystemClock));
//! let snapshot = watch.refresh(&mut UniformQuantities::new()).await;
//! println!("{} rows, market {}", snapshot.table.len(), snapshot.top_bar.session.label());
//! ```

pub mod adapters;
pub mod cache;
pub mod circuit_breaker;
pub mod clock;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod market_clock;
pub mod metrics;
pub mod pipeline;
pub mod quote_adapter;
pub mod source;
pub mod table;
pub mod ticker;

pub use adapters::{SyntheticSource, YahooChartSource};
pub use cache::QuoteCache;
pub use circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Benchmark, BenchmarkConfig, SessionConfig, ValidatedConfig, WatchConfig};
pub use data_source::{QuoteSource, SourceError, SourceErrorKind};
pub use domain::{
    CloseSeries, HistoryRange, HistoryRequest, Interval, Quote, QuoteBatch, QuoteOutcome, Symbol,
    UtcDateTime,
};
pub use error::{ConfigError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use market_clock::{MarketSession, SessionWindow};
pub use metrics::{
    change, derive, PriceChange, PriceMetrics, QuantitySource, UniformQuantities, QTY_MAX, QTY_MIN,
};
pub use pipeline::{IndexLevel, MarketWatch, TopBar, WatchSnapshot, SYNTHETIC_DEPTH_NOTE};
pub use quote_adapter::{QuoteAdapter, QuoteFetcher};
pub use source::ProviderId;
pub use table::{assemble, DepthKind, DisplayRow, DisplayTable};
pub use ticker::{ticker_strip, Direction, TickerEntry, TickerStrip};
