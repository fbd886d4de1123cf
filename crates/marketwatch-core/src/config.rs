//! Startup configuration.
//!
//! [`WatchConfig`] is the raw, serde-facing shape (every field defaulted, so
//! `{}` is a valid file). [`WatchConfig::validate`] turns it into a
//! [`ValidatedConfig`] with parsed symbols and durations; any problem there
//! is fatal before the first tick.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Time, UtcOffset};

use crate::market_clock::SessionWindow;
use crate::{ConfigError, Symbol};

const WATCHLIST: [&str; 15] = [
    "RELIANCE.NS",
    "TCS.NS",
    "INFY.NS",
    "HDFCBANK.NS",
    "ICICIBANK.NS",
    "SBIN.NS",
    "ITC.NS",
    "BAJFINANCE.NS",
    "AXISBANK.NS",
    "MARUTI.NS",
    "HDFC.NS",
    "LT.NS",
    "HINDUNILVR.NS",
    "SUNPHARMA.NS",
    "TATASTEEL.NS",
];

const TICKER_LIST: [&str; 20] = [
    "SUNPHARMA.NS",
    "HINDUNILVR.NS",
    "POWERGRID.NS",
    "TATASTEEL.NS",
    "LT.NS",
    "KOTAKBANK.NS",
    "NTPC.NS",
    "ULTRACEMCO.NS",
    "ONGC.NS",
    "WIPRO.NS",
    "HCLTECH.NS",
    "BHARTIARTL.NS",
    "ADANIENT.NS",
    "ADANIPORTS.NS",
    "DIVISLAB.NS",
    "BRITANNIA.NS",
    "TITAN.NS",
    "EICHERMOT.NS",
    "M&M.NS",
    "GRASIM.NS",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    pub watchlist: Vec<String>,
    pub ticker_list: Vec<String>,
    pub benchmarks: Vec<BenchmarkConfig>,
    pub refresh_interval_secs: u64,
    pub cache_ttl_secs: u64,
    pub fetch_timeout_ms: u64,
    pub max_concurrent_fetches: usize,
    pub session: SessionConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watchlist: WATCHLIST.iter().map(|s| s.to_string()).collect(),
            ticker_list: TICKER_LIST.iter().map(|s| s.to_string()).collect(),
            benchmarks: vec![
                BenchmarkConfig::new("NIFTY", "^NSEI"),
                BenchmarkConfig::new("SENSEX", "^BSESN"),
            ],
            refresh_interval_secs: 60,
            cache_ttl_secs: 60,
            fetch_timeout_ms: 3_000,
            max_concurrent_fetches: 8,
            session: SessionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkConfig {
    pub label: String,
    pub symbol: String,
}

impl BenchmarkConfig {
    pub fn new(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            symbol: symbol.into(),
        }
    }
}

/// Session window as written in the file: `"HH:MM"` times and a
/// `"+HH:MM"` offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub open: String,
    pub close: String,
    pub utc_offset: String,
    pub exclude_weekends: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            open: String::from("09:15"),
            close: String::from("15:30"),
            utc_offset: String::from("+05:30"),
            exclude_weekends: false,
        }
    }
}

impl SessionConfig {
    fn parse(&self) -> Result<SessionWindow, ConfigError> {
        let open = parse_session_time(&self.open)?;
        let close = parse_session_time(&self.close)?;
        if open > close {
            return Err(ConfigError::InvertedSession {
                open: self.open.clone(),
                close: self.close.clone(),
            });
        }

        let utc_offset = UtcOffset::parse(
            self.utc_offset.trim(),
            format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
        )
        .map_err(|_| ConfigError::InvalidUtcOffset {
            value: self.utc_offset.clone(),
        })?;

        Ok(SessionWindow {
            open,
            close,
            utc_offset,
            exclude_weekends: self.exclude_weekends,
        })
    }
}

/// A benchmark index shown in the top bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Benchmark {
    pub label: String,
    pub symbol: Symbol,
}

/// Configuration after validation; consumed by the pipeline and the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub watchlist: Vec<Symbol>,
    pub ticker_list: Vec<Symbol>,
    pub benchmarks: Vec<Benchmark>,
    pub refresh_interval: Duration,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub max_concurrent_fetches: usize,
    pub session: SessionWindow,
}

impl ValidatedConfig {
    /// Watchlist followed by the ticker-only symbols, each symbol once.
    pub fn fetch_universe(&self) -> Vec<Symbol> {
        let mut seen = BTreeSet::new();
        self.watchlist
            .iter()
            .chain(&self.ticker_list)
            .filter(|symbol| seen.insert(*symbol))
            .cloned()
            .collect()
    }
}

impl WatchConfig {
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<ValidatedConfig, ConfigError> {
        if self.watchlist.is_empty() {
            return Err(ConfigError::EmptyWatchlist);
        }
        if self.refresh_interval_secs == 0 {
            return Err(ConfigError::ZeroValue {
                field: "refresh_interval_secs",
            });
        }
        if self.fetch_timeout_ms == 0 {
            return Err(ConfigError::ZeroValue {
                field: "fetch_timeout_ms",
            });
        }
        if self.max_concurrent_fetches == 0 {
            return Err(ConfigError::ZeroValue {
                field: "max_concurrent_fetches",
            });
        }

        let watchlist = parse_symbol_list(&self.watchlist, "watchlist")?;
        let ticker_list = parse_symbol_list(&self.ticker_list, "ticker list")?;

        let benchmarks = self
            .benchmarks
            .iter()
            .map(|benchmark| {
                let symbol = parse_symbol(&benchmark.symbol, "benchmarks")?;
                let label = benchmark.label.trim();
                if label.is_empty() {
                    return Err(ConfigError::EmptyBenchmarkLabel {
                        symbol: symbol.to_string(),
                    });
                }
                Ok(Benchmark {
                    label: label.to_owned(),
                    symbol,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ValidatedConfig {
            watchlist,
            ticker_list,
            benchmarks,
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            cache_ttl: Duration::from_secs(self.cache_ttl_secs),
            fetch_timeout: Duration::from_millis(self.fetch_timeout_ms),
            max_concurrent_fetches: self.max_concurrent_fetches,
            session: self.session.parse()?,
        })
    }
}

fn parse_symbol(value: &str, list: &'static str) -> Result<Symbol, ConfigError> {
    Symbol::parse(value).map_err(|source| ConfigError::InvalidSymbol {
        value: value.to_owned(),
        list,
        source,
    })
}

fn parse_symbol_list(values: &[String], list: &'static str) -> Result<Vec<Symbol>, ConfigError> {
    let mut seen = BTreeSet::new();
    values
        .iter()
        .map(|value| {
            let symbol = parse_symbol(value, list)?;
            if !seen.insert(symbol.clone()) {
                return Err(ConfigError::DuplicateSymbol {
                    symbol: symbol.to_string(),
                    list,
                });
            }
            Ok(symbol)
        })
        .collect()
}

fn parse_session_time(value: &str) -> Result<Time, ConfigError> {
    Time::parse(value.trim(), format_description!("[hour]:[minute]")).map_err(|_| {
        ConfigError::InvalidSessionTime {
            value: value.to_owned(),
        }
    })
}
