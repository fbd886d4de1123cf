use thiserror::Error;

/// Validation errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
}

/// Startup configuration errors. Any of these aborts the process before the
/// first refresh tick.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("watchlist must contain at least one symbol")]
    EmptyWatchlist,
    #[error("symbol '{symbol}' appears more than once in the {list}")]
    DuplicateSymbol { symbol: String, list: &'static str },
    #[error("invalid symbol '{value}' in the {list}: {source}")]
    InvalidSymbol {
        value: String,
        list: &'static str,
        #[source]
        source: ValidationError,
    },
    #[error("benchmark label cannot be empty (symbol '{symbol}')")]
    EmptyBenchmarkLabel { symbol: String },
    #[error("'{field}' must be greater than zero")]
    ZeroValue { field: &'static str },
    #[error("invalid session time '{value}', expected HH:MM")]
    InvalidSessionTime { value: String },
    #[error("invalid UTC offset '{value}', expected +HH:MM or -HH:MM")]
    InvalidUtcOffset { value: String },
    #[error("session opens at {open} which is after close {close}")]
    InvertedSession { open: String, close: String },

    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
