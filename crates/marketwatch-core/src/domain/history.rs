use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::Symbol;

/// Bar granularity requested from the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
}

impl Interval {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
        }
    }

    pub const fn minutes(self) -> u32 {
        match self {
            Self::OneMinute => 1,
        }
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookback window, counted in trading sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HistoryRange {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "2d")]
    TwoDays,
}

impl HistoryRange {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1d",
            Self::TwoDays => "2d",
        }
    }

    pub const fn sessions(self) -> u32 {
        match self {
            Self::OneDay => 1,
            Self::TwoDays => 2,
        }
    }
}

impl Display for HistoryRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intraday history request for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub range: HistoryRange,
    pub interval: Interval,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, range: HistoryRange, interval: Interval) -> Self {
        Self {
            symbol,
            range,
            interval,
        }
    }

    /// Two sessions of one-minute bars, used for watchlist quotes.
    pub fn quote(symbol: Symbol) -> Self {
        Self::new(symbol, HistoryRange::TwoDays, Interval::OneMinute)
    }

    /// One session of one-minute bars, used for benchmark index levels.
    pub fn index(symbol: Symbol) -> Self {
        Self::new(symbol, HistoryRange::OneDay, Interval::OneMinute)
    }
}

/// Ordered close prices returned by a provider, oldest first. Bars without a
/// close are kept as `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseSeries {
    pub symbol: Symbol,
    pub closes: Vec<Option<f64>>,
}

impl CloseSeries {
    pub fn new(symbol: Symbol, closes: Vec<Option<f64>>) -> Self {
        Self { symbol, closes }
    }

    /// Closes that are present and finite, oldest first.
    pub fn valid_closes(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.closes
            .iter()
            .filter_map(|close| *close)
            .filter(|close| close.is_finite())
    }

    pub fn last_close(&self) -> Option<f64> {
        self.valid_closes().next_back()
    }
}
