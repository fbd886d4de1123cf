//! # Domain Models
//!
//! Canonical domain types for marketwatch.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker or index symbol |
//! | [`Quote`] | Last price and previous close |
//! | [`QuoteOutcome`] | Fetched quote or `Unavailable` |
//! | [`QuoteBatch`] | All outcomes for one refresh tick |
//! | [`HistoryRequest`] | Intraday history lookup |
//! | [`CloseSeries`] | Provider close prices, oldest first |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Numeric types enforce their invariants at construction time: a [`Quote`]
//! is always finite and non-negative, so the zeroed sentinel can never be
//! confused with a real quote before it reaches the display layer.

mod history;
mod models;
mod symbol;
mod timestamp;

pub use history::{CloseSeries, HistoryRange, HistoryRequest, Interval};
pub use models::{Quote, QuoteBatch, QuoteOutcome};
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
