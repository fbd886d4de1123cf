//! Display metrics derived from one quote.
//!
//! The bid/ask spread and the order quantities are synthetic placeholders;
//! no real market depth exists anywhere in the pipeline.

use serde::Serialize;

use crate::QuoteOutcome;

pub const QTY_MIN: u32 = 100;
pub const QTY_MAX: u32 = 2_000;

const MIN_SPREAD: f64 = 0.01;
const SPREAD_RATIO: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceMetrics {
    pub price: f64,
    pub previous_close: f64,
    pub change_absolute: f64,
    pub change_percent: f64,
    pub bid: f64,
    pub ask: f64,
}

impl PriceMetrics {
    /// Row values for a symbol whose quote could not be fetched.
    pub const SENTINEL: Self = Self {
        price: 0.0,
        previous_close: 0.0,
        change_absolute: 0.0,
        change_percent: 0.0,
        bid: 0.0,
        ask: 0.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub amount: f64,
    pub percent: f64,
}

/// Change from previous close; zero for unavailable quotes and for a zero
/// previous close.
pub fn change(outcome: &QuoteOutcome) -> PriceChange {
    let Some(quote) = outcome.quote() else {
        return PriceChange {
            amount: 0.0,
            percent: 0.0,
        };
    };

    let amount = quote.price - quote.previous_close;
    let percent = if quote.previous_close != 0.0 {
        amount / quote.previous_close * 100.0
    } else {
        0.0
    };
    PriceChange { amount, percent }
}

pub fn derive(outcome: &QuoteOutcome) -> PriceMetrics {
    let Some(quote) = outcome.quote() else {
        return PriceMetrics::SENTINEL;
    };

    let PriceChange { amount, percent } = change(outcome);
    let spread = (quote.price * SPREAD_RATIO).max(MIN_SPREAD);

    PriceMetrics {
        price: quote.price,
        previous_close: quote.previous_close,
        change_absolute: amount,
        change_percent: percent,
        bid: (quote.price - spread).max(0.0),
        ask: quote.price + spread,
    }
}

/// Strategy for the decorative bid/ask quantities.
pub trait QuantitySource: Send {
    fn draw(&mut self) -> u32;
}

/// Uniform draws from `[QTY_MIN, QTY_MAX]`.
#[derive(Debug, Clone)]
pub struct UniformQuantities {
    rng: fastrand::Rng,
}

impl UniformQuantities {
    pub fn new() -> Self {
        Self {
            rng: fastrand::Rng::new(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
        }
    }
}

impl Default for UniformQuantities {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantitySource for UniformQuantities {
    fn draw(&mut self) -> u32 {
        self.rng.u32(QTY_MIN..=QTY_MAX)
    }
}
