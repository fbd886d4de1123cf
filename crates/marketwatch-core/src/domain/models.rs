use std::collections::BTreeMap;

use serde::Serialize;

use crate::{CloseSeries, Symbol, UtcDateTime, ValidationError};

/// Last traded price and previous close for one symbol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quote {
    pub price: f64,
    pub previous_close: f64,
}

impl Quote {
    pub fn new(price: f64, previous_close: f64) -> Result<Self, ValidationError> {
        validate_non_negative("price", price)?;
        validate_non_negative("previous_close", previous_close)?;

        Ok(Self {
            price,
            previous_close,
        })
    }

    /// Builds a quote from the two most recent valid closes. A single close
    /// doubles as its own previous close; an empty series yields `None`.
    pub fn from_series(series: &CloseSeries) -> Result<Option<Self>, ValidationError> {
        let mut recent = series.valid_closes().rev();
        let Some(price) = recent.next() else {
            return Ok(None);
        };
        let previous_close = recent.next().unwrap_or(price);
        Self::new(price, previous_close).map(Some)
    }
}

/// Result of fetching one symbol. `Unavailable` is only turned into the
/// zeroed sentinel when a display value is produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QuoteOutcome {
    Available(Quote),
    Unavailable,
}

impl QuoteOutcome {
    pub const fn quote(&self) -> Option<&Quote> {
        match self {
            Self::Available(quote) => Some(quote),
            Self::Unavailable => None,
        }
    }

    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl From<Option<Quote>> for QuoteOutcome {
    fn from(value: Option<Quote>) -> Self {
        value.map_or(Self::Unavailable, Self::Available)
    }
}

/// Quotes for every symbol requested in one refresh tick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteBatch {
    pub quotes: BTreeMap<Symbol, QuoteOutcome>,
    pub fetched_at: UtcDateTime,
}

impl QuoteBatch {
    pub fn new(quotes: BTreeMap<Symbol, QuoteOutcome>, fetched_at: UtcDateTime) -> Self {
        Self { quotes, fetched_at }
    }

    /// Outcome for `symbol`; symbols missing from the batch are unavailable.
    pub fn get(&self, symbol: &Symbol) -> QuoteOutcome {
        self.quotes
            .get(symbol)
            .copied()
            .unwrap_or(QuoteOutcome::Unavailable)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn unavailable_count(&self) -> usize {
        self.quotes
            .values()
            .filter(|outcome| !outcome.is_available())
            .count()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
