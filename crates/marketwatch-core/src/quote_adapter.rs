//! Failure-absorbing wrapper around a [`QuoteSource`].
//!
//! Nothing returned from here is an error: timeouts, provider errors,
//! unparseable payloads and even panics inside the source future all become
//! [`QuoteOutcome::Unavailable`] (or `None` for index levels) and are logged.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, warn};

use crate::data_source::{QuoteSource, SourceError};
use crate::{CloseSeries, HistoryRequest, ProviderId, Quote, QuoteOutcome, Symbol};

/// Per-symbol fetch seam used by [`QuoteCache`](crate::QuoteCache).
pub trait QuoteFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = QuoteOutcome> + Send + 'a>>;
}

pub struct QuoteAdapter {
    source: Arc<dyn QuoteSource>,
    timeout: Duration,
}

impl QuoteAdapter {
    pub fn new(source: Arc<dyn QuoteSource>, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    pub fn provider(&self) -> ProviderId {
        self.source.id()
    }

    /// Last price and previous close from two sessions of minute bars.
    pub async fn quote(&self, symbol: &Symbol) -> QuoteOutcome {
        let Some(series) = self.closes(HistoryRequest::quote(symbol.clone())).await else {
            return QuoteOutcome::Unavailable;
        };

        match Quote::from_series(&series) {
            Ok(Some(quote)) => QuoteOutcome::Available(quote),
            Ok(None) => {
                debug!(symbol = %symbol, "empty close series");
                QuoteOutcome::Unavailable
            }
            Err(error) => {
                warn!(symbol = %symbol, %error, "rejected provider quote");
                QuoteOutcome::Unavailable
            }
        }
    }

    /// Latest close of a benchmark index over one session.
    pub async fn index_level(&self, symbol: &Symbol) -> Option<f64> {
        let series = self.closes(HistoryRequest::index(symbol.clone())).await?;
        let level = series.last_close().filter(|level| *level >= 0.0);
        if level.is_none() {
            debug!(symbol = %symbol, "no index level in series");
        }
        level
    }

    async fn closes(&self, req: HistoryRequest) -> Option<CloseSeries> {
        let symbol = req.symbol.clone();
        let call = AssertUnwindSafe(self.source.closes(req)).catch_unwind();

        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(result)) => result,
            Ok(Err(_panic)) => Err(SourceError::internal("quote source panicked")),
            Err(_elapsed) => Err(SourceError::timeout(format!(
                "no response within {} ms",
                self.timeout.as_millis()
            ))),
        };

        match result {
            Ok(series) => Some(series),
            Err(error) => {
                warn!(
                    provider = %self.source.id(),
                    symbol = %symbol,
                    code = error.code(),
                    retryable = error.retryable(),
                    message = error.message(),
                    "quote fetch failed; rendering as unavailable"
                );
                None
            }
        }
    }
}

impl QuoteFetcher for QuoteAdapter {
    fn fetch<'a>(
        &'a self,
        symbol: &'a Symbol,
    ) -> Pin<Box<dyn Future<Output = QuoteOutcome> + Send + 'a>> {
        Box::pin(self.quote(symbol))
    }
}
