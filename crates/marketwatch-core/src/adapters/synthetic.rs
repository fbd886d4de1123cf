use std::collections::BTreeSet;
use std::future::Future;
use std::pin::Pin;

use crate::data_source::{QuoteSource, SourceError};
use crate::{CloseSeries, HistoryRequest, ProviderId, Symbol};

/// Minutes in one 09:15-15:30 trading session.
const SESSION_MINUTES: u32 = 375;

/// Deterministic offline source for `--mock` runs and tests.
///
/// Each symbol gets a stable price path derived from its name, so repeated
/// ticks render the same table. Symbols registered with
/// [`SyntheticSource::with_failures`] always fail.
#[derive(Debug, Clone, Default)]
pub struct SyntheticSource {
    failing: BTreeSet<Symbol>,
}

impl SyntheticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failures(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            failing: symbols.into_iter().collect(),
        }
    }

    fn series(&self, req: &HistoryRequest) -> Result<CloseSeries, SourceError> {
        if self.failing.contains(&req.symbol) {
            return Err(SourceError::unavailable(format!(
                "synthetic failure for '{}'",
                req.symbol
            )));
        }

        let seed = symbol_seed(&req.symbol);
        let mut rng = fastrand::Rng::with_seed(seed);
        let bars = req.range.sessions() * SESSION_MINUTES / req.interval.minutes();
        let mut price = 100.0 + (seed % 4_900) as f64;

        let closes = (0..bars)
            .map(|index| {
                price = (price * (1.0 + (rng.f64() - 0.5) * 0.002)).max(0.01);
                // Every 97th bar has no close, like thin minutes upstream.
                if index % 97 == 96 {
                    None
                } else {
                    Some((price * 100.0).round() / 100.0)
                }
            })
            .collect();

        Ok(CloseSeries::new(req.symbol.clone(), closes))
    }
}

impl QuoteSource for SyntheticSource {
    fn id(&self) -> ProviderId {
        ProviderId::Synthetic
    }

    fn closes<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CloseSeries, SourceError>> + Send + 'a>> {
        Box::pin(async move { self.series(&req) })
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}
