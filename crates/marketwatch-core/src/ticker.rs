use serde::Serialize;

use crate::metrics::change;
use crate::{QuoteBatch, Symbol};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerEntry {
    pub symbol: Symbol,
    pub label: String,
    pub amount: f64,
    pub percent: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickerStrip {
    pub entries: Vec<TickerEntry>,
}

/// Change summary for extended-list symbols that are not already on the
/// watchlist, in extended-list order. Unchanged symbols count as `Up`.
pub fn ticker_strip(extended: &[Symbol], watchlist: &[Symbol], batch: &QuoteBatch) -> TickerStrip {
    let entries = extended
        .iter()
        .filter(|symbol| !watchlist.contains(symbol))
        .map(|symbol| {
            let delta = change(&batch.get(symbol));
            TickerEntry {
                symbol: symbol.clone(),
                label: symbol.display_name().to_owned(),
                amount: delta.amount,
                percent: delta.percent,
                direction: if delta.amount >= 0.0 {
                    Direction::Up
                } else {
                    Direction::Down
                },
            }
        })
        .collect();

    TickerStrip { entries }
}
