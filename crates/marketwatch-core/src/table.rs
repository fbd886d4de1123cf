use serde::Serialize;

use crate::metrics::{derive, QuantitySource};
use crate::{QuoteBatch, Symbol};

/// Marks where bid/ask depth comes from. Only synthetic depth exists today;
/// the tag travels with every table so renderers can label it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthKind {
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub symbol: Symbol,
    pub label: String,
    pub price: f64,
    pub change_absolute: f64,
    pub change_percent: f64,
    pub bid: f64,
    pub bid_qty: u32,
    pub ask: f64,
    pub ask_qty: u32,
    pub previous_close: f64,
}

/// Rows in watchlist order. Consumers must not re-sort them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayTable {
    pub rows: Vec<DisplayRow>,
    pub depth: DepthKind,
}

impl DisplayTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One row per watchlist symbol, in watchlist order. Symbols missing from
/// `batch` get the sentinel row; batch symbols outside the watchlist are
/// left out.
pub fn assemble(
    watchlist: &[Symbol],
    batch: &QuoteBatch,
    quantities: &mut dyn QuantitySource,
) -> DisplayTable {
    let rows = watchlist
        .iter()
        .map(|symbol| {
            let metrics = derive(&batch.get(symbol));
            DisplayRow {
                symbol: symbol.clone(),
                label: symbol.display_name().to_owned(),
                price: metrics.price,
                change_absolute: metrics.change_absolute,
                change_percent: metrics.change_percent,
                bid: metrics.bid,
                bid_qty: quantities.draw(),
                ask: metrics.ask,
                ask_qty: quantities.draw(),
                previous_close: metrics.previous_close,
            }
        })
        .collect();

    DisplayTable {
        rows,
        depth: DepthKind::Synthetic,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::metrics::{UniformQuantities, QTY_MAX, QTY_MIN};
    use crate::{Quote, QuoteOutcome, UtcDateTime};

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    fn batch(entries: &[(&str, Option<(f64, f64)>)]) -> QuoteBatch {
        let quotes: BTreeMap<Symbol, QuoteOutcome> = entries
            .iter()
            .map(|(raw, quote)| {
                let outcome = QuoteOutcome::from(quote.map(|(price, previous_close)| Quote {
                    price,
                    previous_close,
                }));
                (symbol(raw), outcome)
            })
            .collect();
        QuoteBatch::new(
            quotes,
            UtcDateTime::parse("2024-03-12T04:00:00Z").expect("timestamp"),
        )
    }

    #[test]
    fn rows_follow_watchlist_order() {
        let watchlist = vec![symbol("CCC"), symbol("AAA"), symbol("BBB")];
        let batch = batch(&[
            ("AAA", Some((1.0, 1.0))),
            ("BBB", Some((2.0, 2.0))),
            ("CCC", Some((3.0, 3.0))),
        ]);

        let table = assemble(&watchlist, &batch, &mut UniformQuantities::with_seed(1));

        let order: Vec<&str> = table.rows.iter().map(|row| row.symbol.as_str()).collect();
        assert_eq!(order, vec!["CCC", "AAA", "BBB"]);
        assert_eq!(table.depth, DepthKind::Synthetic);
    }

    #[test]
    fn missing_and_unavailable_symbols_render_as_sentinel() {
        let watchlist = vec![symbol("AAA"), symbol("GONE"), symbol("DOWN")];
        let batch = batch(&[("AAA", Some((100.0, 95.0))), ("DOWN", None)]);

        let table = assemble(&watchlist, &batch, &mut UniformQuantities::with_seed(2));

        for row in &table.rows[1..] {
            assert_eq!(row.price, 0.0);
            assert_eq!(row.change_absolute, 0.0);
            assert_eq!(row.change_percent, 0.0);
            assert_eq!(row.bid, 0.0);
            assert_eq!(row.ask, 0.0);
            assert_eq!(row.previous_close, 0.0);
            assert!((QTY_MIN..=QTY_MAX).contains(&row.bid_qty));
        }
        assert_eq!(table.rows[0].price, 100.0);
    }

    #[test]
    fn symbols_outside_watchlist_are_excluded() {
        let watchlist = vec![symbol("AAA")];
        let batch = batch(&[("AAA", Some((1.0, 1.0))), ("EXTRA", Some((9.0, 9.0)))]);

        let table = assemble(&watchlist, &batch, &mut UniformQuantities::with_seed(3));

        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].symbol, symbol("AAA"));
    }

    #[test]
    fn label_drops_exchange_suffix() {
        let watchlist = vec![symbol("RELIANCE.NS")];
        let table = assemble(&watchlist, &batch(&[]), &mut UniformQuantities::with_seed(4));

        assert_eq!(table.rows[0].label, "RELIANCE");
    }
}
