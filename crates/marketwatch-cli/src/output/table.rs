use std::io::{self, Write};
use std::time::Duration;

use marketwatch_core::{Direction, WatchSnapshot};

pub fn write_snapshot(out: &mut impl Write, snapshot: &WatchSnapshot) -> io::Result<()> {
    write!(
        out,
        "{}  market {}",
        snapshot.as_of,
        snapshot.top_bar.session.label()
    )?;
    for index in &snapshot.top_bar.indices {
        write!(out, "  {} {:.2}", index.label, index.level)?;
    }
    writeln!(out)?;
    writeln!(out)?;

    writeln!(
        out,
        "{:<12} {:>10} {:>9} {:>8} {:>10} {:>7} {:>10} {:>7} {:>10}",
        "SYMBOL", "PRICE", "CHANGE", "CHG%", "BID", "BID QTY", "ASK", "ASK QTY", "PREV CLOSE"
    )?;
    for row in &snapshot.table.rows {
        writeln!(
            out,
            "{:<12} {:>10.2} {:>+9.2} {:>+7.2}% {:>10.2} {:>7} {:>10.2} {:>7} {:>10.2}",
            row.label,
            row.price,
            row.change_absolute,
            row.change_percent,
            row.bid,
            row.bid_qty,
            row.ask,
            row.ask_qty,
            row.previous_close,
        )?;
    }

    if !snapshot.ticker.entries.is_empty() {
        let strip = snapshot
            .ticker
            .entries
            .iter()
            .map(|entry| {
                let arrow = match entry.direction {
                    Direction::Up => '▲',
                    Direction::Down => '▼',
                };
                format!(
                    "{arrow} {} {:+.2} ({:+.2}%)",
                    entry.label, entry.amount, entry.percent
                )
            })
            .collect::<Vec<_>>()
            .join(" | ");
        writeln!(out)?;
        writeln!(out, "{strip}")?;
    }

    writeln!(out)?;
    for note in &snapshot.notes {
        writeln!(out, "* {note}")?;
    }
    if snapshot.as_of.since(snapshot.quotes_as_of) >= Duration::from_secs(1) {
        writeln!(out, "* Quotes as of {}", snapshot.quotes_as_of)?;
    }
    Ok(())
}
