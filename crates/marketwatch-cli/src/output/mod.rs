mod table;

use std::io::{self, Write};

use marketwatch_core::WatchSnapshot;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(snapshot: &WatchSnapshot, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(snapshot)?
            } else {
                serde_json::to_string(snapshot)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => table::write_snapshot(&mut out, snapshot)?,
    }

    out.flush()?;
    Ok(())
}
