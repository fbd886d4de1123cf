//! CLI argument definitions for marketwatch.
//!
//! # Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--config` | built-in NSE lists | JSON configuration file (`MARKETWATCH_CONFIG`) |
//! | `--mock` | `false` | Use the synthetic offline source |
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--once` | `false` | Render a single tick and exit |
//! | `--log-level` | `info` | Log filter when `RUST_LOG` is unset |
//!
//! # Examples
//!
//! ```bash
//! # Live dashboard with the default watchlist
//! marketwatch
//!
//! # One JSON snapshot from synthetic data
//! marketwatch --mock --once --format json --pretty
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Market watch dashboard: refreshing quote table, index levels and ticker strip.
#[derive(Debug, Parser)]
#[command(name = "marketwatch", author, version, about)]
pub struct Cli {
    /// JSON configuration file; built-in defaults are used when absent.
    #[arg(long, env = "MARKETWATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Serve deterministic synthetic quotes instead of calling Yahoo.
    #[arg(long, default_value_t = false)]
    pub mock: bool,

    /// Output format for each snapshot.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,

    /// Render one tick and exit.
    #[arg(long, default_value_t = false)]
    pub once: bool,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width terminal table.
    Table,
    /// One JSON object per tick.
    Json,
}
