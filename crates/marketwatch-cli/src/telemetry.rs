use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Installs the global subscriber. Logs go to stderr so stdout carries only
/// rendered snapshots.
pub fn init_tracing(default_filter: &str) -> Result<(), CliError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}
