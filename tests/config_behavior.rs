//! Behavior tests for loading configuration files.

use std::io::Write;
use std::time::Duration;

use marketwatch_core::{ConfigError, WatchConfig};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
fn when_file_overrides_some_fields_the_rest_keep_defaults() {
    // Given: A file that only changes the watchlist and refresh interval
    let file = write_config(
        r#"{
            "watchlist": ["infy.ns", "TCS.NS"],
            "refresh_interval_secs": 15
        }"#,
    );

    // When
    let config = WatchConfig::from_json_file(file.path())
        .expect("file loads")
        .validate()
        .expect("config is valid");

    // Then: Symbols are normalized and untouched fields are defaults
    let watchlist: Vec<&str> = config.watchlist.iter().map(|s| s.as_str()).collect();
    assert_eq!(watchlist, vec!["INFY.NS", "TCS.NS"]);
    assert_eq!(config.refresh_interval, Duration::from_secs(15));
    assert_eq!(config.cache_ttl, Duration::from_secs(60));
    assert_eq!(config.ticker_list.len(), 20);
    assert_eq!(config.benchmarks.len(), 2);
}

#[test]
fn when_file_sets_a_custom_session_it_is_parsed() {
    let file = write_config(
        r#"{
            "watchlist": ["AAPL"],
            "ticker_list": [],
            "benchmarks": [{"label": "S&P 500", "symbol": "^GSPC"}],
            "session": {"open": "09:30", "close": "16:00", "utc_offset": "-05:00", "exclude_weekends": true}
        }"#,
    );

    let config = WatchConfig::from_json_file(file.path())
        .expect("file loads")
        .validate()
        .expect("config is valid");

    assert_eq!(config.session.open, time::macros::time!(09:30));
    assert_eq!(config.session.utc_offset, time::macros::offset!(-05:00));
    assert!(config.session.exclude_weekends);
    assert_eq!(config.benchmarks[0].symbol.as_str(), "^GSPC");
    assert!(config.fetch_universe().iter().map(|s| s.as_str()).eq(["AAPL"]));
}

#[test]
fn when_file_is_missing_loading_fails_with_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.json");

    let error = WatchConfig::from_json_file(&path).expect_err("missing file must fail");

    assert!(matches!(error, ConfigError::Read { .. }));
    assert!(error.to_string().contains("absent.json"));
}

#[test]
fn when_file_has_unknown_fields_loading_fails() {
    let file = write_config(r#"{"watchlist": ["TCS.NS"], "refresh_every": 5}"#);

    let error = WatchConfig::from_json_file(file.path()).expect_err("unknown field must fail");

    assert!(matches!(error, ConfigError::Parse(_)));
}

#[test]
fn when_watchlist_repeats_a_symbol_validation_fails() {
    let file = write_config(r#"{"watchlist": ["TCS.NS", "INFY.NS", "TCS.NS"]}"#);

    let error = WatchConfig::from_json_file(file.path())
        .expect("file loads")
        .validate()
        .expect_err("duplicate must fail");

    assert_eq!(
        error.to_string(),
        "symbol 'TCS.NS' appears more than once in the watchlist"
    );
}

#[test]
fn when_watchlist_is_empty_validation_fails() {
    let file = write_config(r#"{"watchlist": []}"#);

    let error = WatchConfig::from_json_file(file.path())
        .expect("file loads")
        .validate()
        .expect_err("empty watchlist must fail");

    assert!(matches!(error, ConfigError::EmptyWatchlist));
}

#[test]
fn when_symbol_is_malformed_validation_names_the_list() {
    let file = write_config(r#"{"ticker_list": ["GOOD.NS", "bad symbol"]}"#);

    let error = WatchConfig::from_json_file(file.path())
        .expect("file loads")
        .validate()
        .expect_err("malformed symbol must fail");

    assert!(matches!(
        error,
        ConfigError::InvalidSymbol {
            list: "ticker list",
            ..
        }
    ));
}
