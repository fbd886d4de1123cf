//! Contract tests every quote source must satisfy, plus the Yahoo chart
//! adapter driven end to end through a recording HTTP client.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use marketwatch_core::{
    CircuitBreaker, CircuitBreakerConfig, CircuitState, HistoryRequest, HttpClient, HttpError,
    HttpRequest, HttpResponse, ManualClock, MarketWatch, ProviderId, Quote, QuoteAdapter,
    QuoteOutcome, QuoteSource, SourceErrorKind, Symbol, SyntheticSource, UniformQuantities,
    WatchConfig, YahooChartSource,
};

/// Replays queued responses in order, repeating the last one, and records
/// every request it sees.
struct RecordingHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    fn new(responses: Vec<Result<HttpResponse, HttpError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("request log is not poisoned").len()
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request log is not poisoned")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request log is not poisoned")
            .push(request);
        let mut responses = self.responses.lock().expect("responses are not poisoned");
        let response = if responses.len() > 1 {
            responses.pop_front()
        } else {
            responses.front().cloned()
        }
        .unwrap_or_else(|| Err(HttpError::transport("no scripted response")));
        Box::pin(async move { response })
    }
}

fn chart_body(closes: &str) -> String {
    format!(
        r#"{{"chart":{{"result":[{{"meta":{{"currency":"INR"}},"timestamp":[1,2,3,4],
        "indicators":{{"quote":[{{"close":{closes}}}]}}}}],"error":null}}}}"#
    )
}

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

fn yahoo(client: Arc<RecordingHttpClient>) -> YahooChartSource {
    let breaker = CircuitBreaker::new(
        CircuitBreakerConfig::default(),
        Arc::new(ManualClock::default()),
    );
    YahooChartSource::new(client, Arc::new(breaker))
}

fn contract_sources() -> Vec<(ProviderId, Arc<dyn QuoteSource>)> {
    let client = Arc::new(RecordingHttpClient::new(vec![Ok(HttpResponse::ok_json(
        chart_body("[2510.0,null,2522.5,2519.75]"),
    ))]));
    vec![
        (ProviderId::Yahoo, Arc::new(yahoo(client))),
        (ProviderId::Synthetic, Arc::new(SyntheticSource::new())),
    ]
}

// =============================================================================
// Contract: every source
// =============================================================================

#[tokio::test]
async fn every_source_reports_its_id_and_returns_closes_for_the_requested_symbol() {
    for (id, source) in contract_sources() {
        assert_eq!(source.id(), id);

        let series = source
            .closes(HistoryRequest::quote(symbol("RELIANCE.NS")))
            .await
            .unwrap_or_else(|error| panic!("{id} failed: {error}"));

        assert_eq!(series.symbol, symbol("RELIANCE.NS"), "{id}");
        assert!(series.last_close().is_some_and(|close| close > 0.0), "{id}");
    }
}

#[tokio::test]
async fn every_source_yields_a_quote_through_the_adapter() {
    for (id, source) in contract_sources() {
        let adapter = QuoteAdapter::new(source, Duration::from_secs(3));

        let outcome = adapter.quote(&symbol("TCS.NS")).await;

        let quote = outcome.quote().unwrap_or_else(|| panic!("{id} unavailable"));
        assert!(quote.price > 0.0 && quote.previous_close > 0.0, "{id}");
    }
}

// =============================================================================
// Yahoo chart endpoint
// =============================================================================

#[tokio::test]
async fn yahoo_quote_uses_last_two_valid_closes() {
    let client = Arc::new(RecordingHttpClient::new(vec![Ok(HttpResponse::ok_json(
        chart_body("[2510.0,2522.5,null,2519.75,null]"),
    ))]));
    let adapter = QuoteAdapter::new(Arc::new(yahoo(Arc::clone(&client))), Duration::from_secs(3));

    let outcome = adapter.quote(&symbol("RELIANCE.NS")).await;

    assert_eq!(
        outcome,
        QuoteOutcome::Available(Quote {
            price: 2519.75,
            previous_close: 2522.5
        })
    );
    assert_eq!(
        client.urls(),
        vec!["https://query1.finance.yahoo.com/v8/finance/chart/RELIANCE.NS?range=2d&interval=1m&includePrePost=false"]
    );
}

#[tokio::test]
async fn yahoo_index_level_requests_one_day() {
    let client = Arc::new(RecordingHttpClient::new(vec![Ok(HttpResponse::ok_json(
        chart_body("[22010.0,22015.5]"),
    ))]));
    let adapter = QuoteAdapter::new(Arc::new(yahoo(Arc::clone(&client))), Duration::from_secs(3));

    assert_eq!(adapter.index_level(&symbol("^NSEI")).await, Some(22_015.5));
    assert_eq!(
        client.urls(),
        vec!["https://query1.finance.yahoo.com/v8/finance/chart/%5ENSEI?range=1d&interval=1m&includePrePost=false"]
    );
}

#[tokio::test]
async fn yahoo_unknown_symbol_does_not_trip_the_breaker() {
    let client = Arc::new(RecordingHttpClient::new(vec![Ok(HttpResponse {
        status: 404,
        body: String::from(r#"{"chart":{"result":null,"error":{"code":"Not Found"}}}"#),
    })]));
    let source = yahoo(client);

    for _ in 0..5 {
        let error = source
            .closes(HistoryRequest::quote(symbol("NOPE.NS")))
            .await
            .expect_err("404 must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
    }
    assert_eq!(source.circuit_breaker().state(), CircuitState::Closed);
}

#[tokio::test]
async fn yahoo_transport_timeout_is_classified_as_timeout() {
    let client = Arc::new(RecordingHttpClient::new(vec![Err(HttpError::timeout(
        "deadline elapsed",
    ))]));

    let error = yahoo(client)
        .closes(HistoryRequest::quote(symbol("ITC.NS")))
        .await
        .expect_err("timeout must fail");

    assert_eq!(error.kind(), SourceErrorKind::Timeout);
    assert!(error.retryable());
}

#[tokio::test]
async fn yahoo_recovers_after_breaker_timeout() {
    let client = Arc::new(RecordingHttpClient::new(vec![
        Err(HttpError::transport("reset")),
        Err(HttpError::transport("reset")),
        Err(HttpError::transport("reset")),
        Ok(HttpResponse::ok_json(chart_body("[10.0,11.0]"))),
    ]));
    let clock = Arc::new(ManualClock::default());
    let breaker = Arc::new(CircuitBreaker::new(
        CircuitBreakerConfig::default(),
        Arc::clone(&clock) as _,
    ));
    let source = YahooChartSource::new(Arc::clone(&client) as _, breaker);
    let request = || HistoryRequest::quote(symbol("SBIN.NS"));

    for _ in 0..3 {
        assert!(source.closes(request()).await.is_err());
    }
    assert!(source.closes(request()).await.is_err());
    assert_eq!(client.request_count(), 3);

    clock.advance(Duration::from_secs(30));
    let series = source.closes(request()).await.expect("half-open probe succeeds");

    assert_eq!(series.last_close(), Some(11.0));
    assert_eq!(source.circuit_breaker().state(), CircuitState::Closed);
}

// =============================================================================
// Yahoo outage through the whole pipeline
// =============================================================================

#[tokio::test]
async fn provider_outage_renders_every_row_as_sentinel() {
    // Given: Yahoo answers 503 to everything and one fetch at a time
    let client = Arc::new(RecordingHttpClient::new(vec![Ok(HttpResponse {
        status: 503,
        body: String::from("Service Unavailable"),
    })]));
    let config = WatchConfig {
        max_concurrent_fetches: 1,
        ..WatchConfig::default()
    }
    .validate()
    .expect("valid config");
    let clock = Arc::new(ManualClock::default());
    let watch = MarketWatch::with_source(config, Arc::new(yahoo(Arc::clone(&client))), clock);

    // When
    let snapshot = watch.refresh(&mut UniformQuantities::with_seed(1)).await;

    // Then: The table still renders, zeroed, and the breaker capped upstream calls
    assert_eq!(snapshot.table.len(), 15);
    assert!(snapshot.table.rows.iter().all(|row| row.price == 0.0 && row.ask == 0.0));
    assert!(snapshot.top_bar.indices.iter().all(|index| index.level == 0.0));
    assert!(client.request_count() <= 3);
}
