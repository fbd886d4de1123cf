use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::circuit_breaker::CircuitBreaker;
use crate::data_source::{QuoteSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{CloseSeries, HistoryRequest, ProviderId};

const CHART_ENDPOINT: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Yahoo Finance chart endpoint source.
///
/// Every symbol is fetched with its own request; a shared circuit breaker
/// short-circuits the remaining symbols of a tick once the provider is
/// clearly down.
#[derive(Clone)]
pub struct YahooChartSource {
    http_client: Arc<dyn HttpClient>,
    circuit_breaker: Arc<CircuitBreaker>,
    timeout_ms: u64,
}

impl Default for YahooChartSource {
    fn default() -> Self {
        Self {
            http_client: Arc::new(ReqwestHttpClient::default()),
            circuit_breaker: Arc::new(CircuitBreaker::default()),
            timeout_ms: 3_000,
        }
    }
}

impl YahooChartSource {
    pub fn new(http_client: Arc<dyn HttpClient>, circuit_breaker: Arc<CircuitBreaker>) -> Self {
        Self {
            http_client,
            circuit_breaker,
            timeout_ms: 3_000,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn circuit_breaker(&self) -> &CircuitBreaker {
        &self.circuit_breaker
    }

    fn chart_url(req: &HistoryRequest) -> String {
        format!(
            "{CHART_ENDPOINT}/{}?range={}&interval={}&includePrePost=false",
            urlencoding::encode(req.symbol.as_str()),
            req.range,
            req.interval,
        )
    }

    async fn fetch_chart(&self, req: HistoryRequest) -> Result<CloseSeries, SourceError> {
        if !self.circuit_breaker.allow_request() {
            return Err(SourceError::unavailable(
                "yahoo circuit breaker is open; skipping upstream call",
            ));
        }

        let request = HttpRequest::get(Self::chart_url(&req))
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|error| {
            self.circuit_breaker.record_failure();
            if error.timed_out() {
                SourceError::timeout(format!("yahoo transport timeout: {}", error.message()))
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", error.message()))
            }
        })?;

        if !response.is_success() {
            return Err(self.classify_status(&req, response.status));
        }

        self.circuit_breaker.record_success();
        parse_chart(&req, &response.body)
    }
}

impl YahooChartSource {
    fn classify_status(&self, req: &HistoryRequest, status: u16) -> SourceError {
        match status {
            429 => {
                self.circuit_breaker.record_failure();
                SourceError::rate_limited("yahoo returned status 429")
            }
            404 => {
                // Unknown symbol; the provider itself is healthy.
                self.circuit_breaker.record_success();
                SourceError::invalid_request(format!("yahoo has no chart for '{}'", req.symbol))
            }
            status => {
                self.circuit_breaker.record_failure();
                SourceError::unavailable(format!("yahoo returned status {status}"))
            }
        }
    }
}

impl QuoteSource for YahooChartSource {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn closes<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CloseSeries, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_chart(req))
    }
}

fn parse_chart(req: &HistoryRequest, body: &str) -> Result<CloseSeries, SourceError> {
    let chart_response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart_response.chart.error {
        return Err(SourceError::unavailable(format!(
            "yahoo chart API error: {}: {}",
            error.code, error.description
        )));
    }

    let closes = chart_response
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|result| result.indicators.quote.into_iter().next())
        .map(|quote| quote.close)
        .unwrap_or_default();

    Ok(CloseSeries::new(req.symbol.clone(), closes))
}

// Yahoo Finance chart response structures

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}
