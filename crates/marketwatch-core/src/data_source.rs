//! Quote source trait and its error type.
//!
//! A [`QuoteSource`] is the black-box upstream: given a [`HistoryRequest`] it
//! returns a [`CloseSeries`] or a [`SourceError`]. Sources never decide what
//! a failure means for the display; that is the job of
//! [`QuoteAdapter`](crate::QuoteAdapter), which turns every error into
//! [`QuoteOutcome::Unavailable`](crate::QuoteOutcome).

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{CloseSeries, HistoryRequest, ProviderId};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    Timeout,
    Internal,
}

/// Structured quote source error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::RateLimited, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Timeout, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the next tick may reasonably succeed where this one failed.
    pub const fn retryable(&self) -> bool {
        matches!(
            self.kind,
            SourceErrorKind::Unavailable | SourceErrorKind::RateLimited | SourceErrorKind::Timeout
        )
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Upstream provider of intraday close prices.
///
/// Implementations must be `Send + Sync`; one source instance serves every
/// symbol of a tick, possibly with several requests in flight.
pub trait QuoteSource: Send + Sync {
    /// Returns the provider identifier used in logs.
    fn id(&self) -> ProviderId;

    /// Fetches the close series described by `req`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider is unreachable, rate-limits
    /// the call, rejects the symbol or returns a payload that cannot be
    /// parsed.
    fn closes<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<CloseSeries, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_and_retryability_follow_kind() {
        let limited = SourceError::rate_limited("slow down");
        assert_eq!(limited.code(), "source.rate_limited");
        assert!(limited.retryable());

        let internal = SourceError::internal("bad payload");
        assert_eq!(internal.code(), "source.internal");
        assert!(!internal.retryable());
        assert_eq!(internal.to_string(), "bad payload (source.internal)");
    }
}
