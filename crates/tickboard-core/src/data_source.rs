//! Price source trait and request/error types.
//!
//! A [`PriceSource`] turns a [`HistoryRequest`] into a [`RawPriceFrame`]. The
//! dashboard issues exactly one such call per invocation and treats every
//! [`SourceError`] as a fetch failure.
//!
//! ```rust,ignore
//! use tickboard_core::{DateRange, HistoryRequest, PriceSource, Symbol, YahooAdapter};
//!
//! async fn fetch(adapter: &YahooAdapter) -> Result<(), tickboard_core::SourceError> {
//!     let request = HistoryRequest::new(vec![Symbol::parse("AAPL")?], DateRange::default())?;
//!     let frame = adapter.history(request).await?;
//!     println!("{} sessions", frame.len());
//!     Ok(())
//! }
//! ```

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{DateRange, ProviderId, RawPriceFrame, Symbol, ValidationError};

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    Timeout,
    InvalidRequest,
    UnknownSymbol,
    MalformedResponse,
    Internal,
}

/// Structured provider error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::Unavailable, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::Timeout, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::InvalidRequest, message)
    }

    pub fn unknown_symbol(symbol: &Symbol) -> Self {
        Self::with_kind(
            SourceErrorKind::UnknownSymbol,
            format!("no price data found for symbol '{symbol}'"),
        )
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::MalformedResponse, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_kind(SourceErrorKind::Internal, message)
    }

    fn with_kind(kind: SourceErrorKind, message: impl Into<String>) -> Self {
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

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Timeout => "source.timeout",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::UnknownSymbol => "source.unknown_symbol",
            SourceErrorKind::MalformedResponse => "source.malformed_response",
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

impl From<ValidationError> for SourceError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_request(error.to_string())
    }
}

/// Daily history request: symbols, window and whether closes are split/dividend adjusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbols: Vec<Symbol>,
    pub range: DateRange,
    pub adjusted: bool,
}

impl HistoryRequest {
    pub fn new(symbols: Vec<Symbol>, range: DateRange) -> Result<Self, SourceError> {
        if symbols.is_empty() {
            return Err(SourceError::invalid_request(
                "history request must include at least one symbol",
            ));
        }
        Ok(Self {
            symbols,
            range,
            adjusted: true,
        })
    }

    pub fn with_adjusted(mut self, adjusted: bool) -> Self {
        self.adjusted = adjusted;
        self
    }
}

/// Price provider contract.
///
/// With `adjusted` set, providers report the adjusted close under
/// [`PriceField::Close`](crate::PriceField::Close), so consumers never need to
/// know which closing series was requested.
pub trait PriceSource: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Fetch daily history for every requested symbol in one logical call.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] when the provider is unreachable, answers with an
    /// error payload, or returns data that cannot be parsed.
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawPriceFrame, SourceError>> + Send + 'a>>;
}
