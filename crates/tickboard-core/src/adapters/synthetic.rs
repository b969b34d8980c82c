use std::future::Future;
use std::pin::Pin;

use time::OffsetDateTime;
use tracing::debug;

use crate::data_source::{HistoryRequest, PriceSource, SourceError};
use crate::{PriceField, ProviderId, RawPriceFrame, Symbol, SymbolHistory, TradingDate};

/// Deterministic offline price source.
///
/// Produces a seeded random walk per symbol on weekdays inside the requested
/// window, never past `as_of`. Every symbol skips a few sessions of its own so
/// aligned frames contain the gaps real exchange calendars produce.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    as_of: TradingDate,
}

impl Default for SyntheticSource {
    fn default() -> Self {
        Self {
            as_of: TradingDate::from_date(OffsetDateTime::now_utc().date()),
        }
    }
}

impl SyntheticSource {
    /// Last date (exclusive) for which data "exists".
    pub fn with_as_of(mut self, as_of: TradingDate) -> Self {
        self.as_of = as_of;
        self
    }

    fn generate(&self, symbol: &Symbol, req: &HistoryRequest) -> SymbolHistory {
        let seed = symbol_seed(symbol);
        let mut rng = fastrand::Rng::with_seed(seed);
        let mut price = 50.0 + (seed % 400) as f64;
        let drift = ((seed % 7) as f64 - 2.0) / 10_000.0;

        let mut dates = Vec::new();
        let mut open = Vec::new();
        let mut high = Vec::new();
        let mut low = Vec::new();
        let mut close = Vec::new();
        let mut volume = Vec::new();

        let mut cursor = Some(req.range.start());
        let mut session: u64 = 0;
        while let Some(date) = cursor {
            if !req.range.contains(date) || date >= self.as_of {
                break;
            }
            cursor = date.next_day();
            if date.is_weekend() {
                continue;
            }
            session += 1;

            let change = drift + (rng.f64() - 0.5) * 0.04;
            let previous = price;
            price = (price * (1.0 + change)).max(0.01);

            if (session + seed) % 29 == 0 {
                continue;
            }

            let spread = price * 0.01 * rng.f64();
            dates.push(date);
            open.push(Some(previous));
            high.push(Some(previous.max(price) + spread));
            low.push(Some((previous.min(price) - spread).max(0.0)));
            close.push(Some(price));
            volume.push(Some(rng.u64(100_000..1_000_000) as f64));
        }

        let history = SymbolHistory::new(symbol.clone(), dates)
            .with_field(PriceField::Open, open)
            .with_field(PriceField::High, high)
            .with_field(PriceField::Low, low);

        if req.adjusted {
            history
                .with_field(PriceField::Close, close)
                .with_field(PriceField::Volume, volume)
        } else {
            history
                .with_field(PriceField::Close, close.clone())
                .with_field(PriceField::AdjClose, close)
                .with_field(PriceField::Volume, volume)
        }
    }
}

impl PriceSource for SyntheticSource {
    fn id(&self) -> ProviderId {
        ProviderId::Synthetic
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawPriceFrame, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if req.symbols.is_empty() {
                return Err(SourceError::invalid_request(
                    "synthetic history request requires at least one symbol",
                ));
            }

            let histories = req
                .symbols
                .iter()
                .map(|symbol| self.generate(symbol, &req))
                .collect::<Vec<_>>();
            let frame = RawPriceFrame::from_histories(histories)
                .map_err(|e| SourceError::internal(e.to_string()))?;
            debug!(sessions = frame.len(), "synthetic history generated");
            Ok(frame)
        })
    }
}

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol.as_str().bytes().fold(0_u64, |acc, byte| {
        acc.wrapping_mul(33).wrapping_add(byte as u64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DateRange;

    fn request(symbols: &[&str], start: &str, end: &str) -> HistoryRequest {
        let symbols = symbols
            .iter()
            .map(|raw| Symbol::parse(raw).expect("valid symbol"))
            .collect();
        HistoryRequest::new(symbols, DateRange::parse(start, end).expect("range"))
            .expect("valid request")
    }

    fn source() -> SyntheticSource {
        SyntheticSource::default().with_as_of(TradingDate::parse("2025-01-01").expect("valid"))
    }

    #[tokio::test]
    async fn output_is_deterministic() {
        let a = source()
            .history(request(&["AAPL"], "2024-01-01", "2024-03-01"))
            .await
            .expect("generates");
        let b = source()
            .history(request(&["AAPL"], "2024-01-01", "2024-03-01"))
            .await
            .expect("generates");
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn each_symbol_walks_its_own_path() {
        let frame = source()
            .history(request(&["AAPL", "GOOG"], "2024-01-01", "2024-03-01"))
            .await
            .expect("generates");
        let aapl = Symbol::parse("AAPL").expect("valid");
        let goog = Symbol::parse("GOOG").expect("valid");
        let aapl = frame.column(PriceField::Close, &aapl).expect("AAPL close");
        let goog = frame.column(PriceField::Close, &goog).expect("GOOG close");
        assert_ne!(aapl.values, goog.values);

        for column in frame.columns.iter().filter(|c| c.field == PriceField::Volume) {
            assert!(column
                .values
                .iter()
                .flatten()
                .all(|volume| (100_000.0..1_000_000.0).contains(volume)));
        }
    }

    #[tokio::test]
    async fn skips_weekends_and_respects_window() {
        let frame = source()
            .history(request(&["GOOG"], "2024-01-01", "2024-02-01"))
            .await
            .expect("generates");
        assert!(!frame.is_empty());
        for date in &frame.dates {
            assert!(!date.is_weekend());
            assert!(date.format().as_str() >= "2024-01-01");
            assert!(date.format().as_str() < "2024-02-01");
        }
    }

    #[tokio::test]
    async fn nothing_exists_after_as_of() {
        let frame = source()
            .history(request(&["AAPL"], "2030-01-01", "2030-06-01"))
            .await
            .expect("generates");
        assert!(frame.is_empty());
        assert!(frame.has_field(PriceField::Close));
    }

    #[tokio::test]
    async fn prices_stay_positive() {
        let frame = source()
            .history(request(&["TSLA", "INFY.NS"], "2020-01-01", "2024-12-31"))
            .await
            .expect("generates");
        for column in frame.columns.iter().filter(|c| c.field == PriceField::Close) {
            assert!(column.values.iter().flatten().all(|value| *value > 0.0));
        }
    }
}
