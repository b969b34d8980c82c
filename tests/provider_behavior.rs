//! Behavior tests for price providers: Yahoo chart parsing through a stubbed
//! transport, failure mapping, and the offline synthetic source.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use serde_json::json;
use tickboard_core::{
    Dashboard, DashboardConfig, DashboardError, DateRange, HistoryRequest, HttpClient, HttpError,
    HttpRequest, HttpResponse, PriceField, PriceSource, ProviderId, Selection, SourceErrorKind,
    Symbol, SyntheticSource, TradingDate, YahooAdapter,
};
use tickboard_tests::{all_some, Arc};

/// Stub transport answering per chart symbol and recording every request.
struct ChartServer {
    charts: HashMap<String, Result<HttpResponse, HttpError>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ChartServer {
    fn new() -> Self {
        Self {
            charts: HashMap::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn with_chart(mut self, symbol: &str, body: String) -> Self {
        self.charts
            .insert(symbol.to_owned(), Ok(HttpResponse::ok_json(body)));
        self
    }

    fn with_response(mut self, symbol: &str, response: Result<HttpResponse, HttpError>) -> Self {
        self.charts.insert(symbol.to_owned(), response);
        self
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("not poisoned").len()
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("not poisoned")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }
}

impl HttpClient for ChartServer {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let symbol = request
            .url
            .split("/v8/finance/chart/")
            .nth(1)
            .and_then(|rest| rest.split('?').next())
            .unwrap_or_default()
            .to_owned();
        self.requests.lock().expect("not poisoned").push(request);

        let response = self.charts.get(&symbol).cloned().unwrap_or(Ok(HttpResponse {
            status: 404,
            body: String::new(),
        }));
        Box::pin(async move { response })
    }
}

/// Daily chart body starting at `first_ts`, one session per day.
fn chart(gmt_offset: i64, first_ts: i64, closes: &[Option<f64>]) -> String {
    let timestamps = (0..closes.len() as i64)
        .map(|day| first_ts + day * 86_400)
        .collect::<Vec<_>>();
    json!({
        "chart": {
            "result": [{
                "meta": { "gmtoffset": gmt_offset },
                "timestamp": timestamps,
                "indicators": {
                    "quote": [{ "open": closes, "high": closes, "low": closes, "close": closes }],
                    "adjclose": [{ "adjclose": closes }]
                }
            }],
            "error": null
        }
    })
    .to_string()
}

// 2024-01-02 09:30 New York and 09:15 Mumbai.
const NYSE_OPEN_JAN_2: i64 = 1_704_205_800;
const NSE_OPEN_JAN_2: i64 = 1_704_167_100;

fn selection(symbols: &[&str]) -> Selection {
    Selection::parse(symbols, "2024-01-01", "2024-01-31").expect("valid selection")
}

// =============================================================================
// Yahoo: end-to-end through the dashboard
// =============================================================================

#[tokio::test]
async fn when_yahoo_serves_two_exchanges_dates_align_on_local_sessions() {
    // Given: AAPL and TCS.NS charts in their own time zones
    let server = Arc::new(
        ChartServer::new()
            .with_chart(
                "AAPL",
                chart(-18_000, NYSE_OPEN_JAN_2, &all_some(&[100.0, 102.0, 101.0, 105.0, 110.0])),
            )
            .with_chart(
                "TCS.NS",
                chart(19_800, NSE_OPEN_JAN_2, &all_some(&[3700.0, 3710.0, 3690.0, 3720.0, 3750.0])),
            ),
    );
    let dashboard = Dashboard::new(Arc::new(YahooAdapter::with_http_client(server.clone())));

    // When: the dashboard renders both tickers
    let view = dashboard
        .render(&selection(&["AAPL", "TCS.NS"]))
        .await
        .expect("render should succeed");

    // Then: both charts land on the same five trading dates
    assert_eq!(server.request_count(), 2);
    assert_eq!(view.source, ProviderId::Yahoo);
    assert_eq!(view.prices.len(), 5);
    assert_eq!(
        view.prices.dates()[0],
        TradingDate::parse("2024-01-02").expect("valid")
    );
    let aapl = view
        .normalized
        .column(&Symbol::parse("AAPL").expect("valid"))
        .expect("AAPL column");
    assert_eq!(aapl.values, vec![100.0, 102.0, 101.0, 105.0, 110.0]);
}

#[tokio::test]
async fn when_yahoo_reports_null_closes_those_sessions_are_cleaned_out() {
    let server = Arc::new(ChartServer::new().with_chart(
        "GOOG",
        chart(-18_000, NYSE_OPEN_JAN_2, &[Some(140.0), None, Some(141.0)]),
    ));
    let adapter = YahooAdapter::with_http_client(server.clone())
        .with_base_url("http://127.0.0.1:8080/");
    let dashboard = Dashboard::new(Arc::new(adapter));

    let fetched = dashboard
        .fetch_prices(&selection(&["GOOG"]))
        .await
        .expect("fetch should succeed");
    assert_eq!(fetched.table.len(), 2);
    assert_eq!(fetched.source, ProviderId::Yahoo);
    assert!(server.urls()[0].starts_with("http://127.0.0.1:8080/v8/finance/chart/GOOG?"));
}

// =============================================================================
// Yahoo: failures
// =============================================================================

#[tokio::test]
async fn when_one_symbol_is_unknown_the_whole_fetch_fails() {
    // Given: AAPL resolves but ZZZZ returns 404
    let server = Arc::new(ChartServer::new().with_chart(
        "AAPL",
        chart(-18_000, NYSE_OPEN_JAN_2, &all_some(&[1.0, 2.0])),
    ));
    let dashboard = Dashboard::new(Arc::new(YahooAdapter::with_http_client(server)));

    // When: both are requested
    let err = dashboard
        .render(&selection(&["AAPL", "ZZZZ"]))
        .await
        .expect_err("must fail");

    // Then: a fetch failure names the unknown symbol
    assert!(matches!(err, DashboardError::FetchFailure { .. }));
    assert!(err.to_string().contains("ZZZZ"));
    assert!(err.to_string().contains("source.unknown_symbol"));
}

#[tokio::test]
async fn when_transport_times_out_fetch_failure_mentions_timeout() {
    let server = Arc::new(
        ChartServer::new().with_response("AAPL", Err(HttpError::timeout("deadline elapsed"))),
    );
    let adapter = YahooAdapter::with_http_client(server);

    let request = HistoryRequest::new(
        vec![Symbol::parse("AAPL").expect("valid")],
        DateRange::parse("2024-01-01", "2024-02-01").expect("valid"),
    )
    .expect("valid request");
    let err = adapter.history(request).await.expect_err("must fail");
    assert_eq!(err.kind(), SourceErrorKind::Timeout);

    let dashboard = Dashboard::new(Arc::new(adapter));
    let err = dashboard
        .render(&selection(&["AAPL"]))
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("source.timeout"));
}

#[tokio::test]
async fn when_yahoo_returns_server_error_fetch_fails() {
    let server = Arc::new(ChartServer::new().with_response(
        "AAPL",
        Ok(HttpResponse {
            status: 503,
            body: String::from("unavailable"),
        }),
    ));
    let err = Dashboard::new(Arc::new(YahooAdapter::with_http_client(server)))
        .render(&selection(&["AAPL"]))
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn when_yahoo_returns_garbage_fetch_fails_as_malformed() {
    let server = Arc::new(ChartServer::new().with_chart("AAPL", String::from("<html>")));
    let err = Dashboard::new(Arc::new(YahooAdapter::with_http_client(server)))
        .render(&selection(&["AAPL"]))
        .await
        .expect_err("must fail");
    assert!(err.to_string().contains("source.malformed_response"));
}

#[tokio::test]
async fn unadjusted_requests_keep_raw_close_and_report_adj_close() {
    let body = json!({
        "chart": {
            "result": [{
                "meta": { "gmtoffset": -18_000 },
                "timestamp": [NYSE_OPEN_JAN_2],
                "indicators": {
                    "quote": [{ "close": [200.0] }],
                    "adjclose": [{ "adjclose": [100.0] }]
                }
            }],
            "error": null
        }
    })
    .to_string();
    let server = Arc::new(ChartServer::new().with_chart("AAPL", body));
    let adapter = YahooAdapter::with_http_client(server);
    let symbol = Symbol::parse("AAPL").expect("valid");
    let request = HistoryRequest::new(vec![symbol.clone()], DateRange::default())
        .expect("valid request");

    let adjusted = adapter.history(request.clone()).await.expect("fetches");
    let close = adjusted.column(PriceField::Close, &symbol).expect("close");
    assert_eq!(close.values, vec![Some(100.0)]);

    let raw = adapter
        .history(request.with_adjusted(false))
        .await
        .expect("fetches");
    let close = raw.column(PriceField::Close, &symbol).expect("close");
    let adj_close = raw.column(PriceField::AdjClose, &symbol).expect("adj close");
    assert_eq!(close.values, vec![Some(200.0)]);
    assert_eq!(adj_close.values, vec![Some(100.0)]);
}

// =============================================================================
// Synthetic source
// =============================================================================

#[tokio::test]
async fn synthetic_history_is_deterministic_and_weekday_only() {
    let as_of = TradingDate::parse("2025-01-01").expect("valid");
    let source = SyntheticSource::default().with_as_of(as_of);
    let request = HistoryRequest::new(
        vec![Symbol::parse("TCS.NS").expect("valid")],
        DateRange::parse("2024-01-01", "2024-06-30").expect("valid"),
    )
    .expect("valid request");

    let first = source.history(request.clone()).await.expect("generates");
    let second = source.history(request).await.expect("generates");

    assert_eq!(first, second);
    assert!(!first.is_empty());
    assert!(first.dates.iter().all(|date| !date.is_weekend()));
}

#[tokio::test]
async fn synthetic_history_stops_at_as_of() {
    let as_of = TradingDate::parse("2024-03-01").expect("valid");
    let source = SyntheticSource::default().with_as_of(as_of);
    let dashboard = Dashboard::new(Arc::new(source))
        .with_config(DashboardConfig::default().with_adjusted(false));

    let fetched = dashboard
        .fetch_prices(&Selection::parse(&["AAPL"], "2024-01-01", "2024-12-31").expect("valid"))
        .await
        .expect("fetches");
    assert!(fetched.table.dates().iter().all(|date| *date < as_of));
    assert_eq!(fetched.source, ProviderId::Synthetic);
}

#[tokio::test]
async fn future_range_yields_empty_table_not_error() {
    let source = SyntheticSource::default()
        .with_as_of(TradingDate::parse("2024-01-01").expect("valid"));
    let view = Dashboard::new(Arc::new(source))
        .render(&Selection::parse(&["AAPL", "GOOG"], "2030-01-01", "2030-12-31").expect("valid"))
        .await
        .expect("renders");
    assert!(view.prices.is_empty());
    assert!(view.normalized.is_empty());
}
