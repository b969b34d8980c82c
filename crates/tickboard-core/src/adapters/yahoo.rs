use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::data_source::{HistoryRequest, PriceSource, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{
    DateRange, PriceField, ProviderId, RawPriceFrame, Symbol, SymbolHistory, TradingDate,
};

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Yahoo Finance daily history through the public v8 chart endpoint.
///
/// Each symbol is requested in turn and the responses are aligned into one
/// frame; a failure for any symbol fails the whole fetch.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for YahooAdapter {
    fn default() -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::default()))
    }
}

impl YahooAdapter {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 10_000,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn chart_url(&self, symbol: &Symbol, range: &DateRange) -> String {
        format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&includeAdjustedClose=true&events=div%2Csplit",
            self.base_url,
            urlencoding::encode(symbol.as_str()),
            range.start().unix_midnight(),
            range.end().unix_midnight(),
        )
    }

    async fn fetch_symbol(
        &self,
        symbol: &Symbol,
        req: &HistoryRequest,
    ) -> Result<SymbolHistory, SourceError> {
        let endpoint = self.chart_url(symbol, &req.range);
        debug!(%symbol, %endpoint, "requesting yahoo chart");

        let request = HttpRequest::get(&endpoint)
            .with_header("referer", "https://finance.yahoo.com/")
            .with_timeout_ms(self.timeout_ms);

        let response = self.http_client.execute(request).await.map_err(|e| {
            if e.timed_out() {
                SourceError::timeout(format!("yahoo request for {symbol} timed out: {}", e.message()))
            } else {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            }
        })?;

        if response.status == 404 {
            return Err(SourceError::unknown_symbol(symbol));
        }
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {} for {symbol}",
                response.status
            )));
        }

        parse_chart(symbol, &response.body, req.adjusted)
    }
}

impl PriceSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<RawPriceFrame, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            if req.symbols.is_empty() {
                return Err(SourceError::invalid_request(
                    "yahoo history request requires at least one symbol",
                ));
            }

            let mut histories = Vec::with_capacity(req.symbols.len());
            for symbol in &req.symbols {
                histories.push(self.fetch_symbol(symbol, &req).await?);
            }

            let frame = RawPriceFrame::from_histories(histories)
                .map_err(|e| SourceError::malformed(e.to_string()))?;
            info!(
                symbols = req.symbols.len(),
                sessions = frame.len(),
                "yahoo history fetched"
            );
            Ok(frame)
        })
    }
}

/// Parse a v8 chart body into one symbol's history.
fn parse_chart(symbol: &Symbol, body: &str, adjusted: bool) -> Result<SymbolHistory, SourceError> {
    let chart: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| SourceError::malformed(format!("failed to parse yahoo chart: {e}")))?;

    if let Some(error) = chart.chart.error {
        return Err(if error.code.eq_ignore_ascii_case("not found") {
            SourceError::unknown_symbol(symbol)
        } else {
            SourceError::unavailable(format!(
                "yahoo chart API error: {} ({})",
                error.description, error.code
            ))
        });
    }

    let result = chart
        .chart
        .result
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or_else(|| SourceError::unknown_symbol(symbol))?;

    let gmt_offset = result.meta.as_ref().map_or(0, |meta| meta.gmt_offset);
    let dates = result
        .timestamp
        .iter()
        .map(|&ts| TradingDate::from_unix_with_offset(ts, gmt_offset))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SourceError::malformed(format!("invalid yahoo timestamp: {e}")))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adj_close = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|block| block.adjclose);

    let len = dates.len();
    let open = pad(quote.open, len);
    let high = pad(quote.high, len);
    let low = pad(quote.low, len);
    let close = pad(quote.close, len);
    let volume = pad(quote.volume, len);

    let history = SymbolHistory::new(symbol.clone(), dates);
    let history = match (adjusted, adj_close) {
        (true, Some(adj_close)) => {
            let adj_close = pad(adj_close, len);
            let factors: Vec<Option<f64>> = close
                .iter()
                .zip(&adj_close)
                .map(|(raw, adj)| match (raw, adj) {
                    (Some(raw), Some(adj)) if *raw != 0.0 => Some(adj / raw),
                    _ => None,
                })
                .collect();
            history
                .with_field(PriceField::Open, scale(&open, &factors))
                .with_field(PriceField::High, scale(&high, &factors))
                .with_field(PriceField::Low, scale(&low, &factors))
                .with_field(PriceField::Close, adj_close)
                .with_field(PriceField::Volume, volume)
        }
        (false, Some(adj_close)) => history
            .with_field(PriceField::Open, open)
            .with_field(PriceField::High, high)
            .with_field(PriceField::Low, low)
            .with_field(PriceField::Close, close)
            .with_field(PriceField::AdjClose, pad(adj_close, len))
            .with_field(PriceField::Volume, volume),
        (_, None) => history
            .with_field(PriceField::Open, open)
            .with_field(PriceField::High, high)
            .with_field(PriceField::Low, low)
            .with_field(PriceField::Close, close)
            .with_field(PriceField::Volume, volume),
    };

    Ok(history)
}

// Yahoo omits or truncates arrays for sparse sessions; align to the timestamp count.
fn pad(mut values: Vec<Option<f64>>, len: usize) -> Vec<Option<f64>> {
    values.resize(len, None);
    values
}

fn scale(values: &[Option<f64>], factors: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .iter()
        .zip(factors)
        .map(|(value, factor)| match (value, factor) {
            (Some(value), Some(factor)) => Some(value * factor),
            _ => None,
        })
        .collect()
}

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
    meta: Option<YahooChartMeta>,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartMeta {
    #[serde(rename = "gmtoffset", default)]
    gmt_offset: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
    #[serde(default)]
    adjclose: Vec<YahooAdjClose>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooAdjClose {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}
