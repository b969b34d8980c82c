//! # Tickboard Core
//!
//! Price history pipeline behind the `tickboard` stock dashboard.
//!
//! ## Overview
//!
//! - **Price sources** for daily history (Yahoo chart API, offline synthetic data)
//! - **Cleaning** of provider frames into complete closing-price tables
//! - **Normalized returns** where every series starts at 100
//! - **Indicators** (SMA short/long, Wilder RSI) for a single ticker
//! - **Company metadata** (name, sector, logo) for selected tickers
//! - **CSV export** of the cleaned table
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Yahoo and synthetic price sources |
//! | [`cleaner`] | Close extraction and complete-row filtering |
//! | [`companies`] | Embedded company directory |
//! | [`config`] | Dashboard runtime configuration |
//! | [`dashboard`] | End-to-end pipeline |
//! | [`data_source`] | Price source trait and request/error types |
//! | [`domain`] | Symbols, dates and price tables |
//! | [`envelope`] | JSON response envelope |
//! | [`error`] | Validation and dashboard errors |
//! | [`export`] | CSV export |
//! | [`http_client`] | HTTP client abstraction |
//! | [`indicators`] | SMA and RSI |
//! | [`normalize`] | Rebasing to 100 |
//! | [`source`] | Provider identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tickboard_core::{Dashboard, Selection, YahooAdapter};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dashboard = Dashboard::new(Arc::new(YahooAdapter::default()));
//!     let selection = Selection::parse(&["AAPL"], "2024-01-01", "2024-12-31")?;
//!
//!     let view = dashboard.render(&selection).await?;
//!     if let Some(rsi) = view.indicators.as_ref().and_then(|s| s.latest_rsi()) {
//!         println!("AAPL RSI(14): {rsi:.1}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! Selection ──▶ PriceSource::history ──▶ clean ──▶ PriceTable
//!                                                    │
//!                    ┌───────────────┬───────────────┼──────────────┐
//!                    ▼               ▼               ▼              ▼
//!                normalize     IndicatorSeries     tail         to_csv
//! ```

pub mod adapters;
pub mod cleaner;
pub mod companies;
pub mod config;
pub mod dashboard;
pub mod data_source;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod export;
pub mod http_client;
pub mod indicators;
pub mod normalize;
pub mod source;

pub use adapters::{SyntheticSource, YahooAdapter};
pub use cleaner::clean;
pub use companies::{CompanyDataError, CompanyDirectory, CompanyMeta, SectorRow};
pub use config::{DashboardConfig, DEFAULT_PREVIEW_ROWS, DEFAULT_TIMEOUT_MS};
pub use dashboard::{Dashboard, DashboardView, FetchedPrices, Selection};
pub use data_source::{HistoryRequest, PriceSource, SourceError, SourceErrorKind};
pub use domain::{
    DateRange, NormalizedSeries, PriceColumn, PriceField, PriceTable, RawColumn, RawPriceFrame,
    Symbol, SymbolHistory, TradingDate,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{DashboardError, Severity, ValidationError};
pub use export::{
    parse_csv, to_csv, write_csv, write_csv_file, ExportError, EXPORT_FILE_NAME, EXPORT_MIME,
};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use indicators::{
    rsi, sma, Indicator, IndicatorConfig, IndicatorError, IndicatorRow, IndicatorSeries, RsiZone,
    DEFAULT_RSI_WINDOW, DEFAULT_SMA_LONG, DEFAULT_SMA_SHORT, RSI_OVERBOUGHT, RSI_OVERSOLD,
};
pub use normalize::normalize;
pub use source::ProviderId;
