//! End-to-end dashboard pipeline: fetch → clean → normalize → indicators.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::companies::{CompanyDirectory, CompanyMeta, SectorRow};
use crate::data_source::{HistoryRequest, PriceSource};
use crate::{
    clean, normalize, to_csv, DashboardConfig, DashboardError, DateRange, IndicatorSeries,
    NormalizedSeries, PriceTable, ProviderId, RsiZone, Symbol, ValidationError,
};

/// Tickers and date window chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub symbols: Vec<Symbol>,
    pub range: DateRange,
}

impl Selection {
    pub fn new(symbols: Vec<Symbol>, range: DateRange) -> Self {
        Self { symbols, range }
    }

    /// Parse raw ticker strings and `YYYY-MM-DD` bounds. Blank tickers are
    /// dropped, so an all-blank list yields an empty selection.
    pub fn parse<S: AsRef<str>>(
        symbols: &[S],
        start: &str,
        end: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            symbols: Symbol::parse_list(symbols)?,
            range: DateRange::parse(start, end)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Cleaned prices together with fetch bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchedPrices {
    pub source: ProviderId,
    pub latency_ms: u64,
    pub table: PriceTable,
}

/// Everything one dashboard interaction renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub selection: Selection,
    pub source: ProviderId,
    pub latency_ms: u64,
    pub prices: PriceTable,
    pub normalized: NormalizedSeries,
    /// Trailing rows of `prices`.
    pub preview: PriceTable,
    pub companies: Vec<CompanyMeta>,
    pub sector_table: Vec<SectorRow>,
    /// Present only when exactly one symbol is selected.
    pub indicators: Option<IndicatorSeries>,
    pub rsi_zone: Option<RsiZone>,
    /// Non-fatal outcomes, e.g. the skipped indicator panel.
    #[serde(skip)]
    pub notices: Vec<DashboardError>,
}

impl DashboardView {
    /// CSV of the cleaned closing prices.
    pub fn export_csv(&self) -> Result<String, DashboardError> {
        Ok(to_csv(&self.prices)?)
    }

    /// Human-readable notices, including indicators skipped for lack of data.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = self
            .notices
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        if let Some(series) = &self.indicators {
            warnings.extend(series.notices.iter().map(ToString::to_string));
        }
        warnings
    }
}

/// Dashboard pipeline bound to one price source and company directory.
#[derive(Clone)]
pub struct Dashboard {
    source: Arc<dyn PriceSource>,
    companies: Arc<CompanyDirectory>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(source: Arc<dyn PriceSource>) -> Self {
        Self {
            source,
            companies: Arc::new(CompanyDirectory::builtin().clone()),
            config: DashboardConfig::default(),
        }
    }

    pub fn with_companies(mut self, companies: CompanyDirectory) -> Self {
        self.companies = Arc::new(companies);
        self
    }

    pub fn with_config(mut self, config: DashboardConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn companies(&self) -> &CompanyDirectory {
        &self.companies
    }

    pub fn source_id(&self) -> ProviderId {
        self.source.id()
    }

    /// Fetch and clean closing prices for `selection` with a single provider call.
    ///
    /// # Errors
    ///
    /// [`DashboardError::EmptySelection`] before any request is made, and
    /// [`DashboardError::FetchFailure`] for provider errors, timeouts and
    /// frames without closing prices.
    pub async fn fetch_prices(&self, selection: &Selection) -> Result<FetchedPrices, DashboardError> {
        if selection.is_empty() {
            warn!("no symbols selected");
            return Err(DashboardError::EmptySelection);
        }

        let request = HistoryRequest::new(selection.symbols.clone(), selection.range)?
            .with_adjusted(self.config.adjusted);
        let source = self.source.id();
        info!(
            %source,
            symbols = selection.symbols.len(),
            start = %selection.range.start(),
            end = %selection.range.end(),
            "fetching price history"
        );

        let started = Instant::now();
        let frame = tokio::time::timeout(
            Duration::from_millis(self.config.timeout_ms),
            self.source.history(request),
        )
        .await
        .map_err(|_| {
            DashboardError::fetch_failure(format!(
                "{source} did not respond within {} ms",
                self.config.timeout_ms
            ))
        })??;
        let latency_ms = started.elapsed().as_millis() as u64;
        debug!(%source, latency_ms, sessions = frame.len(), "price history received");

        let table = clean(&frame, &selection.symbols)?;
        Ok(FetchedPrices {
            source,
            latency_ms,
            table,
        })
    }

    /// Prices rescaled to start at 100.
    pub async fn returns(&self, selection: &Selection) -> Result<NormalizedSeries, DashboardError> {
        let fetched = self.fetch_prices(selection).await?;
        normalize(&fetched.table)
    }

    /// Indicator panel for a single-symbol selection.
    ///
    /// # Errors
    ///
    /// [`DashboardError::InvalidIndicatorInput`] when more than one symbol is
    /// selected; nothing is fetched in that case.
    pub async fn indicators(&self, selection: &Selection) -> Result<IndicatorSeries, DashboardError> {
        if selection.symbols.len() > 1 {
            return Err(DashboardError::InvalidIndicatorInput {
                count: selection.symbols.len(),
            });
        }
        let fetched = self.fetch_prices(selection).await?;
        IndicatorSeries::from_table(&fetched.table, self.config.indicators)
    }

    /// Run the full pipeline for one interaction.
    ///
    /// Fetch failures and degenerate series abort the render. More than one
    /// selected symbol only skips the indicator panel.
    pub async fn render(&self, selection: &Selection) -> Result<DashboardView, DashboardError> {
        let fetched = self.fetch_prices(selection).await?;
        let prices = fetched.table;
        let normalized = normalize(&prices)?;

        let mut notices = Vec::new();
        let indicators = match IndicatorSeries::from_table(&prices, self.config.indicators) {
            Ok(series) => Some(series),
            Err(notice @ DashboardError::InvalidIndicatorInput { .. }) => {
                debug!(%notice, "indicator panel skipped");
                notices.push(notice);
                None
            }
            Err(error) => return Err(error),
        };
        let rsi_zone = indicators.as_ref().and_then(IndicatorSeries::rsi_zone);

        let companies = self
            .companies
            .profiles_for(&selection.symbols)
            .into_iter()
            .cloned()
            .collect();
        let sector_table = self.companies.sector_rows(&selection.symbols);
        let preview = prices.tail(self.config.preview_rows);

        info!(
            rows = prices.len(),
            columns = prices.columns().len(),
            indicators = indicators.is_some(),
            "dashboard rendered"
        );

        Ok(DashboardView {
            selection: selection.clone(),
            source: fetched.source,
            latency_ms: fetched.latency_ms,
            prices,
            normalized,
            preview,
            companies,
            sector_table,
            indicators,
            rsi_zone,
            notices,
        })
    }
}
