//! Technical indicators for a single symbol's closing prices.
//!
//! | Indicator | Default window | First defined index |
//! |-----------|----------------|---------------------|
//! | SMA short | 30 | 29 |
//! | SMA long | 100 | 99 |
//! | RSI (Wilder) | 14 | 13 |
//!
//! An indicator whose window exceeds the available history is reported in
//! [`IndicatorSeries::notices`] and its column stays empty; computing the
//! series itself never fails for lack of data.

use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::{DashboardError, PriceTable, Symbol, TradingDate, ValidationError};

pub const DEFAULT_SMA_SHORT: usize = 30;
pub const DEFAULT_SMA_LONG: usize = 100;
pub const DEFAULT_RSI_WINDOW: usize = 14;

/// Conventional RSI reference lines.
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const RSI_OVERSOLD: f64 = 30.0;

/// Indicator identity, used in notices and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Indicator {
    Sma { window: usize },
    Rsi { window: usize },
}

impl Display for Indicator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sma { window } => write!(f, "SMA({window})"),
            Self::Rsi { window } => write!(f, "RSI({window})"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IndicatorError {
    #[error("indicator window must be greater than zero")]
    InvalidWindow,
    #[error("insufficient data for {indicator}: need {required} observations, have {observations}")]
    InsufficientData {
        indicator: Indicator,
        required: usize,
        observations: usize,
    },
}

/// Simple moving average over a trailing window.
///
/// Position `i` holds the mean of `closes[i + 1 - window..=i]`; the first
/// `window - 1` positions are `None`.
pub fn sma(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidWindow);
    }
    if closes.len() < window {
        return Err(IndicatorError::InsufficientData {
            indicator: Indicator::Sma { window },
            required: window,
            observations: closes.len(),
        });
    }

    let mut values = vec![None; closes.len()];
    for end in (window - 1)..closes.len() {
        let sum: f64 = closes[end + 1 - window..=end].iter().sum();
        values[end] = Some(sum / window as f64);
    }
    Ok(values)
}

/// Relative strength index with Wilder smoothing.
///
/// Gains and losses are smoothed with `alpha = 1 / window`, starting from a
/// zero change on the first session. The first value sits at index
/// `window - 1`. A zero average loss yields 100.
pub fn rsi(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    if window == 0 {
        return Err(IndicatorError::InvalidWindow);
    }
    if closes.len() < window {
        return Err(IndicatorError::InsufficientData {
            indicator: Indicator::Rsi { window },
            required: window,
            observations: closes.len(),
        });
    }

    let alpha = 1.0 / window as f64;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    let mut values = vec![None; closes.len()];

    for index in 1..closes.len() {
        let change = closes[index] - closes[index - 1];
        avg_gain = (1.0 - alpha) * avg_gain + alpha * change.max(0.0);
        avg_loss = (1.0 - alpha) * avg_loss + alpha * (-change).max(0.0);
        if index + 1 >= window {
            values[index] = Some(rsi_from_averages(avg_gain, avg_loss));
        }
    }
    if window == 1 {
        values[0] = Some(rsi_from_averages(0.0, 0.0));
    }
    Ok(values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// Where an RSI reading sits relative to the 70/30 reference lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiZone {
    Overbought,
    Neutral,
    Oversold,
}

impl RsiZone {
    pub fn classify(value: f64) -> Self {
        if value >= RSI_OVERBOUGHT {
            Self::Overbought
        } else if value <= RSI_OVERSOLD {
            Self::Oversold
        } else {
            Self::Neutral
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overbought => "overbought",
            Self::Neutral => "neutral",
            Self::Oversold => "oversold",
        }
    }
}

/// Indicator windows. Defaults are SMA 30 / SMA 100 / RSI 14.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndicatorConfig {
    sma_short: usize,
    sma_long: usize,
    rsi_window: usize,
}

impl IndicatorConfig {
    pub fn new(sma_short: usize, sma_long: usize, rsi_window: usize) -> Result<Self, ValidationError> {
        if sma_short == 0 {
            return Err(ValidationError::InvalidWindow { name: "sma_short" });
        }
        if sma_long == 0 {
            return Err(ValidationError::InvalidWindow { name: "sma_long" });
        }
        if rsi_window == 0 {
            return Err(ValidationError::InvalidWindow { name: "rsi_window" });
        }
        Ok(Self {
            sma_short,
            sma_long,
            rsi_window,
        })
    }

    pub const fn sma_short(&self) -> usize {
        self.sma_short
    }

    pub const fn sma_long(&self) -> usize {
        self.sma_long
    }

    pub const fn rsi_window(&self) -> usize {
        self.rsi_window
    }
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_short: DEFAULT_SMA_SHORT,
            sma_long: DEFAULT_SMA_LONG,
            rsi_window: DEFAULT_RSI_WINDOW,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorRow {
    pub date: TradingDate,
    pub close: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
}

/// Close, SMA short/long and RSI per date for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    pub symbol: Symbol,
    pub config: IndicatorConfig,
    pub rows: Vec<IndicatorRow>,
    pub notices: Vec<IndicatorError>,
}

impl IndicatorSeries {
    pub fn compute(
        symbol: Symbol,
        dates: &[TradingDate],
        closes: &[f64],
        config: IndicatorConfig,
    ) -> Self {
        let mut notices = Vec::new();
        let mut column = |result: Result<Vec<Option<f64>>, IndicatorError>| match result {
            Ok(values) => values,
            Err(error) => {
                debug!(%error, "indicator skipped");
                notices.push(error);
                vec![None; closes.len()]
            }
        };

        let sma_short = column(sma(closes, config.sma_short));
        let sma_long = column(sma(closes, config.sma_long));
        let rsi = column(rsi(closes, config.rsi_window));

        let rows = dates
            .iter()
            .zip(closes)
            .enumerate()
            .map(|(index, (date, close))| IndicatorRow {
                date: *date,
                close: *close,
                sma_short: sma_short[index],
                sma_long: sma_long[index],
                rsi: rsi[index],
            })
            .collect();

        Self {
            symbol,
            config,
            rows,
            notices,
        }
    }

    /// Indicators for the only column of `table`.
    ///
    /// More than one column is a usage error; zero columns is treated the same
    /// way since there is nothing to chart.
    pub fn from_table(table: &PriceTable, config: IndicatorConfig) -> Result<Self, DashboardError> {
        match table.columns() {
            [column] => Ok(Self::compute(
                column.symbol.clone(),
                table.dates(),
                &column.values,
                config,
            )),
            columns => Err(DashboardError::InvalidIndicatorInput {
                count: columns.len(),
            }),
        }
    }

    pub fn latest_rsi(&self) -> Option<f64> {
        self.rows.iter().rev().find_map(|row| row.rsi)
    }

    pub fn rsi_zone(&self) -> Option<RsiZone> {
        self.latest_rsi().map(RsiZone::classify)
    }

    pub fn is_complete(&self) -> bool {
        self.notices.is_empty()
    }
}
