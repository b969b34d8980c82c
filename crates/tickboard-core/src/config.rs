use crate::IndicatorConfig;

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Runtime knobs for [`crate::Dashboard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Upper bound for the single history fetch.
    pub timeout_ms: u64,
    /// Request split/dividend adjusted closes.
    pub adjusted: bool,
    pub indicators: IndicatorConfig,
    /// Trailing rows kept in the price preview.
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            adjusted: true,
            indicators: IndicatorConfig::default(),
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl DashboardConfig {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_adjusted(mut self, adjusted: bool) -> Self {
        self.adjusted = adjusted;
        self
    }

    pub fn with_indicators(mut self, indicators: IndicatorConfig) -> Self {
        self.indicators = indicators;
        self
    }

    pub fn with_preview_rows(mut self, preview_rows: usize) -> Self {
        self.preview_rows = preview_rows;
        self
    }
}
