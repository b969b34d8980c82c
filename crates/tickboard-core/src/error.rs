use thiserror::Error;

/// Validation and contract errors exposed by `tickboard-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("table column '{symbol}' has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        symbol: String,
        expected: usize,
        actual: usize,
    },
    #[error("table dates must be strictly increasing (at index {index})")]
    DatesNotIncreasing { index: usize },
    #[error("duplicate column for symbol '{symbol}'")]
    DuplicateColumn { symbol: String },
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("indicator window '{name}' must be greater than zero")]
    InvalidWindow { name: &'static str },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("source_chain must contain at least one source")]
    EmptySourceChain,
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,

    #[error("invalid source '{value}', expected one of yahoo, synthetic")]
    InvalidSource { value: String },
}

/// How a dashboard outcome should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Pipeline errors surfaced to the presentation layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    #[error("failed to fetch data: {message}")]
    FetchFailure { message: String },

    #[error("please select at least one stock")]
    EmptySelection,

    #[error("select only one stock to view SMA & RSI ({count} selected)")]
    InvalidIndicatorInput { count: usize },

    #[error("series for '{symbol}' starts at a zero or missing price and cannot be normalized")]
    DegenerateSeries { symbol: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Export(#[from] crate::export::ExportError),
}

impl DashboardError {
    pub fn fetch_failure(message: impl Into<String>) -> Self {
        Self::FetchFailure {
            message: message.into(),
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::FetchFailure { .. } => "dashboard.fetch_failure",
            Self::EmptySelection => "dashboard.empty_selection",
            Self::InvalidIndicatorInput { .. } => "dashboard.invalid_indicator_input",
            Self::DegenerateSeries { .. } => "dashboard.degenerate_series",
            Self::Validation(_) => "dashboard.validation",
            Self::Export(_) => "dashboard.export",
        }
    }

    pub const fn severity(&self) -> Severity {
        match self {
            Self::EmptySelection => Severity::Warning,
            Self::InvalidIndicatorInput { .. } => Severity::Info,
            _ => Severity::Error,
        }
    }
}

impl From<crate::data_source::SourceError> for DashboardError {
    fn from(error: crate::data_source::SourceError) -> Self {
        Self::fetch_failure(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::SourceError;

    #[test]
    fn source_errors_become_fetch_failures() {
        let err = DashboardError::from(SourceError::unavailable("connection reset"));
        assert_eq!(err.code(), "dashboard.fetch_failure");
        assert_eq!(err.severity(), Severity::Error);
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn selection_problems_are_not_errors() {
        assert_eq!(DashboardError::EmptySelection.severity(), Severity::Warning);
        assert_eq!(
            DashboardError::InvalidIndicatorInput { count: 2 }.severity(),
            Severity::Info
        );
    }
}
