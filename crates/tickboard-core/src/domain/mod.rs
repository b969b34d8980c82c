//! # Domain Models
//!
//! Canonical types flowing through the dashboard pipeline.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker |
//! | [`TradingDate`] | Session date (`YYYY-MM-DD`) |
//! | [`DateRange`] | Requested history window |
//! | [`RawPriceFrame`] | Provider table keyed by date, field and symbol |
//! | [`PriceTable`] | Cleaned closing prices, complete rows only |
//! | [`NormalizedSeries`] | Closing prices rescaled to start at 100 |
//!
//! Tables validate their invariants at construction time:
//!
//! ```rust,ignore
//! use tickboard_core::{PriceColumn, PriceTable, Symbol, TradingDate, ValidationError};
//!
//! let dates = vec![TradingDate::parse("2024-01-03")?, TradingDate::parse("2024-01-02")?];
//! let column = PriceColumn { symbol: Symbol::parse("AAPL")?, values: vec![1.0, 2.0] };
//! let err = PriceTable::new(dates, vec![column]).unwrap_err();
//! assert!(matches!(err, ValidationError::DatesNotIncreasing { .. }));
//! ```

mod date;
mod models;
mod symbol;

pub use date::{DateRange, TradingDate};
pub use models::{
    NormalizedSeries, PriceColumn, PriceField, PriceTable, RawColumn, RawPriceFrame,
    SymbolHistory,
};
pub use symbol::Symbol;
