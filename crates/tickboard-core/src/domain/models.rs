use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate, ValidationError};

/// Field of a provider price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl PriceField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::AdjClose => "adj_close",
            Self::Volume => "volume",
        }
    }
}

impl Display for PriceField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One symbol's history as delivered by a provider, before alignment.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolHistory {
    pub symbol: Symbol,
    pub dates: Vec<TradingDate>,
    pub fields: Vec<(PriceField, Vec<Option<f64>>)>,
}

impl SymbolHistory {
    pub fn new(symbol: Symbol, dates: Vec<TradingDate>) -> Self {
        Self {
            symbol,
            dates,
            fields: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: PriceField, values: Vec<Option<f64>>) -> Self {
        self.fields.push((field, values));
        self
    }
}

/// Column of a raw frame keyed by field and symbol. Missing cells are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub field: PriceField,
    pub symbol: Symbol,
    pub values: Vec<Option<f64>>,
}

/// Provider response: a date-indexed table with one column per (field, symbol).
///
/// Dates are the union of every symbol's sessions, so a symbol that did not
/// trade on a date (holiday, not yet listed) holds `None` there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPriceFrame {
    pub dates: Vec<TradingDate>,
    pub columns: Vec<RawColumn>,
}

impl RawPriceFrame {
    pub fn new(dates: Vec<TradingDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    pub fn push_column(
        &mut self,
        field: PriceField,
        symbol: Symbol,
        values: Vec<Option<f64>>,
    ) -> Result<(), ValidationError> {
        if values.len() != self.dates.len() {
            return Err(ValidationError::ColumnLengthMismatch {
                symbol: symbol.to_string(),
                expected: self.dates.len(),
                actual: values.len(),
            });
        }
        self.columns.push(RawColumn {
            field,
            symbol,
            values,
        });
        Ok(())
    }

    /// Align per-symbol histories on the union of their dates.
    pub fn from_histories(histories: Vec<SymbolHistory>) -> Result<Self, ValidationError> {
        let dates = histories
            .iter()
            .flat_map(|history| history.dates.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect::<Vec<_>>();
        let positions = dates
            .iter()
            .enumerate()
            .map(|(index, date)| (*date, index))
            .collect::<BTreeMap<_, _>>();

        let mut frame = Self::new(dates);
        for history in histories {
            for (field, values) in history.fields {
                if values.len() != history.dates.len() {
                    return Err(ValidationError::ColumnLengthMismatch {
                        symbol: history.symbol.to_string(),
                        expected: history.dates.len(),
                        actual: values.len(),
                    });
                }

                let mut aligned = vec![None; frame.dates.len()];
                let mut seen = HashSet::new();
                for (date, value) in history.dates.iter().zip(values) {
                    // First occurrence of a duplicated session wins.
                    if !seen.insert(*date) {
                        continue;
                    }
                    if let Some(&index) = positions.get(date) {
                        aligned[index] = value;
                    }
                }
                frame.push_column(field, history.symbol.clone(), aligned)?;
            }
        }
        Ok(frame)
    }

    pub fn column(&self, field: PriceField, symbol: &Symbol) -> Option<&RawColumn> {
        self.columns
            .iter()
            .find(|column| column.field == field && &column.symbol == symbol)
    }

    pub fn has_field(&self, field: PriceField) -> bool {
        self.columns.iter().any(|column| column.field == field)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Closing prices of one symbol aligned on the owning table's dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceColumn {
    pub symbol: Symbol,
    pub values: Vec<f64>,
}

/// Cleaned closing prices: one column per selected symbol on shared dates.
///
/// Dates are strictly increasing and every column is complete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceTable {
    dates: Vec<TradingDate>,
    columns: Vec<PriceColumn>,
}

impl PriceTable {
    pub fn new(dates: Vec<TradingDate>, columns: Vec<PriceColumn>) -> Result<Self, ValidationError> {
        if let Some(index) = dates.windows(2).position(|pair| pair[0] >= pair[1]) {
            return Err(ValidationError::DatesNotIncreasing { index: index + 1 });
        }

        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(&column.symbol) {
                return Err(ValidationError::DuplicateColumn {
                    symbol: column.symbol.to_string(),
                });
            }
            if column.values.len() != dates.len() {
                return Err(ValidationError::ColumnLengthMismatch {
                    symbol: column.symbol.to_string(),
                    expected: dates.len(),
                    actual: column.values.len(),
                });
            }
            if column.values.iter().any(|value| !value.is_finite()) {
                return Err(ValidationError::NonFiniteValue { field: "close" });
            }
        }

        Ok(Self { dates, columns })
    }

    /// Table with the given columns and no rows.
    pub fn empty(symbols: Vec<Symbol>) -> Self {
        Self {
            dates: Vec::new(),
            columns: symbols
                .into_iter()
                .map(|symbol| PriceColumn {
                    symbol,
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    pub fn dates(&self) -> &[TradingDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[PriceColumn] {
        &self.columns
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.columns.iter().map(|column| &column.symbol)
    }

    pub fn column(&self, symbol: &Symbol) -> Option<&PriceColumn> {
        self.columns.iter().find(|column| &column.symbol == symbol)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Row-major view: each date with one value per column, in column order.
    pub fn rows(&self) -> impl Iterator<Item = (TradingDate, Vec<f64>)> + '_ {
        self.dates.iter().enumerate().map(|(index, date)| {
            let values = self
                .columns
                .iter()
                .map(|column| column.values[index])
                .collect();
            (*date, values)
        })
    }

    /// Last `count` rows, used for the raw data preview.
    pub fn tail(&self, count: usize) -> Self {
        let start = self.dates.len().saturating_sub(count);
        Self {
            dates: self.dates[start..].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|column| PriceColumn {
                    symbol: column.symbol.clone(),
                    values: column.values[start..].to_vec(),
                })
                .collect(),
        }
    }
}

/// Price table rescaled so that every column starts at 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedSeries(PriceTable);

impl NormalizedSeries {
    pub(crate) fn from_table(table: PriceTable) -> Self {
        Self(table)
    }

    pub fn dates(&self) -> &[TradingDate] {
        self.0.dates()
    }

    pub fn columns(&self) -> &[PriceColumn] {
        self.0.columns()
    }

    pub fn column(&self, symbol: &Symbol) -> Option<&PriceColumn> {
        self.0.column(symbol)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_table(&self) -> &PriceTable {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(value: &str) -> TradingDate {
        TradingDate::parse(value).expect("valid date")
    }

    fn symbol(value: &str) -> Symbol {
        Symbol::parse(value).expect("valid symbol")
    }

    #[test]
    fn rejects_unsorted_dates() {
        let err = PriceTable::new(
            vec![date("2024-01-03"), date("2024-01-02")],
            vec![PriceColumn {
                symbol: symbol("AAPL"),
                values: vec![1.0, 2.0],
            }],
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::DatesNotIncreasing { index: 1 }));
    }

    #[test]
    fn rejects_short_column() {
        let err = PriceTable::new(
            vec![date("2024-01-02"), date("2024-01-03")],
            vec![PriceColumn {
                symbol: symbol("AAPL"),
                values: vec![1.0],
            }],
        )
        .expect_err("must fail");
        assert!(matches!(err, ValidationError::ColumnLengthMismatch { .. }));
    }

    #[test]
    fn tail_keeps_latest_rows() {
        let table = PriceTable::new(
            vec![date("2024-01-02"), date("2024-01-03"), date("2024-01-04")],
            vec![PriceColumn {
                symbol: symbol("AAPL"),
                values: vec![1.0, 2.0, 3.0],
            }],
        )
        .expect("valid table");

        let tail = table.tail(2);
        assert_eq!(tail.dates(), &[date("2024-01-03"), date("2024-01-04")]);
        assert_eq!(tail.columns()[0].values, vec![2.0, 3.0]);
        assert_eq!(table.tail(10).len(), 3);
    }

    #[test]
    fn histories_align_on_date_union() {
        let aapl = SymbolHistory::new(symbol("AAPL"), vec![date("2024-01-02"), date("2024-01-03")])
            .with_field(PriceField::Close, vec![Some(10.0), Some(11.0)]);
        let tcs = SymbolHistory::new(symbol("TCS.NS"), vec![date("2024-01-03"), date("2024-01-04")])
            .with_field(PriceField::Close, vec![Some(20.0), Some(21.0)]);

        let frame = RawPriceFrame::from_histories(vec![aapl, tcs]).expect("aligns");
        assert_eq!(frame.len(), 3);

        let aapl_close = frame
            .column(PriceField::Close, &symbol("AAPL"))
            .expect("column present");
        assert_eq!(aapl_close.values, vec![Some(10.0), Some(11.0), None]);

        let tcs_close = frame
            .column(PriceField::Close, &symbol("TCS.NS"))
            .expect("column present");
        assert_eq!(tcs_close.values, vec![None, Some(20.0), Some(21.0)]);
    }
}
