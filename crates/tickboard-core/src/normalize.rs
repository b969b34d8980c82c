use crate::{DashboardError, NormalizedSeries, PriceColumn, PriceTable};

/// Rescale every column so that its first value is exactly 100.
///
/// An empty table normalizes to an empty series. A column whose first price is
/// zero or not finite is rejected as degenerate.
pub fn normalize(table: &PriceTable) -> Result<NormalizedSeries, DashboardError> {
    if table.is_empty() {
        return Ok(NormalizedSeries::from_table(table.clone()));
    }

    let columns = table
        .columns()
        .iter()
        .map(|column| {
            let base = column.values[0];
            if base == 0.0 || !base.is_finite() {
                return Err(DashboardError::DegenerateSeries {
                    symbol: column.symbol.to_string(),
                });
            }
            let mut values: Vec<f64> =
                column.values.iter().map(|price| 100.0 * price / base).collect();
            // Pin the anchor; 100 * p / p can land one ulp off.
            values[0] = 100.0;
            Ok(PriceColumn {
                symbol: column.symbol.clone(),
                values,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let normalized = PriceTable::new(table.dates().to_vec(), columns)?;
    Ok(NormalizedSeries::from_table(normalized))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Symbol, TradingDate};

    fn table(columns: &[(&str, Vec<f64>)]) -> PriceTable {
        let len = columns.first().map_or(0, |(_, values)| values.len());
        let start = TradingDate::parse("2024-01-01").expect("valid");
        let dates = (0..len)
            .map(|offset| start.add_days(offset as i64).expect("in range"))
            .collect();
        let columns = columns
            .iter()
            .map(|(name, values)| PriceColumn {
                symbol: Symbol::parse(name).expect("valid"),
                values: values.clone(),
            })
            .collect();
        PriceTable::new(dates, columns).expect("valid table")
    }

    #[test]
    fn first_row_is_exactly_one_hundred() {
        let input = table(&[("AAPL", vec![123.456, 130.0]), ("GOOG", vec![0.3, 0.1])]);
        let normalized = normalize(&input).expect("normalizes");
        for column in normalized.columns() {
            assert_eq!(column.values[0], 100.0);
        }
    }

    #[test]
    fn scales_relative_to_first_price() {
        let input = table(&[("AAPL", vec![50.0, 75.0, 25.0])]);
        let normalized = normalize(&input).expect("normalizes");
        assert_eq!(normalized.columns()[0].values, vec![100.0, 150.0, 50.0]);
    }

    #[test]
    fn zero_first_price_is_degenerate() {
        let input = table(&[("AAPL", vec![10.0, 11.0]), ("PENNY", vec![0.0, 1.0])]);
        let err = normalize(&input).expect_err("must fail");
        assert_eq!(
            err,
            DashboardError::DegenerateSeries {
                symbol: String::from("PENNY")
            }
        );
    }

    #[test]
    fn empty_table_normalizes_to_empty_series() {
        let input = PriceTable::empty(vec![Symbol::parse("AAPL").expect("valid")]);
        let normalized = normalize(&input).expect("normalizes");
        assert!(normalized.is_empty());
        assert_eq!(normalized.columns().len(), 1);
    }
}
