//! Close extraction and complete-row filtering.

use std::collections::HashSet;

use tracing::debug;

use crate::{DashboardError, PriceColumn, PriceField, PriceTable, RawPriceFrame, Symbol};

/// Reduce a provider frame to the closing prices of `symbols`, keeping only
/// dates on which every symbol has a finite close.
///
/// A frame with no close column at all, or missing the close column of a
/// selected symbol, is a fetch failure. Zero complete rows is not: the result
/// is an empty table with one column per symbol.
pub fn clean(frame: &RawPriceFrame, symbols: &[Symbol]) -> Result<PriceTable, DashboardError> {
    if !frame.has_field(PriceField::Close) {
        return Err(DashboardError::fetch_failure(
            "no 'Close' prices found for selected stocks",
        ));
    }

    let closes = symbols
        .iter()
        .map(|symbol| {
            frame
                .column(PriceField::Close, symbol)
                .map(|column| column.values.as_slice())
                .ok_or_else(|| {
                    DashboardError::fetch_failure(format!(
                        "no 'Close' prices found for '{symbol}'"
                    ))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Providers may hand back unsorted or repeated sessions; order by date and
    // keep the first occurrence.
    let mut order = (0..frame.dates.len()).collect::<Vec<_>>();
    order.sort_by_key(|&index| (frame.dates[index], index));
    let mut seen = HashSet::new();
    order.retain(|&index| seen.insert(frame.dates[index]));

    let complete = order
        .into_iter()
        .filter(|&index| {
            closes.iter().all(|values| {
                values
                    .get(index)
                    .copied()
                    .flatten()
                    .is_some_and(f64::is_finite)
            })
        })
        .collect::<Vec<_>>();

    let dates = complete.iter().map(|&index| frame.dates[index]).collect();
    let columns = symbols
        .iter()
        .zip(&closes)
        .map(|(symbol, values)| PriceColumn {
            symbol: symbol.clone(),
            values: complete
                .iter()
                .filter_map(|&index| values[index])
                .collect(),
        })
        .collect();

    let table = PriceTable::new(dates, columns)?;
    debug!(
        raw_rows = frame.len(),
        complete_rows = table.len(),
        "cleaned price frame"
    );
    Ok(table)
}
