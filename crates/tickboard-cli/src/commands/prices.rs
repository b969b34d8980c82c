use serde::Serialize;
use tickboard_core::{Dashboard, PriceTable, Selection};

use crate::error::CliError;
use crate::output;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct PricesResponseData<'a> {
    prices: &'a PriceTable,
}

pub async fn run(selection: &Selection, dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    let fetched = match dashboard.fetch_prices(selection).await {
        Ok(fetched) => fetched,
        Err(error) => return Ok(CommandResult::failed(&error, dashboard.source_id())),
    };

    let data = serde_json::to_value(PricesResponseData {
        prices: &fetched.table,
    })?;
    Ok(CommandResult::ok(data, vec![fetched.source])
        .with_text(output::price_table_lines("Closing prices", &fetched.table))
        .with_latency(fetched.latency_ms))
}
