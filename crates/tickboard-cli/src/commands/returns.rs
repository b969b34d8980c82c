use std::time::Instant;

use serde::Serialize;
use tickboard_core::{Dashboard, NormalizedSeries, Selection};

use crate::error::CliError;
use crate::output;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ReturnsResponseData<'a> {
    normalized: &'a NormalizedSeries,
}

pub async fn run(selection: &Selection, dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let normalized = match dashboard.returns(selection).await {
        Ok(normalized) => normalized,
        Err(error) => return Ok(CommandResult::failed(&error, dashboard.source_id())),
    };

    let data = serde_json::to_value(ReturnsResponseData {
        normalized: &normalized,
    })?;
    Ok(CommandResult::ok(data, vec![dashboard.source_id()])
        .with_text(output::price_table_lines(
            "Normalized returns (start = 100)",
            normalized.as_table(),
        ))
        .with_latency(started.elapsed().as_millis() as u64))
}
