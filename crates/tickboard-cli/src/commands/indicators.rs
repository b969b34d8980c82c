use std::time::Instant;

use tickboard_core::{Dashboard, Selection};

use crate::error::CliError;
use crate::output;

use super::CommandResult;

pub async fn run(selection: &Selection, dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    let started = Instant::now();
    let series = match dashboard.indicators(selection).await {
        Ok(series) => series,
        Err(error) => return Ok(CommandResult::failed(&error, dashboard.source_id())),
    };

    let warnings = series.notices.iter().map(ToString::to_string).collect();
    let text = output::indicator_lines(&series, dashboard.config().preview_rows);
    Ok(CommandResult::ok(serde_json::to_value(&series)?, vec![dashboard.source_id()])
        .with_text(text)
        .with_warnings(warnings)
        .with_latency(started.elapsed().as_millis() as u64))
}
