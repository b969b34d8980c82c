use tickboard_core::{Dashboard, Selection};

use crate::error::CliError;
use crate::output;

use super::CommandResult;

pub async fn run(selection: &Selection, dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    let view = match dashboard.render(selection).await {
        Ok(view) => view,
        Err(error) => return Ok(CommandResult::failed(&error, dashboard.source_id())),
    };

    let mut text = output::company_lines(&view.companies);
    text.push(String::new());
    text.extend(output::price_table_lines(
        &format!("Raw data (last {} rows)", view.preview.len()),
        &view.preview,
    ));
    text.push(String::new());
    text.extend(output::price_table_lines(
        "Normalized returns (last rows)",
        &view.normalized.as_table().tail(view.preview.len()),
    ));
    text.push(String::new());
    text.extend(output::sector_lines(&view.sector_table));
    if let Some(series) = &view.indicators {
        text.push(String::new());
        text.extend(output::indicator_lines(series, view.preview.len()));
    }

    Ok(CommandResult::ok(serde_json::to_value(&view)?, vec![view.source])
        .with_text(text)
        .with_warnings(view.warnings())
        .with_latency(view.latency_ms))
}
