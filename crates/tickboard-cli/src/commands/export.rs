use std::path::Path;

use serde::Serialize;
use tickboard_core::{
    write_csv_file, Dashboard, DashboardError, Selection, EXPORT_FILE_NAME, EXPORT_MIME,
};
use tracing::info;

use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct ExportResponseData {
    output: String,
    file_name: &'static str,
    mime: &'static str,
    rows_exported: usize,
    columns: usize,
}

pub async fn run(
    selection: &Selection,
    output: &Path,
    dashboard: &Dashboard,
) -> Result<CommandResult, CliError> {
    let fetched = match dashboard.fetch_prices(selection).await {
        Ok(fetched) => fetched,
        Err(error) => return Ok(CommandResult::failed(&error, dashboard.source_id())),
    };

    if let Err(error) = write_csv_file(&fetched.table, output) {
        let error = DashboardError::from(error);
        return Ok(CommandResult::failed(&error, fetched.source));
    }
    info!(path = %output.display(), rows = fetched.table.len(), "exported csv");

    let data = ExportResponseData {
        output: output.display().to_string(),
        file_name: EXPORT_FILE_NAME,
        mime: EXPORT_MIME,
        rows_exported: fetched.table.len(),
        columns: fetched.table.columns().len(),
    };
    let text = vec![format!(
        "exported {} rows x {} columns to {} ({EXPORT_MIME})",
        data.rows_exported, data.columns, data.output
    )];

    Ok(CommandResult::ok(serde_json::to_value(&data)?, vec![fetched.source])
        .with_text(text)
        .with_latency(fetched.latency_ms))
}
