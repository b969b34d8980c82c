use serde::Serialize;
use tickboard_core::{CompanyMeta, Dashboard};

use crate::error::CliError;
use crate::output;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CompaniesResponseData<'a> {
    companies: &'a [CompanyMeta],
}

pub fn run(dashboard: &Dashboard) -> Result<CommandResult, CliError> {
    let companies = dashboard.companies().entries();
    let data = serde_json::to_value(CompaniesResponseData { companies })?;
    Ok(CommandResult::ok(data, vec![dashboard.source_id()])
        .with_text(output::company_lines(companies)))
}
