mod companies;
mod dashboard;
mod export;
mod indicators;
mod prices;
mod returns;

use std::sync::Arc;

use serde_json::Value;
use tickboard_core::{
    CompanyDirectory, Dashboard, DashboardConfig, DashboardError, Envelope, EnvelopeError,
    IndicatorConfig, PriceSource, ProviderId, Selection, Severity, SyntheticSource, YahooAdapter,
};
use tracing::debug;

use crate::cli::{Cli, Command, SelectionArgs, WindowArgs};
use crate::error::CliError;
use crate::metadata::Metadata;
use crate::output::Rendered;

pub struct CommandResult {
    pub data: Value,
    pub text: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
    pub latency_ms: u64,
    pub source_chain: Vec<ProviderId>,
}

impl CommandResult {
    pub fn ok(data: Value, source_chain: Vec<ProviderId>) -> Self {
        Self {
            data,
            text: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
            latency_ms: 0,
            source_chain,
        }
    }

    /// Dashboard outcome that stopped the command. Errors go to the envelope's
    /// `errors`; warnings and informational notices go to `meta.warnings`.
    pub fn failed(error: &DashboardError, source: ProviderId) -> Self {
        let mut result = Self::ok(Value::Null, vec![source]);
        match error.severity() {
            Severity::Error => result.errors.push(EnvelopeError::from(error)),
            Severity::Warning | Severity::Info => result.warnings.push(error.to_string()),
        }
        result
    }

    pub fn with_text(mut self, lines: Vec<String>) -> Self {
        self.text.extend(lines);
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Rendered, CliError> {
    let command_result = match &cli.command {
        Command::Dashboard(args) => {
            let dashboard = build_dashboard(cli, Some(&args.windows))?;
            dashboard::run(&parse_selection(&args.selection)?, &dashboard).await?
        }
        Command::Prices(args) => {
            let dashboard = build_dashboard(cli, None)?;
            prices::run(&parse_selection(args)?, &dashboard).await?
        }
        Command::Returns(args) => {
            let dashboard = build_dashboard(cli, None)?;
            returns::run(&parse_selection(args)?, &dashboard).await?
        }
        Command::Indicators(args) => {
            let dashboard = build_dashboard(cli, Some(&args.windows))?;
            indicators::run(&parse_selection(&args.selection)?, &dashboard).await?
        }
        Command::Export(args) => {
            let dashboard = build_dashboard(cli, None)?;
            export::run(&parse_selection(&args.selection)?, &args.output, &dashboard).await?
        }
        Command::Companies => companies::run(&build_dashboard(cli, None)?)?,
    };

    let CommandResult {
        data,
        text,
        warnings,
        errors,
        latency_ms,
        source_chain,
    } = command_result;

    let mut metadata = Metadata::new(source_chain, latency_ms)?;
    for warning in warnings {
        metadata.push_warning(warning);
    }
    let meta = metadata.into_envelope_meta()?;

    let envelope = Envelope::with_errors(meta, data, errors)?;
    Ok(Rendered { envelope, text })
}

fn parse_selection(args: &SelectionArgs) -> Result<Selection, CliError> {
    Ok(Selection::parse(&args.symbols, &args.start, &args.end)?)
}

fn build_dashboard(cli: &Cli, windows: Option<&WindowArgs>) -> Result<Dashboard, CliError> {
    let source: Arc<dyn PriceSource> = if cli.offline {
        Arc::new(SyntheticSource::default())
    } else {
        Arc::new(YahooAdapter::default().with_timeout_ms(cli.timeout_ms))
    };

    let indicators = match windows {
        Some(windows) => {
            IndicatorConfig::new(windows.sma_short, windows.sma_long, windows.rsi_window)?
        }
        None => IndicatorConfig::default(),
    };
    let config = DashboardConfig::default()
        .with_timeout_ms(cli.timeout_ms)
        .with_adjusted(!cli.unadjusted)
        .with_indicators(indicators)
        .with_preview_rows(cli.rows);
    debug!(source = %source.id(), ?config, "dashboard configured");

    let mut dashboard = Dashboard::new(source).with_config(config);
    if let Some(path) = &cli.companies_file {
        dashboard = dashboard.with_companies(CompanyDirectory::from_path(path)?);
    }
    Ok(dashboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_failures_become_envelope_errors() {
        let error = DashboardError::fetch_failure("connection refused");
        let result = CommandResult::failed(&error, ProviderId::Yahoo);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].code, "dashboard.fetch_failure");
        assert!(result.warnings.is_empty());
        assert!(result.data.is_null());
    }

    #[test]
    fn empty_selection_is_a_warning() {
        let result = CommandResult::failed(&DashboardError::EmptySelection, ProviderId::Yahoo);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings, vec![String::from("please select at least one stock")]);
    }
}
