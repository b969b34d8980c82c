use serde_json::Value;
use tickboard_core::{CompanyMeta, Envelope, IndicatorSeries, PriceTable, SectorRow};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Command output: the JSON envelope plus its table-format rendering.
#[derive(Debug)]
pub struct Rendered {
    pub envelope: Envelope<Value>,
    pub text: Vec<String>,
}

pub fn render(rendered: &Rendered, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(&rendered.envelope)?
            } else {
                serde_json::to_string(&rendered.envelope)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(rendered),
    }

    Ok(())
}

fn render_table(rendered: &Rendered) {
    let meta = &rendered.envelope.meta;
    println!("request_id  : {}", meta.request_id);
    println!(
        "sources     : {}",
        meta.source_chain
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(",")
    );
    println!("latency_ms  : {}", meta.latency_ms);
    println!();

    for line in &rendered.text {
        println!("{line}");
    }

    if !meta.warnings.is_empty() {
        println!();
        println!("warnings:");
        for warning in &meta.warnings {
            println!("  - {warning}");
        }
    }

    if !rendered.envelope.errors.is_empty() {
        println!();
        println!("errors:");
        for error in &rendered.envelope.errors {
            println!("  - {}: {}", error.code, error.message);
        }
    }
}

/// Date column followed by one right-aligned column per symbol.
pub fn price_table_lines(title: &str, table: &PriceTable) -> Vec<String> {
    let mut lines = vec![format!("== {title} ==")];
    if table.is_empty() {
        lines.push(String::from("(no complete rows in range)"));
        return lines;
    }

    let widths = table
        .symbols()
        .map(|symbol| symbol.as_str().len().max(10))
        .collect::<Vec<_>>();

    let mut header = format!("{:<10}", "Date");
    for (symbol, width) in table.symbols().zip(widths.iter().copied()) {
        header.push_str(&format!("  {:>width$}", symbol.as_str()));
    }
    lines.push(header);

    for (date, values) in table.rows() {
        let mut line = format!("{:<10}", date.format());
        for (value, width) in values.iter().zip(widths.iter().copied()) {
            line.push_str(&format!("  {value:>width$.2}"));
        }
        lines.push(line);
    }
    lines
}

/// Last `limit` indicator rows; undefined values print as `-`.
pub fn indicator_lines(series: &IndicatorSeries, limit: usize) -> Vec<String> {
    let config = series.config;
    let mut lines = vec![
        format!("== {} indicators ==", series.symbol),
        format!(
            "{:<10}  {:>10}  {:>10}  {:>10}  {:>8}",
            "Date",
            "Close",
            format!("SMA({})", config.sma_short()),
            format!("SMA({})", config.sma_long()),
            format!("RSI({})", config.rsi_window()),
        ),
    ];

    let start = series.rows.len().saturating_sub(limit);
    for row in &series.rows[start..] {
        lines.push(format!(
            "{:<10}  {:>10.2}  {:>10}  {:>10}  {:>8}",
            row.date.format(),
            row.close,
            optional(row.sma_short, 2),
            optional(row.sma_long, 2),
            optional(row.rsi, 1),
        ));
    }

    if let Some(zone) = series.rsi_zone() {
        lines.push(format!("latest RSI zone: {}", zone.as_str()));
    }
    lines
}

pub fn company_lines(companies: &[CompanyMeta]) -> Vec<String> {
    let mut lines = vec![String::from("== Companies ==")];
    for company in companies {
        lines.push(format!(
            "{:<12}  {:<28}  {:<24}  {}",
            company.symbol.as_str(),
            company.name,
            company.sector,
            company.logo_url
        ));
    }
    lines
}

pub fn sector_lines(rows: &[SectorRow]) -> Vec<String> {
    let mut lines = vec![
        String::from("== Sectors =="),
        format!("{:<12}  {:<28}  {}", "Ticker", "Name", "Sector"),
    ];
    for row in rows {
        lines.push(format!(
            "{:<12}  {:<28}  {}",
            row.ticker.as_str(),
            row.name,
            row.sector
        ));
    }
    lines
}

fn optional(value: Option<f64>, decimals: usize) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("{v:.decimals$}"))
}
