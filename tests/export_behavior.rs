//! Behavior tests for CSV export of the cleaned price table.

use tickboard_core::{
    parse_csv, to_csv, write_csv_file, Dashboard, DashboardError, ExportError, PriceColumn,
    PriceTable, Selection, TradingDate, EXPORT_FILE_NAME, EXPORT_MIME,
};
use tickboard_tests::{offline_source, symbol};

fn offline_dashboard() -> Dashboard {
    Dashboard::new(offline_source("2025-01-01"))
}

#[test]
fn export_contract_matches_download_button() {
    assert_eq!(EXPORT_FILE_NAME, "selected_stocks_data.csv");
    assert_eq!(EXPORT_MIME, "text/csv");
}

#[tokio::test]
async fn when_cleaned_table_is_exported_parsing_reproduces_it() {
    // Given: a rendered dashboard for three tickers
    let selection =
        Selection::parse(&["TCS.NS", "AAPL", "GOOG"], "2023-01-01", "2024-12-31").expect("valid");
    let view = offline_dashboard()
        .render(&selection)
        .await
        .expect("renders");

    // When: the cleaned prices are exported and parsed back
    let csv = view.export_csv().expect("exports");
    let parsed = parse_csv(&csv).expect("parses");

    // Then: dates, column order and every closing value are identical
    assert!(!view.prices.is_empty());
    assert_eq!(parsed, view.prices);
    assert!(csv.starts_with("Date,TCS.NS,AAPL,GOOG\n"));
}

#[test]
fn awkward_floats_survive_round_trip() {
    let dates = vec![
        TradingDate::parse("2024-02-28").expect("valid"),
        TradingDate::parse("2024-02-29").expect("valid"),
        TradingDate::parse("2024-03-01").expect("valid"),
    ];
    let table = PriceTable::new(
        dates,
        vec![PriceColumn {
            symbol: symbol("BRK-B"),
            values: vec![0.1 + 0.2, 1e-7, 123_456_789.123_456_78],
        }],
    )
    .expect("valid table");

    let parsed = parse_csv(&to_csv(&table).expect("exports")).expect("parses");
    assert_eq!(parsed, table);
}

#[tokio::test]
async fn exported_file_lands_at_requested_path() {
    // Given: cleaned prices for one ticker
    let dashboard = offline_dashboard();
    let selection = Selection::parse(&["INFY.NS"], "2024-01-01", "2024-03-01").expect("valid");
    let fetched = dashboard.fetch_prices(&selection).await.expect("fetches");

    // When: the table is written into a temporary directory
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(EXPORT_FILE_NAME);
    write_csv_file(&fetched.table, &path).expect("writes");

    // Then: the file holds a header plus one line per row
    let written = std::fs::read_to_string(&path).expect("readable");
    assert_eq!(written.lines().count(), fetched.table.len() + 1);
    assert_eq!(parse_csv(&written).expect("parses"), fetched.table);
}

#[test]
fn writing_into_missing_directory_is_an_export_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nope").join(EXPORT_FILE_NAME);
    let table = PriceTable::empty(vec![symbol("AAPL")]);

    let err = write_csv_file(&table, &path).expect_err("must fail");
    assert!(matches!(err, ExportError::Io { .. }));

    let dashboard_error = DashboardError::from(err);
    assert_eq!(dashboard_error.code(), "dashboard.export");
}

#[test]
fn csv_with_out_of_order_dates_is_rejected() {
    let err = parse_csv("Date,AAPL\n2024-01-03,1\n2024-01-02,2\n").expect_err("must fail");
    assert!(matches!(err, ExportError::InvalidTable(_)));
}

#[test]
fn csv_with_missing_cell_is_rejected() {
    let err = parse_csv("Date,AAPL,GOOG\n2024-01-02,1,\n").expect_err("must fail");
    assert!(matches!(err, ExportError::InvalidValue { line: 2, .. }));
}
