//! q5: cumulative search average against one ticker's adjusted close.

use std::path::PathBuf;

use crate::config::Settings;
use crate::error::ReportResult;
use crate::models::RecordSet;
use crate::render::lines::{self, Axis, DatedSeries};
use crate::render::Titles;
use crate::transform::{filter_equals, ColumnOp, Normalizer, Orderer, Shaping, UnmatchedPolicy};

use super::{dated_points, ReportId, ReportOutcome};

pub const TICKER: &str = "TICKER";
pub const DATE: &str = "DATE_KEY";
pub const SEARCH_AVG: &str = "CUMULATIVE_SEARCH_AVG";
pub const CLOSE: &str = "ADJ_CLOSE_PRICE";

/// `q5_correlation_results_<TICKER>.csv`
pub fn input_name(ticker: &str) -> String {
    format!("q5_correlation_results_{}.csv", ticker)
}

/// `q5_correlation_chart_<TICKER>.png`
pub fn chart_name(ticker: &str) -> String {
    format!("q5_correlation_chart_{}.png", ticker)
}

pub fn shaping() -> Shaping {
    Shaping::new(
        Normalizer::new()
            .step(TICKER, ColumnOp::Trim)
            .step(DATE, ColumnOp::ToDate)
            .step(SEARCH_AVG, ColumnOp::ToNumber)
            .step(CLOSE, ColumnOp::ToNumber),
    )
}

/// Rows of `ticker` in date order.
pub fn shape_set(set: &RecordSet, ticker: &str, policy: UnmatchedPolicy) -> ReportResult<RecordSet> {
    let selected = filter_equals(set, TICKER, ticker)?;
    let ordered = Orderer::new(policy).ascending(DATE).order(selected)?;
    Ok(ordered)
}

pub fn shape(settings: &Settings) -> ReportResult<RecordSet> {
    let set = shaping().load(settings.input(&input_name(&settings.ticker)))?;
    shape_set(&set, &settings.ticker, settings.unmatched)
}

pub fn run(settings: &Settings) -> ReportResult<ReportOutcome> {
    let ticker = settings.ticker.as_str();
    let rows = shape(settings)?;
    let series = vec![
        DatedSeries::new(
            format!("AOL Cumulative Search Avg ({})", ticker),
            Axis::Left,
            dated_points(&rows, DATE, SEARCH_AVG)?,
        ),
        DatedSeries::new(
            format!("{} Adj. Close Price (USD)", ticker),
            Axis::Right,
            dated_points(&rows, DATE, CLOSE)?,
        ),
    ];

    let path: PathBuf = settings
        .report_dir(ReportId::StockCorrelation.subdir())
        .join(chart_name(ticker));
    lines::dual_axis(
        &path,
        &Titles::new(
            format!(
                "Q5 Synthesis: AOL User Interest (Internal Signal) vs. {} Stock Trend",
                ticker
            ),
            "Date (March 1 - May 31, 2006)",
            "Cumulative Daily Digital Searches (Avg)",
        ),
        &format!("{} Adjusted Close Price (USD)", ticker),
        &series,
        &[],
        &settings.style,
    )?;

    Ok(ReportOutcome {
        report: ReportId::StockCorrelation,
        artifacts: vec![path],
        rows: rows.len(),
        discarded: 0,
    })
}
