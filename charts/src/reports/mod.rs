//! The five chart reports.
//!
//! Every report follows the same shape: load and shape all of its inputs
//! first, then draw. A missing or malformed input therefore fails the
//! report before any file is written.
//!
//! | id | module | output directory |
//! |----|--------|------------------|
//! | q1 | [`search_volume`] | `question1` |
//! | q2 | [`category_ctr`] | `question2` |
//! | q3 | [`top_domains`] | `question3` |
//! | q4 | [`event_response`] | `question4` |
//! | q5 | [`stock_correlation`] | `question5` |

pub mod category_ctr;
pub mod event_response;
pub mod search_volume;
pub mod stock_correlation;
pub mod top_domains;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::Settings;
use crate::error::{ReportError, ReportResult, ShapeResult};
use crate::logs::{log_info, log_success};
use crate::models::RecordSet;
use crate::render::bars::CategorySeries;

/// Report identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReportId {
    SearchVolume,
    CategoryCtr,
    TopDomains,
    EventResponse,
    StockCorrelation,
}

impl ReportId {
    pub const ALL: [ReportId; 5] = [
        ReportId::SearchVolume,
        ReportId::CategoryCtr,
        ReportId::TopDomains,
        ReportId::EventResponse,
        ReportId::StockCorrelation,
    ];

    /// Short id (`q1` .. `q5`)
    pub fn code(&self) -> &'static str {
        match self {
            ReportId::SearchVolume => "q1",
            ReportId::CategoryCtr => "q2",
            ReportId::TopDomains => "q3",
            ReportId::EventResponse => "q4",
            ReportId::StockCorrelation => "q5",
        }
    }

    /// Output subdirectory under the output root
    pub fn subdir(&self) -> &'static str {
        match self {
            ReportId::SearchVolume => "question1",
            ReportId::CategoryCtr => "question2",
            ReportId::TopDomains => "question3",
            ReportId::EventResponse => "question4",
            ReportId::StockCorrelation => "question5",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportId::SearchVolume => "Monthly and weekly digital search volume",
            ReportId::CategoryCtr => "Click-through rate by category, hour and weekday",
            ReportId::TopDomains => "Top clicked domains per category",
            ReportId::EventResponse => "Daily searches against external events",
            ReportId::StockCorrelation => "Search interest against a stock price",
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ReportId {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "q1" | "volume" => Ok(ReportId::SearchVolume),
            "q2" | "ctr" => Ok(ReportId::CategoryCtr),
            "q3" | "domains" => Ok(ReportId::TopDomains),
            "q4" | "events" => Ok(ReportId::EventResponse),
            "q5" | "correlation" => Ok(ReportId::StockCorrelation),
            _ => Err(ReportError::UnknownReport(s.to_string())),
        }
    }
}

/// What a finished report produced
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report: ReportId,
    /// Files written, in drawing order
    pub artifacts: Vec<PathBuf>,
    /// Rows across the views that were drawn
    pub rows: usize,
    /// Grand-total rows left out of every view
    pub discarded: usize,
}

/// Run one report end to end.
pub fn run(id: ReportId, settings: &Settings) -> ReportResult<ReportOutcome> {
    log_info(format!("📊 {} - {}", id.code(), id.description()));

    let outcome = match id {
        ReportId::SearchVolume => search_volume::run(settings)?,
        ReportId::CategoryCtr => category_ctr::run(settings)?,
        ReportId::TopDomains => top_domains::run(settings)?,
        ReportId::EventResponse => event_response::run(settings)?,
        ReportId::StockCorrelation => stock_correlation::run(settings)?,
    };

    for artifact in &outcome.artifacts {
        log_info(format!("💾 Saved to: {}", artifact.display()));
    }
    log_success(format!(
        "{} done: {} chart file(s) from {} rows",
        id.code(),
        outcome.artifacts.len(),
        outcome.rows
    ));
    Ok(outcome)
}

/// Labels and numeric values of one view, rows without a number left out.
pub(crate) fn category_series(set: &RecordSet, label: &str, value: &str) -> ShapeResult<CategorySeries> {
    let lp = set.position(label)?;
    let vp = set.position(value)?;
    let (labels, values): (Vec<String>, Vec<f64>) = set
        .records()
        .iter()
        .filter_map(|r| r.cell(vp).as_number().map(|v| (r.cell(lp).to_string(), v)))
        .unzip();
    Ok(CategorySeries::new(labels, values))
}

/// `(date, value)` points of one view, rows missing either left out.
pub(crate) fn dated_points(set: &RecordSet, date: &str, value: &str) -> ShapeResult<Vec<(NaiveDate, f64)>> {
    let dp = set.position(date)?;
    let vp = set.position(value)?;
    Ok(set
        .records()
        .iter()
        .filter_map(|r| Some((r.cell(dp).as_date()?, r.cell(vp).as_number()?)))
        .collect())
}
