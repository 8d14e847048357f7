//! q4: daily search trend against external events, joined on date.

use crate::config::Settings;
use crate::error::ReportResult;
use crate::models::RecordSet;
use crate::render::lines::{self, Axis, DatedSeries, EventMarker};
use crate::render::Titles;
use crate::transform::{filter_present, left_join, ColumnOp, Normalizer, Orderer, Shaping, UnmatchedPolicy};

use super::{dated_points, ReportId, ReportOutcome};

pub const TREND_INPUT: &str = "q4_daily_trend.csv";
pub const EVENTS_INPUT: &str = "q4_event_response.csv";

pub const TREND_DATE: &str = "EVENT_DATE_STRING";
pub const TOTAL: &str = "TOTAL_DAILY_DIGITAL_SEARCHES";
pub const USERS: &str = "UNIQUE_DAILY_DIGITAL_USERS";
pub const EVENT_DATE: &str = "EVENT_DATE";
pub const KEYWORD: &str = "EVENT_KEYWORD";
pub const HIGH_INTENT: &str = "HIGH_INTENT_SEARCH_COUNT";

pub const CHART: &str = "q4_annotated_timeseries.png";

pub fn trend_shaping() -> Shaping {
    Shaping::new(
        Normalizer::new()
            .step(TREND_DATE, ColumnOp::ToDate)
            .step(TOTAL, ColumnOp::ToNumber)
            .step(USERS, ColumnOp::ToNumber),
    )
}

pub fn events_shaping() -> Shaping {
    Shaping::new(
        Normalizer::new()
            .step(EVENT_DATE, ColumnOp::ToDate)
            .step(KEYWORD, ColumnOp::Trim)
            .step(HIGH_INTENT, ColumnOp::ToNumber),
    )
}

#[derive(Debug, Clone)]
pub struct EventViews {
    /// Trend rows by date with event columns attached
    pub joined: RecordSet,
    /// Joined rows that fall on an event day
    pub annotations: RecordSet,
}

pub fn shape_sets(trend: &RecordSet, events: &RecordSet, policy: UnmatchedPolicy) -> ReportResult<EventViews> {
    let joined = left_join(trend, TREND_DATE, events, EVENT_DATE, &[KEYWORD, HIGH_INTENT])?;
    let joined = Orderer::new(policy).ascending(TREND_DATE).order(joined)?;
    let annotations = filter_present(&joined, HIGH_INTENT)?;
    Ok(EventViews { joined, annotations })
}

pub fn shape(settings: &Settings) -> ReportResult<EventViews> {
    let trend = trend_shaping().load(settings.input(TREND_INPUT))?;
    let events = events_shaping().load(settings.input(EVENTS_INPUT))?;
    shape_sets(&trend, &events, settings.unmatched)
}

/// Event markers placed on the total-searches line
pub fn markers(annotations: &RecordSet) -> ReportResult<Vec<EventMarker>> {
    let (dp, tp, kp) = (
        annotations.position(TREND_DATE)?,
        annotations.position(TOTAL)?,
        annotations.position(KEYWORD)?,
    );
    Ok(annotations
        .records()
        .iter()
        .filter_map(|r| {
            Some(EventMarker {
                date: r.cell(dp).as_date()?,
                value: r.cell(tp).as_number()?,
                label: r.cell(kp).to_string(),
            })
        })
        .collect())
}

pub fn run(settings: &Settings) -> ReportResult<ReportOutcome> {
    let views = shape(settings)?;
    let series = vec![
        DatedSeries::new(
            "Total Daily Digital Searches",
            Axis::Left,
            dated_points(&views.joined, TREND_DATE, TOTAL)?,
        ),
        DatedSeries::new(
            "Unique Daily Digital Users",
            Axis::Right,
            dated_points(&views.joined, TREND_DATE, USERS)?,
        ),
    ];
    let events = markers(&views.annotations)?;

    let path = settings.report_dir(ReportId::EventResponse.subdir()).join(CHART);
    lines::dual_axis(
        &path,
        &Titles::new(
            "Dual-Axis Analysis: Search Volume and Unique Users vs. External Events (Mar-May 2006)",
            "Date (March 1 - May 31, 2006)",
            "Total Daily Digital Searches (Count)",
        ),
        "Unique Daily Digital Users (Count)",
        &series,
        &events,
        &settings.style,
    )?;

    Ok(ReportOutcome {
        report: ReportId::EventResponse,
        artifacts: vec![path],
        rows: views.joined.len(),
        discarded: 0,
    })
}
