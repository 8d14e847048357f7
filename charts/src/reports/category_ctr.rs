//! q2: click-through rate by category, from grouping sets
//! (category), (category, hour) and (category, weekday).

use crate::config::Settings;
use crate::error::ReportResult;
use crate::models::RecordSet;
use crate::render::bars::GroupedSeries;
use crate::render::{bars, heatmap, Titles};
use crate::transform::{
    pivot, unique_in_order, ColumnOp, Normalizer, Orderer, OrderingSequence, Partitioner, Pivot, Shaping,
    UnmatchedPolicy,
};

use super::{category_series, ReportId, ReportOutcome};

pub const INPUT: &str = "question2-data.csv";

pub const CATEGORY: &str = "CATEGORY";
pub const HOUR: &str = "hour";
pub const WEEKDAY: &str = "weekday";
pub const CTR: &str = "CTR_PERCENTAGE";
pub const SEARCHES: &str = "TOTAL_SEARCHES";

pub const RANKED_CHART: &str = "q2_bar_category_ctr.png";
pub const HEATMAP_CHART: &str = "q2_heatmap_hour_ctr.png";
pub const WEEKDAY_CHART: &str = "q2_bar_weekday_volume.png";

pub fn shaping() -> Shaping {
    Shaping::new(
        Normalizer::new()
            .step(CATEGORY, ColumnOp::Trim)
            .step(HOUR, ColumnOp::ToNumber)
            .step(WEEKDAY, ColumnOp::Trim)
            .step(WEEKDAY, ColumnOp::Lowercase)
            .step(CTR, ColumnOp::ToNumber)
            .step(SEARCHES, ColumnOp::ToNumber),
    )
    .partitioned(Partitioner::new([HOUR, WEEKDAY]).label(CATEGORY))
}

/// Ordered views ready to draw
#[derive(Debug, Clone)]
pub struct CtrViews {
    /// Per-category totals, highest CTR first
    pub overall: RecordSet,
    /// CTR by category (rows) and hour (columns)
    pub hourly: Pivot,
    /// Per-category weekday totals, monday first
    pub weekday: RecordSet,
    pub rows: usize,
    pub discarded: usize,
}

pub fn shape_set(set: &RecordSet, policy: UnmatchedPolicy) -> ReportResult<CtrViews> {
    let partition = shaping().partition(set)?;

    let overall = Orderer::new(policy)
        .descending(CTR)
        .order(partition.view(&[HOUR, WEEKDAY])?)?;

    let by_hour = partition.view(&[WEEKDAY])?;
    let hourly = pivot(&by_hour, CATEGORY, HOUR, CTR)?;

    let weekday = Orderer::new(policy)
        .by_sequence(WEEKDAY, OrderingSequence::weekdays())
        .order(partition.view(&[HOUR])?)?;

    Ok(CtrViews {
        rows: overall.len() + by_hour.len() + weekday.len(),
        overall,
        hourly,
        weekday,
        discarded: partition.grand_totals().len(),
    })
}

pub fn shape(settings: &Settings) -> ReportResult<CtrViews> {
    let set = shaping().load(settings.input(INPUT))?;
    shape_set(&set, settings.unmatched)
}

/// Weekdays on the x axis, one series per category in first-seen order.
pub fn weekday_groups(weekday: &RecordSet) -> ReportResult<GroupedSeries> {
    let days = unique_in_order(weekday, WEEKDAY)?;
    let categories = unique_in_order(weekday, CATEGORY)?;
    let (dp, cp, vp) = (
        weekday.position(WEEKDAY)?,
        weekday.position(CATEGORY)?,
        weekday.position(SEARCHES)?,
    );

    let series = categories
        .into_iter()
        .map(|category| {
            let values = days
                .iter()
                .map(|day| {
                    let hits: Vec<f64> = weekday
                        .records()
                        .iter()
                        .filter(|r| r.cell(dp).to_string() == *day && r.cell(cp).to_string() == category)
                        .filter_map(|r| r.cell(vp).as_number())
                        .collect();
                    // repeated (category, weekday) rows are averaged
                    (!hits.is_empty()).then(|| hits.iter().sum::<f64>() / hits.len() as f64)
                })
                .collect();
            (category, values)
        })
        .collect();

    Ok(GroupedSeries {
        categories: days,
        series,
    })
}

pub fn run(settings: &Settings) -> ReportResult<ReportOutcome> {
    let views = shape(settings)?;
    let ranked = category_series(&views.overall, CATEGORY, CTR)?;
    let grouped = weekday_groups(&views.weekday)?;

    let dir = settings.report_dir(ReportId::CategoryCtr.subdir());

    let ranked_path = dir.join(RANKED_CHART);
    bars::ranked_bars(
        &ranked_path,
        &Titles::new(
            "Overall User Intent (CTR) by Digital Commerce Category",
            "Click-Through Rate (%)",
            "Digital Commerce Category",
        ),
        &ranked,
        &settings.style,
    )?;

    let heatmap_path = dir.join(HEATMAP_CHART);
    heatmap::heatmap(
        &heatmap_path,
        &Titles::new(
            "Peak Digital Commerce User Intent (CTR) by Category and Hour",
            "Hour of Day (00 - 23)",
            "Digital Commerce Category",
        ),
        &views.hourly,
        &settings.style,
    )?;

    let weekday_path = dir.join(WEEKDAY_CHART);
    bars::grouped_bars(
        &weekday_path,
        &Titles::new(
            "Total Digital Commerce Search Volume by Category and Day of Week",
            "Day of the Week",
            "Total Searches (Count)",
        ),
        &grouped,
        &settings.style,
    )?;

    Ok(ReportOutcome {
        report: ReportId::CategoryCtr,
        artifacts: vec![ranked_path, heatmap_path, weekday_path],
        rows: views.rows,
        discarded: views.discarded,
    })
}
