//! q1: monthly and weekly digital search volume from a rollup over
//! (month, week).
//!
//! Rows with an absent week are monthly totals; rows with a week are
//! weekly totals; rows with an absent month are the grand total.

use crate::config::Settings;
use crate::error::ReportResult;
use crate::models::RecordSet;
use crate::render::{bars, lines, Titles};
use crate::transform::{
    ColumnOp, LabelBuilder, Normalizer, Orderer, OrderingSequence, Partitioner, Shaping, UnmatchedPolicy,
};

use super::{category_series, ReportId, ReportOutcome};

pub const INPUT: &str = "q1_rollup_results.csv";

pub const MONTH: &str = "SALES_MONTH";
pub const WEEK: &str = "calender week";
pub const COUNT: &str = "DIGITAL_SEARCH_COUNT";
/// Derived `"<Month> Wk <n>"` column on the weekly view
pub const WEEK_LABEL: &str = "Weekly_Label";

pub const MONTHLY_CHART: &str = "q1_monthly_bar_volume.png";
pub const WEEKLY_CHART: &str = "q1_weekly_line_trend.png";

/// Months covered by the search log
pub fn months() -> OrderingSequence {
    OrderingSequence::new(["March", "April", "May"])
}

pub fn shaping() -> Shaping {
    Shaping::new(
        Normalizer::new()
            .step(MONTH, ColumnOp::Trim)
            .step(MONTH, ColumnOp::Capitalize)
            .step(WEEK, ColumnOp::ToNumber)
            .step(COUNT, ColumnOp::ToNumber),
    )
    .partitioned(Partitioner::new([WEEK]).label(MONTH))
}

/// Ordered views ready to draw
#[derive(Debug, Clone)]
pub struct VolumeViews {
    /// One row per month, in month order
    pub monthly: RecordSet,
    /// One row per week, by month then week, with [`WEEK_LABEL`]
    pub weekly: RecordSet,
    pub discarded: usize,
}

/// Partition and order an already normalized record set.
pub fn shape_set(set: &RecordSet, policy: UnmatchedPolicy) -> ReportResult<VolumeViews> {
    let partition = shaping().partition(set)?;

    let monthly = Orderer::new(policy)
        .by_sequence(MONTH, months())
        .order(partition.view(&[WEEK])?)?;

    let weekly = Orderer::new(policy)
        .by_sequence(MONTH, months())
        .ascending(WEEK)
        .order(partition.view(&[])?)?;
    let weekly = LabelBuilder::new()
        .column(MONTH)
        .literal(" Wk ")
        .column(WEEK)
        .build(weekly, WEEK_LABEL)?;

    Ok(VolumeViews {
        monthly,
        weekly,
        discarded: partition.grand_totals().len(),
    })
}

pub fn shape(settings: &Settings) -> ReportResult<VolumeViews> {
    let set = shaping().load(settings.input(INPUT))?;
    shape_set(&set, settings.unmatched)
}

pub fn run(settings: &Settings) -> ReportResult<ReportOutcome> {
    let views = shape(settings)?;
    let monthly = category_series(&views.monthly, MONTH, COUNT)?;
    let weekly = category_series(&views.weekly, WEEK_LABEL, COUNT)?;

    let dir = settings.report_dir(ReportId::SearchVolume.subdir());
    let monthly_path = dir.join(MONTHLY_CHART);
    bars::bar_with_trend(
        &monthly_path,
        &Titles::new(
            "Q1 Volume: Monthly Contribution and Trend",
            "Month",
            "Total Digital Search Volume",
        ),
        &monthly,
        &settings.style,
    )?;

    let weekly_path = dir.join(WEEKLY_CHART);
    lines::category_line(
        &weekly_path,
        &Titles::new(
            "Q1 Trend: Weekly Fluctuation in Digital Commerce Searches",
            "Calendar Week (March - May 2006)",
            "Total Digital Search Count",
        ),
        &weekly,
        &settings.style,
    )?;

    Ok(ReportOutcome {
        report: ReportId::SearchVolume,
        artifacts: vec![monthly_path, weekly_path],
        rows: views.monthly.len() + views.weekly.len(),
        discarded: views.discarded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use std::path::Path;

    fn normalized(csv: &str) -> RecordSet {
        let set = parse_str(csv, ',', Path::new("q1.csv")).unwrap();
        shaping().normalizer.normalize(set).unwrap()
    }

    #[test]
    fn test_monthly_and_weekly_views() {
        let set = normalized(
            "SALES_MONTH,calender week,DIGITAL_SEARCH_COUNT\n\
             april,[NULL],300\n\
             march,[NULL],100\n\
             march,2,60\n\
             april,14,300\n\
             march,1,40\n\
             [NULL],[NULL],400\n",
        );
        let views = shape_set(&set, UnmatchedPolicy::Skip).unwrap();

        assert_eq!(views.monthly.labels(MONTH).unwrap(), vec!["March", "April"]);
        assert_eq!(
            views.weekly.labels(WEEK_LABEL).unwrap(),
            vec!["March Wk 1", "March Wk 2", "April Wk 14"]
        );
        assert_eq!(views.weekly.numbers(COUNT).unwrap(), vec![40.0, 60.0, 300.0]);
        assert_eq!(views.discarded, 1);
    }

    #[test]
    fn test_month_outside_sequence_is_skipped() {
        let set = normalized("SALES_MONTH,calender week,DIGITAL_SEARCH_COUNT\njune,[NULL],5\nmay,[NULL],7\n");
        let views = shape_set(&set, UnmatchedPolicy::Skip).unwrap();
        assert_eq!(views.monthly.labels(MONTH).unwrap(), vec!["May"]);

        assert!(shape_set(&set, UnmatchedPolicy::Strict).is_err());
    }

    #[test]
    fn test_non_numeric_week_fails() {
        let set = parse_str(
            "SALES_MONTH,calender week,DIGITAL_SEARCH_COUNT\nmarch,first,5\n",
            ',',
            Path::new("q1.csv"),
        )
        .unwrap();
        assert!(shaping().normalizer.normalize(set).is_err());
    }
}
