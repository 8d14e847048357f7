//! q3: top clicked domains per category, as an animated GIF of one bar
//! chart per category plus a small-multiples grid.

use std::path::PathBuf;

use crate::config::Settings;
use crate::error::ReportResult;
use crate::models::RecordSet;
use crate::render::animation::{self, FrameSpec, FRAME_DELAY_MS};
use crate::render::bars::{self, CategorySeries};
use crate::render::Titles;
use crate::transform::{
    filter_equals, filter_present, unique_in_order, ColumnOp, Normalizer, Orderer, Shaping, UnmatchedPolicy,
};

use super::{category_series, ReportId, ReportOutcome};

pub const INPUT: &str = "question3-data.csv";

pub const CATEGORY: &str = "CATEGORY";
pub const DOMAIN: &str = "THISDOMAIN";
pub const CLICKS: &str = "DOMAIN_CLICK_COUNT";
pub const RANK: &str = "DOMAIN_RANK_WITHIN_CATEGORY";

pub const FRAME_DIR: &str = "temp_plots";
pub const ANIMATION: &str = "category_plots_animation.gif";
pub const GRID_CHART: &str = "q3_small_multiples_vertical_independent_scale.png";

pub fn shaping() -> Shaping {
    Shaping::new(
        Normalizer::new()
            .step(CATEGORY, ColumnOp::Trim)
            .step(DOMAIN, ColumnOp::Trim)
            .step(CLICKS, ColumnOp::ToNumber)
            .step(RANK, ColumnOp::ToNumber),
    )
}

/// One ranked bar series per category, categories in name order
#[derive(Debug, Clone)]
pub struct DomainViews {
    pub sorted: RecordSet,
    pub categories: Vec<(String, CategorySeries)>,
}

pub fn shape_set(set: &RecordSet, policy: UnmatchedPolicy) -> ReportResult<DomainViews> {
    let sorted = Orderer::new(policy)
        .ascending(CATEGORY)
        .ascending(RANK)
        .order(filter_present(set, CATEGORY)?)?;

    let categories = unique_in_order(&sorted, CATEGORY)?
        .into_iter()
        .map(|category| -> ReportResult<(String, CategorySeries)> {
            let rows = filter_equals(&sorted, CATEGORY, &category)?;
            let series = category_series(&rows, DOMAIN, CLICKS)?;
            Ok((category, series))
        })
        .collect::<ReportResult<Vec<_>>>()?;

    Ok(DomainViews { sorted, categories })
}

pub fn shape(settings: &Settings) -> ReportResult<DomainViews> {
    let set = shaping().load(settings.input(INPUT))?;
    shape_set(&set, settings.unmatched)
}

fn frame_titles(category: &str) -> Titles {
    Titles::new(
        format!("Top 5 Clicked Domains - {}", category),
        "Domain",
        "Total Clicks (High Intent)",
    )
}

pub fn run(settings: &Settings) -> ReportResult<ReportOutcome> {
    let views = shape(settings)?;
    let dir = settings.report_dir(ReportId::TopDomains.subdir());
    let frame_dir = dir.join(FRAME_DIR);

    let frames: Vec<FrameSpec> = views
        .categories
        .iter()
        .map(|(category, series)| FrameSpec {
            category: category.clone(),
            titles: frame_titles(category),
            series: series.clone(),
        })
        .collect();

    let mut artifacts: Vec<PathBuf> = Vec::new();
    let written = animation::render_frames(&frame_dir, &frames, &settings.style)?;

    let gif = dir.join(ANIMATION);
    animation::compose_gif(&written, &gif, FRAME_DELAY_MS)?;
    artifacts.push(gif);

    if settings.delete_intermediate_files {
        animation::cleanup(&written, &frame_dir)?;
    } else {
        artifacts.extend(written);
    }

    let panels: Vec<(Titles, CategorySeries)> = views
        .categories
        .iter()
        .map(|(category, series)| {
            (
                Titles::new(format!("CATEGORY = {}", category), "Domain", "Total Clicks (High Intent)"),
                series.clone(),
            )
        })
        .collect();
    let grid = dir.join(GRID_CHART);
    bars::small_multiples(
        &grid,
        "Top 5 Clicked Domains Ranked by Digital Commerce Category",
        &panels,
        &settings.style,
    )?;
    artifacts.push(grid);

    Ok(ReportOutcome {
        report: ReportId::TopDomains,
        artifacts,
        rows: views.sorted.len(),
        discarded: 0,
    })
}
