//! Line charts: an ordered category line and a dual-axis date series.

use std::path::Path;

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::bars::CategorySeries;
use super::{draw_to, index_label, index_range, thousands, upper_bound, ChartStyle, Titles};
use crate::error::RenderResult;

/// Which y axis a dated series is drawn against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Left,
    Right,
}

/// Named series of `(date, value)` points, date ascending
#[derive(Debug, Clone, PartialEq)]
pub struct DatedSeries {
    pub name: String,
    pub axis: Axis,
    pub points: Vec<(NaiveDate, f64)>,
}

impl DatedSeries {
    pub fn new(name: impl Into<String>, axis: Axis, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            name: name.into(),
            axis,
            points,
        }
    }
}

/// Annotated point on the left-axis series
#[derive(Debug, Clone, PartialEq)]
pub struct EventMarker {
    pub date: NaiveDate,
    pub value: f64,
    pub label: String,
}

/// Line through ordered categories, with point markers.
pub fn category_line(
    path: &Path,
    titles: &Titles,
    series: &CategorySeries,
    style: &ChartStyle,
) -> RenderResult<()> {
    draw_to(path, || {
        let root = BitMapBackend::new(path, style.line_canvas.size()).into_drawing_area();
        root.fill(&WHITE)?;

        let font = style.font.as_str();
        let n = series.len();
        let values = &series.values[..n];
        let labels = &series.labels;
        let primary = style.primary();

        let mut chart = ChartBuilder::on(&root)
            .caption(&titles.title, (font, style.caption_size).into_font())
            .margin(20)
            .x_label_area_size(70)
            .y_label_area_size(80)
            .build_cartesian_2d(index_range(n), 0f64..upper_bound(values))?;

        chart
            .configure_mesh()
            .x_labels(n.max(1))
            .x_label_formatter(&|v| index_label(labels, *v))
            .y_label_formatter(&|v| thousands(*v))
            .x_desc(titles.x_desc.as_str())
            .y_desc(titles.y_desc.as_str())
            .label_style((font, style.label_size.saturating_sub(2)).into_font())
            .axis_desc_style((font, style.label_size).into_font())
            .draw()?;

        let points: Vec<(f64, f64)> = values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect();
        chart.draw_series(LineSeries::new(points.clone(), primary.stroke_width(3)))?;
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 5, primary.filled())))?;

        root.present()?;
        Ok(())
    })
}

/// Two series on independent y axes over a shared date axis, with
/// labeled event markers on the left series.
pub fn dual_axis(
    path: &Path,
    titles: &Titles,
    right_desc: &str,
    series: &[DatedSeries],
    events: &[EventMarker],
    style: &ChartStyle,
) -> RenderResult<()> {
    let dates = date_range(series);
    let left: Vec<&DatedSeries> = series.iter().filter(|s| s.axis == Axis::Left).collect();
    let right: Vec<&DatedSeries> = series.iter().filter(|s| s.axis == Axis::Right).collect();
    let left_max = upper_bound(left.iter().flat_map(|s| s.points.iter().map(|(_, v)| v)));
    let right_max = upper_bound(right.iter().flat_map(|s| s.points.iter().map(|(_, v)| v)));

    draw_to(path, || {
        let root = BitMapBackend::new(path, style.series_canvas.size()).into_drawing_area();
        root.fill(&WHITE)?;

        let font = style.font.as_str();
        let primary = style.primary();
        let secondary = style.secondary();
        let annotation = style.annotation();

        let mut chart = ChartBuilder::on(&root)
            .caption(&titles.title, (font, style.caption_size).into_font())
            .margin(25)
            .x_label_area_size(60)
            .y_label_area_size(90)
            .right_y_label_area_size(90)
            .build_cartesian_2d(dates.clone(), 0f64..left_max)?
            .set_secondary_coord(dates, 0f64..right_max);

        chart
            .configure_mesh()
            .x_labels(12)
            .x_label_formatter(&|d| d.format("%b %d").to_string())
            .y_label_formatter(&|v| thousands(*v))
            .x_desc(titles.x_desc.as_str())
            .y_desc(titles.y_desc.as_str())
            .label_style((font, style.label_size.saturating_sub(2)).into_font())
            .axis_desc_style((font, style.label_size).into_font())
            .draw()?;

        chart
            .configure_secondary_axes()
            .y_label_formatter(&|v| format!("{:.2}", v))
            .y_desc(right_desc)
            .label_style((font, style.label_size.saturating_sub(2)).into_font())
            .axis_desc_style((font, style.label_size).into_font().color(&secondary))
            .draw()?;

        for (i, s) in left.iter().enumerate() {
            let color = if i == 0 { primary } else { style.accent() };
            chart
                .draw_series(LineSeries::new(s.points.iter().copied(), color.stroke_width(2)))?
                .label(s.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }
        for s in &right {
            chart
                .draw_secondary_series(LineSeries::new(s.points.iter().copied(), secondary.stroke_width(2)))?
                .label(s.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], secondary.stroke_width(2)));
        }

        let marker_font = (font, style.label_size.saturating_sub(2))
            .into_font()
            .color(&annotation)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(events.iter().map(|e| {
            EmptyElement::at((e.date, e.value))
                + Circle::new((0, 0), 6, annotation.filled())
                + Text::new(e.label.clone(), (0, -10), marker_font.clone())
        }))?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    })
}

/// Smallest to largest date over all series; a one-day span when empty or
/// degenerate.
pub(crate) fn date_range(series: &[DatedSeries]) -> std::ops::Range<NaiveDate> {
    let mut dates = series.iter().flat_map(|s| s.points.iter().map(|(d, _)| *d));
    let Some(first) = dates.next() else {
        let epoch = NaiveDate::default();
        return epoch..epoch + Duration::days(1);
    };
    let (lo, hi) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    if lo == hi {
        lo..hi + Duration::days(1)
    } else {
        lo..hi
    }
}
