//! Bar charts: vertical with trend, ranked horizontal, grouped, and
//! small multiples.

use std::error::Error;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{draw_to, index_label, index_range, thousands, upper_bound, ChartStyle, Titles};
use crate::error::RenderResult;

/// Labels and values of one categorical series, already ordered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl CategorySeries {
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.labels.len().min(self.values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Several named series sharing one set of x categories
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedSeries {
    pub categories: Vec<String>,
    /// `(series name, value per category)`
    pub series: Vec<(String, Vec<Option<f64>>)>,
}

#[derive(Debug, Clone, Copy, Default)]
struct BarOptions {
    trend: bool,
    value_labels: bool,
    caption_size: Option<u32>,
}

/// Vertical bars with a trend line through the bar tops.
pub fn bar_with_trend(
    path: &Path,
    titles: &Titles,
    series: &CategorySeries,
    style: &ChartStyle,
) -> RenderResult<()> {
    draw_to(path, || {
        let root = BitMapBackend::new(path, style.bar_canvas.size()).into_drawing_area();
        root.fill(&WHITE)?;
        let opts = BarOptions { trend: true, value_labels: true, caption_size: None };
        draw_bars(&root, titles, series, style, opts)?;
        root.present()?;
        Ok(())
    })
}

/// One category's bars with value labels, as an animation frame.
pub fn frame_bars(
    path: &Path,
    titles: &Titles,
    series: &CategorySeries,
    style: &ChartStyle,
) -> RenderResult<()> {
    draw_to(path, || {
        let root = BitMapBackend::new(path, style.frame_canvas.size()).into_drawing_area();
        root.fill(&WHITE)?;
        let opts = BarOptions { trend: false, value_labels: true, caption_size: None };
        draw_bars(&root, titles, series, style, opts)?;
        root.present()?;
        Ok(())
    })
}

/// A grid of bar panels, two per row, each with its own y scale.
pub fn small_multiples(
    path: &Path,
    title: &str,
    panels: &[(Titles, CategorySeries)],
    style: &ChartStyle,
) -> RenderResult<()> {
    let cols = 2usize;
    let rows = panels.len().div_ceil(cols).max(1);
    let size = (
        style.panel_canvas.width * cols as u32,
        style.panel_canvas.height * rows as u32 + 60,
    );

    draw_to(path, || {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;
        let body = root.titled(title, (style.font.as_str(), style.caption_size + 6).into_font())?;

        let areas = body.split_evenly((rows, cols));
        for (area, (titles, series)) in areas.iter().zip(panels) {
            let opts = BarOptions {
                trend: false,
                value_labels: false,
                caption_size: Some(style.label_size + 2),
            };
            draw_bars(area, titles, series, style, opts)?;
        }
        root.present()?;
        Ok(())
    })
}

fn draw_bars(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    titles: &Titles,
    series: &CategorySeries,
    style: &ChartStyle,
    opts: BarOptions,
) -> Result<(), Box<dyn Error>> {
    let font = style.font.as_str();
    let n = series.len();
    let labels = &series.labels;
    let values = &series.values[..n];
    let primary = style.primary();
    let accent = style.accent();

    let mut chart = ChartBuilder::on(area)
        .caption(&titles.title, (font, opts.caption_size.unwrap_or(style.caption_size)).into_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(index_range(n), 0f64..upper_bound(values))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n.max(1))
        .x_label_formatter(&|v| index_label(labels, *v))
        .y_label_formatter(&|v| thousands(*v))
        .x_desc(titles.x_desc.as_str())
        .y_desc(titles.y_desc.as_str())
        .label_style((font, style.label_size).into_font())
        .axis_desc_style((font, style.label_size).into_font())
        .draw()?;

    chart
        .draw_series(values.iter().enumerate().map(|(i, &v)| {
            let x = i as f64;
            Rectangle::new([(x - 0.2, 0.0), (x + 0.2, v)], primary.mix(0.9).filled())
        }))?
        .label(titles.y_desc.as_str())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], primary.filled()));

    if opts.trend {
        let points: Vec<(f64, f64)> = values.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect();
        chart
            .draw_series(LineSeries::new(points.clone(), accent.stroke_width(2)))?
            .label("Trend")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], accent.stroke_width(2)));
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 5, accent.filled())))?;
    }

    if opts.value_labels {
        let label_style = (font, style.label_size)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
            Text::new(thousands(v), (i as f64, v), label_style.clone())
        }))?;
    }

    if opts.trend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    Ok(())
}

/// Horizontal bars, first value at the top.
pub fn ranked_bars(
    path: &Path,
    titles: &Titles,
    series: &CategorySeries,
    style: &ChartStyle,
) -> RenderResult<()> {
    draw_to(path, || {
        let root = BitMapBackend::new(path, style.ranked_canvas.size()).into_drawing_area();
        root.fill(&WHITE)?;

        let font = style.font.as_str();
        let n = series.len();
        let values = &series.values[..n];
        // top of the chart is the highest axis position
        let flipped: Vec<String> = series.labels[..n].iter().rev().cloned().collect();
        let primary = style.primary();

        let mut chart = ChartBuilder::on(&root)
            .caption(&titles.title, (font, style.caption_size).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(200)
            .build_cartesian_2d(0f64..upper_bound(values), index_range(n))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n.max(1))
            .y_label_formatter(&|v| index_label(&flipped, *v))
            .x_desc(titles.x_desc.as_str())
            .y_desc(titles.y_desc.as_str())
            .label_style((font, style.label_size).into_font())
            .axis_desc_style((font, style.label_size).into_font())
            .draw()?;

        chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
            let y = (n - 1 - i) as f64;
            let shade = 0.45 + 0.55 * (n - i) as f64 / n as f64;
            Rectangle::new([(0.0, y - 0.35), (v, y + 0.35)], primary.mix(shade).filled())
        }))?;

        root.present()?;
        Ok(())
    })
}

/// Side-by-side bars per category, one color per series.
pub fn grouped_bars(
    path: &Path,
    titles: &Titles,
    grouped: &GroupedSeries,
    style: &ChartStyle,
) -> RenderResult<()> {
    draw_to(path, || {
        let root = BitMapBackend::new(path, style.bar_canvas.size()).into_drawing_area();
        root.fill(&WHITE)?;

        let font = style.font.as_str();
        let n = grouped.categories.len();
        let k = grouped.series.len().max(1);
        let width = 0.8 / k as f64;
        let all_values: Vec<f64> = grouped
            .series
            .iter()
            .flat_map(|(_, vs)| vs.iter().flatten().copied())
            .collect();

        let mut chart = ChartBuilder::on(&root)
            .caption(&titles.title, (font, style.caption_size).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d(index_range(n), 0f64..upper_bound(&all_values))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n.max(1))
            .x_label_formatter(&|v| index_label(&grouped.categories, *v))
            .y_label_formatter(&|v| thousands(*v))
            .x_desc(titles.x_desc.as_str())
            .y_desc(titles.y_desc.as_str())
            .label_style((font, style.label_size).into_font())
            .axis_desc_style((font, style.label_size).into_font())
            .draw()?;

        for (s, (name, values)) in grouped.series.iter().enumerate() {
            let color = Palette99::pick(s).to_rgba();
            let offset = -0.4 + width * s as f64;
            chart
                .draw_series(values.iter().enumerate().filter_map(|(i, v)| {
                    let x = i as f64 + offset;
                    v.map(|v| Rectangle::new([(x, 0.0), (x + width, v)], color.filled()))
                }))?
                .label(name.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
        }

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
