//! Annotated heatmap over a [`Pivot`].

use std::path::Path;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{draw_to, index_label, index_range, ChartStyle, Titles};
use crate::error::RenderResult;
use crate::transform::Pivot;

/// Draw one colored cell per populated pivot value, first row at the top,
/// each annotated with its value to one decimal.
pub fn heatmap(path: &Path, titles: &Titles, grid: &Pivot, style: &ChartStyle) -> RenderResult<()> {
    let (lo, hi) = grid.range().unwrap_or((0.0, 1.0));
    let span = if hi > lo { hi - lo } else { 1.0 };
    let rows = grid.rows.len();
    let cols = grid.columns.len();
    let flipped: Vec<String> = grid.rows.iter().rev().cloned().collect();

    draw_to(path, || {
        let root = BitMapBackend::new(path, style.heatmap_canvas.size()).into_drawing_area();
        root.fill(&WHITE)?;

        let font = style.font.as_str();
        let mut chart = ChartBuilder::on(&root)
            .caption(&titles.title, (font, style.caption_size).into_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(180)
            .build_cartesian_2d(index_range(cols), index_range(rows))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(cols.max(1))
            .y_labels(rows.max(1))
            .x_label_formatter(&|v| index_label(&grid.columns, *v))
            .y_label_formatter(&|v| index_label(&flipped, *v))
            .x_desc(titles.x_desc.as_str())
            .y_desc(titles.y_desc.as_str())
            .label_style((font, style.label_size).into_font())
            .axis_desc_style((font, style.label_size).into_font())
            .draw()?;

        let cells: Vec<(f64, f64, f64)> = grid
            .values
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                let y = (rows - 1 - r) as f64;
                row.iter()
                    .enumerate()
                    .filter_map(move |(c, v)| v.map(|v| (c as f64, y, v)))
            })
            .collect();

        chart.draw_series(cells.iter().map(|&(x, y, v)| {
            let color = style.heat((v - lo) / span);
            Rectangle::new([(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)], color.filled())
        }))?;

        let annotation = (font, style.label_size.saturating_sub(4).max(8))
            .into_font()
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(cells.iter().map(|&(x, y, v)| {
            // dark text on the bright end of the scale
            let ink = if (v - lo) / span > 0.6 { &BLACK } else { &WHITE };
            Text::new(format!("{:.1}", v), (x, y), annotation.clone().color(ink))
        }))?;

        root.present()?;
        Ok(())
    })
}
