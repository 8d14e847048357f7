//! Chart rendering.
//!
//! Renderers only draw: every view they receive is already normalized,
//! filtered and ordered. Colors and canvas sizes come from an explicit
//! [`ChartStyle`] passed into each call.
//!
//! - `bars`: vertical, ranked horizontal, grouped and small-multiple bars
//! - `lines`: category line chart and dual-axis date series
//! - `heatmap`: annotated value grid
//! - `animation`: per-category frames composed into a GIF

pub mod animation;
pub mod bars;
pub mod heatmap;
pub mod lines;

use std::path::Path;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Canvas size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Colors, fonts and canvas sizes for every chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Main series color (hex)
    pub primary: String,
    /// Trend lines and secondary emphasis
    pub accent: String,
    /// Second axis series
    pub secondary: String,
    /// Event markers and their labels
    pub annotation: String,
    /// Heatmap low end
    pub heat_low: String,
    /// Heatmap high end
    pub heat_high: String,
    pub font: String,
    pub caption_size: u32,
    pub label_size: u32,
    pub bar_canvas: Canvas,
    pub line_canvas: Canvas,
    pub ranked_canvas: Canvas,
    pub heatmap_canvas: Canvas,
    pub series_canvas: Canvas,
    pub frame_canvas: Canvas,
    /// Size of one panel in a small-multiples grid
    pub panel_canvas: Canvas,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            primary: "#008080".to_string(),
            accent: "#CC3239".to_string(),
            secondary: "#FF9900".to_string(),
            annotation: "#12111B".to_string(),
            heat_low: "#440154".to_string(),
            heat_high: "#FDE725".to_string(),
            font: "sans-serif".to_string(),
            caption_size: 28,
            label_size: 16,
            bar_canvas: Canvas::new(1200, 700),
            line_canvas: Canvas::new(1400, 600),
            ranked_canvas: Canvas::new(1000, 600),
            heatmap_canvas: Canvas::new(1400, 700),
            series_canvas: Canvas::new(1600, 800),
            frame_canvas: Canvas::new(1200, 800),
            panel_canvas: Canvas::new(800, 400),
        }
    }
}

impl ChartStyle {
    pub fn primary(&self) -> RGBColor {
        parse_hex(&self.primary).unwrap_or(RGBColor(0, 128, 128))
    }

    pub fn accent(&self) -> RGBColor {
        parse_hex(&self.accent).unwrap_or(RGBColor(204, 50, 57))
    }

    pub fn secondary(&self) -> RGBColor {
        parse_hex(&self.secondary).unwrap_or(RGBColor(255, 153, 0))
    }

    pub fn annotation(&self) -> RGBColor {
        parse_hex(&self.annotation).unwrap_or(RGBColor(18, 17, 27))
    }

    /// Linear blend between the heatmap ends, `t` clamped to `0..=1`
    pub fn heat(&self, t: f64) -> RGBColor {
        let low = parse_hex(&self.heat_low).unwrap_or(RGBColor(68, 1, 84));
        let high = parse_hex(&self.heat_high).unwrap_or(RGBColor(253, 231, 37));
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        RGBColor(mix(low.0, high.0), mix(low.1, high.1), mix(low.2, high.2))
    }
}

/// `#RRGGBB` or `RRGGBB`
pub fn parse_hex(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Axis text shared by all charts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Titles {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
}

impl Titles {
    pub fn new(title: impl Into<String>, x_desc: impl Into<String>, y_desc: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_desc: x_desc.into(),
            y_desc: y_desc.into(),
        }
    }
}

/// Upper axis bound with headroom for value labels.
pub(crate) fn upper_bound<'a>(values: impl IntoIterator<Item = &'a f64>) -> f64 {
    let max = values.into_iter().copied().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.15
    } else {
        1.0
    }
}

/// Axis range placing `n` categories at integer positions `0..n`.
pub(crate) fn index_range(n: usize) -> std::ops::Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Label of the category at axis position `v`; blank between categories.
pub(crate) fn index_label(labels: &[String], v: f64) -> String {
    let i = v.round();
    if (v - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

/// Create the parent directory of an output file.
pub(crate) fn prepare_output(path: &Path) -> RenderResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Run a plotters drawing closure, mapping any failure to [`RenderError`].
pub(crate) fn draw_to<F>(path: &Path, draw: F) -> RenderResult<()>
where
    F: FnOnce() -> Result<(), Box<dyn std::error::Error>>,
{
    prepare_output(path)?;
    draw().map_err(|e| RenderError::draw(path, e))
}

/// `12345.0` → `"12,345"`
pub fn thousands(value: f64) -> String {
    let n = value.round() as i64;
    let digits = n.unsigned_abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        format!("-{}", out)
    } else {
        out
    }
}
