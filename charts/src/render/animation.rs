//! Frame-by-frame animation: one PNG per category, composed into a GIF.
//!
//! Frames are written strictly one after another, then read back and padded
//! onto a shared white canvas as the largest frame, so frames of different
//! sizes line up in the final GIF.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{imageops, Delay, Frame, Rgba, RgbaImage};
use regex::Regex;

use super::bars::{frame_bars, CategorySeries};
use super::{prepare_output, ChartStyle, Titles};
use crate::error::{RenderError, RenderResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};

/// Display time of each frame
pub const FRAME_DELAY_MS: u32 = 4000;

/// Replace characters not allowed in file names with `_`.
pub fn sanitize_filename(name: &str) -> String {
    Regex::new(r#"[<>:"/\\|?*]"#)
        .map(|re| re.replace_all(name, "_").into_owned())
        .unwrap_or_else(|_| name.to_string())
}

/// `dir/category_NN_<name>.png`, `index` zero-based.
pub fn frame_path(dir: &Path, index: usize, category: &str) -> PathBuf {
    dir.join(format!("category_{:02}_{}.png", index + 1, sanitize_filename(category)))
}

/// One animation frame: the category it shows and its bars
#[derive(Debug, Clone)]
pub struct FrameSpec {
    pub category: String,
    pub titles: Titles,
    pub series: CategorySeries,
}

/// Render every frame into `dir`, in order, returning the written paths.
///
/// `dir` is only created when there is at least one frame.
pub fn render_frames(dir: &Path, frames: &[FrameSpec], style: &ChartStyle) -> RenderResult<Vec<PathBuf>> {
    if frames.is_empty() {
        return Err(RenderError::NoFrames(dir.to_path_buf()));
    }
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(frames.len());
    for (i, frame) in frames.iter().enumerate() {
        let path = frame_path(dir, i, &frame.category);
        frame_bars(&path, &frame.titles, &frame.series, style)?;
        log_info_indent(format!("🖼️  {}", path.display()), 1);
        written.push(path);
    }
    Ok(written)
}

/// Center `img` on a white canvas of `width` x `height`.
pub fn pad_to(img: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let x = width.saturating_sub(img.width()) / 2;
    let y = height.saturating_sub(img.height()) / 2;
    imageops::overlay(&mut canvas, img, x as i64, y as i64);
    canvas
}

/// Compose `frames` into a looping GIF at `out`, returning the canvas size.
pub fn compose_gif(frames: &[PathBuf], out: &Path, delay_ms: u32) -> RenderResult<(u32, u32)> {
    if frames.is_empty() {
        return Err(RenderError::NoFrames(out.to_path_buf()));
    }

    let images = frames
        .iter()
        .map(|p| -> RenderResult<RgbaImage> { Ok(image::open(p)?.to_rgba8()) })
        .collect::<RenderResult<Vec<RgbaImage>>>()?;

    let width = images.iter().map(RgbaImage::width).max().unwrap_or(0);
    let height = images.iter().map(RgbaImage::height).max().unwrap_or(0);
    log_info(format!(
        "🎞️  Composing {} frame(s) on a {}x{} canvas",
        images.len(),
        width,
        height
    ));

    prepare_output(out)?;
    let mut writer = BufWriter::new(File::create(out)?);
    {
        let mut encoder = GifEncoder::new(&mut writer);
        encoder.set_repeat(Repeat::Infinite)?;
        encoder.encode_frames(images.iter().map(|img| {
            Frame::from_parts(
                pad_to(img, width, height),
                0,
                0,
                Delay::from_numer_denom_ms(delay_ms, 1),
            )
        }))?;
    }
    writer.flush()?;

    log_success(format!("Animation saved to {}", out.display()));
    Ok((width, height))
}

/// Delete the frame files, then `dir` if nothing else is left in it.
///
/// Returns whether the directory was removed.
pub fn cleanup(frames: &[PathBuf], dir: &Path) -> RenderResult<bool> {
    for frame in frames {
        match fs::remove_file(frame) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    if fs::read_dir(dir)?.next().is_some() {
        log_warning(format!("{} is not empty, keeping it", dir.display()));
        return Ok(false);
    }
    fs::remove_dir(dir)?;
    log_info(format!("🧹 Removed {}", dir.display()));
    Ok(true)
}
