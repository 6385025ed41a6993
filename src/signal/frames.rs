//! Strobe frame fixtures on disk.
//!
//! Frames are grayscale PNGs named `frame_000.png`, `frame_001.png`, ... and
//! each one is reduced to its mean luminance.

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};
use tracing::{debug, info, warn};

use super::StrobePattern;
use crate::error::Result;

/// Path of the `index`-th frame inside `dir`
pub fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{:03}.png", index))
}

/// Render `pattern` as solid grayscale frames, returning the number written
pub fn write_frames(dir: &Path, pattern: &StrobePattern, size: (u32, u32)) -> Result<usize> {
    std::fs::create_dir_all(dir)?;

    let brightness = pattern.brightness();
    for (i, level) in brightness.iter().enumerate() {
        let value = level.round().clamp(0.0, 255.0) as u8;
        let frame = GrayImage::from_pixel(size.0, size.1, Luma([value]));
        frame.save(frame_path(dir, i))?;
    }

    info!("Wrote {} strobe frames to {}", brightness.len(), dir.display());
    Ok(brightness.len())
}

/// Mean luminance of one image file
fn mean_brightness(path: &Path) -> Result<f32> {
    let img = image::open(path)?.into_luma8();
    let pixels = img.as_raw();
    if pixels.is_empty() {
        return Ok(0.0);
    }

    let total: u64 = pixels.iter().map(|&p| u64::from(p)).sum();
    Ok(total as f32 / pixels.len() as f32)
}

/// Read up to `count` frames in order and reduce each to a brightness value.
///
/// Missing or undecodable frames are skipped, so the result may be shorter
/// than `count`; a missing directory yields an empty sequence.
pub fn load_brightness_sequence(dir: &Path, count: usize) -> Vec<f32> {
    if !dir.is_dir() {
        warn!("Strobe frame directory {} not found", dir.display());
        return Vec::new();
    }

    let mut values = Vec::with_capacity(count);
    for i in 0..count {
        let path = frame_path(dir, i);
        if !path.exists() {
            continue;
        }
        match mean_brightness(&path) {
            Ok(value) => values.push(value),
            Err(e) => warn!("Skipping frame {}: {}", path.display(), e),
        }
    }

    debug!("Read {} of {} frames from {}", values.len(), count, dir.display());
    values
}
