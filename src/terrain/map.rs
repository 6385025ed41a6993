//! Terrain loaded from a grayscale image, one pixel per cell.
//!
//! Dark pixels (below [`OBSTACLE_LEVEL`]) are obstacles, everything else is
//! free. Any format the `image` crate can decode works, PNG is what gets
//! built in.

use std::path::Path;

use image::GrayImage;
use tracing::info;

use super::{Cell, CellState, TerrainGrid};
use crate::error::{NavError, Result};

/// Pixels darker than this are obstacles
pub const OBSTACLE_LEVEL: u8 = 128;

impl TerrainGrid {
    /// Build a grid from a grayscale image
    pub fn from_image(pixels: &GrayImage) -> Result<Self> {
        let (width, height) = (pixels.width() as usize, pixels.height() as usize);
        if width == 0 || height == 0 {
            return Err(NavError::Config("map image is empty".to_string()));
        }

        let mut grid = TerrainGrid::empty(width, height);
        for (x, y, pixel) in pixels.enumerate_pixels() {
            if pixel.0[0] < OBSTACLE_LEVEL {
                grid.set_state(Cell::new(x as usize, y as usize), CellState::Obstacle)?;
            }
        }
        Ok(grid)
    }

    /// Load a map image from disk
    pub fn load_map<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let pixels = image::open(path)?.into_luma8();
        let grid = Self::from_image(&pixels)?;

        info!(
            "Loaded {}x{} map from {} with {} obstacles",
            grid.width(),
            grid.height(),
            path.display(),
            grid.obstacle_count()
        );
        Ok(grid)
    }
}
