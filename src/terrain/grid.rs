use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::Cell;
use crate::error::{NavError, Result};

/// Binary terrain state of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    #[default]
    Free,
    Obstacle,
}

/// Fixed-size obstacle map, stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerrainGrid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl TerrainGrid {
    /// Create an obstacle-free grid
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellState::Free; width * height],
        }
    }

    /// Generate a Bernoulli obstacle field.
    ///
    /// Every cell is independently an obstacle with probability
    /// `obstacle_probability`. Nothing keeps the free cells connected, so
    /// callers must expect unreachable goals.
    pub fn generate<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        obstacle_probability: f64,
        rng: &mut R,
    ) -> Self {
        let p = if obstacle_probability.is_finite() {
            obstacle_probability.clamp(0.0, 1.0)
        } else {
            0.0
        };

        let cells = (0..width * height)
            .map(|_| {
                if rng.gen::<f64>() < p {
                    CellState::Obstacle
                } else {
                    CellState::Free
                }
            })
            .collect();

        Self { width, height, cells }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check whether a cell lies inside the grid
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    fn index(&self, cell: Cell) -> Result<usize> {
        if self.contains(cell) {
            Ok(cell.y * self.width + cell.x)
        } else {
            Err(NavError::OutOfBounds {
                cell,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Get the terrain state of a cell
    pub fn state(&self, cell: Cell) -> Result<CellState> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Check whether a cell is free; out-of-range cells are an error, not "blocked"
    pub fn is_free(&self, cell: Cell) -> Result<bool> {
        Ok(self.state(cell)? == CellState::Free)
    }

    /// Overwrite the terrain state of a single cell
    pub fn set_state(&mut self, cell: Cell, state: CellState) -> Result<()> {
        let i = self.index(cell)?;
        self.cells[i] = state;
        Ok(())
    }

    /// Force every cell within Chebyshev distance `radius` of `center` to Free.
    ///
    /// The square is clipped to the grid; only `center` itself must be in range.
    pub fn clear_neighborhood(&mut self, center: Cell, radius: usize) -> Result<()> {
        self.index(center)?;

        let min_x = center.x.saturating_sub(radius);
        let min_y = center.y.saturating_sub(radius);
        let max_x = center.x.saturating_add(radius).min(self.width - 1);
        let max_y = center.y.saturating_add(radius).min(self.height - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                self.cells[y * self.width + x] = CellState::Free;
            }
        }

        Ok(())
    }

    /// Number of obstacle cells
    pub fn obstacle_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&s| s == CellState::Obstacle)
            .count()
    }

    /// Iterate over all free cells in row-major order
    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == CellState::Free)
            .map(move |(i, _)| Cell::new(i % self.width, i / self.width))
    }

    /// Free 4-connected neighbours of an in-range cell, ordered left, right, up, down
    pub fn neighbors4(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let candidates = [
            cell.x.checked_sub(1).map(|x| Cell::new(x, cell.y)),
            Some(Cell::new(cell.x + 1, cell.y)),
            cell.y.checked_sub(1).map(|y| Cell::new(cell.x, y)),
            Some(Cell::new(cell.x, cell.y + 1)),
        ];

        candidates
            .into_iter()
            .flatten()
            .filter(move |&n| matches!(self.state(n), Ok(CellState::Free)))
    }

    /// Pick a uniformly random free cell with `x >= min_x` and `y >= min_y`,
    /// never returning `exclude`
    pub fn random_free_cell<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        min_x: usize,
        min_y: usize,
        exclude: Option<Cell>,
    ) -> Option<Cell> {
        let candidates: Vec<Cell> = self
            .free_cells()
            .filter(|c| c.x >= min_x && c.y >= min_y && Some(*c) != exclude)
            .collect();

        candidates.choose(rng).copied()
    }
}
