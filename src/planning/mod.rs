pub mod astar;

pub use astar::{find_path, PathFinder, PlannerConfig};

use serde::{Deserialize, Serialize};

use crate::terrain::Cell;

/// Ordered cells from start to goal (both inclusive).
///
/// An empty result means the goal is unreachable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathResult {
    cells: Vec<Cell>,
}

impl PathResult {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// The "no path" result
    pub fn unreachable() -> Self {
        Self::default()
    }

    pub fn is_reachable(&self) -> bool {
        !self.cells.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of moves needed to walk the path
    pub fn moves(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn start(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn goal(&self) -> Option<Cell> {
        self.cells.last().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }
}
