//! A* search over the 4-connected terrain grid.
//!
//! Every move costs 1 and the Manhattan distance is used as heuristic, which
//! is admissible and consistent for this move set, so the first time the goal
//! is popped the reconstructed path has the fewest possible cells.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::{debug, warn};

use super::PathResult;
use crate::error::{NavError, Result};
use crate::terrain::{Cell, TerrainGrid};

/// Configuration for the A* planner.
#[derive(Clone, Debug, Default)]
pub struct PlannerConfig {
    /// Give up (and report unreachable) after this many node expansions
    pub max_expansions: Option<usize>,
}

/// Entry in the open set.
#[derive(Clone, Copy, Debug)]
struct SearchNode {
    cell: Cell,
    g: usize,
    f: usize,
    h: usize,
    seq: u64,
}

impl PartialEq for SearchNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SearchNode {}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: lowest f first, then closest to goal, then oldest
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.h.cmp(&self.h))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* path planner.
#[derive(Clone, Debug, Default)]
pub struct PathFinder {
    config: PlannerConfig,
}

impl PathFinder {
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan a path from `start` to `goal`.
    ///
    /// Returns an empty `PathResult` when no obstacle-free route exists.
    /// Endpoints outside the grid or on obstacles are caller errors.
    pub fn find_path(&self, grid: &TerrainGrid, start: Cell, goal: Cell) -> Result<PathResult> {
        if !grid.is_free(start)? {
            return Err(NavError::BlockedEndpoint { cell: start });
        }
        if !grid.is_free(goal)? {
            return Err(NavError::BlockedEndpoint { cell: goal });
        }

        if start == goal {
            return Ok(PathResult::new(vec![start]));
        }

        let mut open_set = BinaryHeap::new();
        let mut g_score: HashMap<Cell, usize> = HashMap::new();
        let mut came_from: HashMap<Cell, Cell> = HashMap::new();
        let mut seq = 0u64;
        let mut expansions = 0usize;

        let h = start.manhattan_distance(&goal);
        g_score.insert(start, 0);
        open_set.push(SearchNode { cell: start, g: 0, f: h, h, seq });

        while let Some(current) = open_set.pop() {
            // A cheaper route to this cell was queued after this entry
            if g_score.get(&current.cell).is_some_and(|&best| current.g > best) {
                continue;
            }

            if current.cell == goal {
                let path = reconstruct_path(&came_from, goal);
                debug!(
                    "A* reached {} in {} expansions, {} cells",
                    goal,
                    expansions,
                    path.len()
                );
                return Ok(PathResult::new(path));
            }

            expansions += 1;
            if let Some(limit) = self.config.max_expansions {
                if expansions > limit {
                    warn!("A* exceeded {} expansions, treating goal as unreachable", limit);
                    return Ok(PathResult::unreachable());
                }
            }

            let tentative_g = current.g + 1;
            for neighbor in grid.neighbors4(current.cell) {
                let improved = g_score
                    .get(&neighbor)
                    .map_or(true, |&known| tentative_g < known);
                if !improved {
                    continue;
                }

                came_from.insert(neighbor, current.cell);
                g_score.insert(neighbor, tentative_g);

                let h = neighbor.manhattan_distance(&goal);
                seq += 1;
                open_set.push(SearchNode {
                    cell: neighbor,
                    g: tentative_g,
                    f: tentative_g + h,
                    h,
                    seq,
                });
            }
        }

        debug!("A* exhausted open set after {} expansions, {} unreachable", expansions, goal);
        Ok(PathResult::unreachable())
    }
}

/// Plan with the default (unbounded) planner
pub fn find_path(grid: &TerrainGrid, start: Cell, goal: Cell) -> Result<PathResult> {
    PathFinder::default().find_path(grid, start, goal)
}

fn reconstruct_path(came_from: &HashMap<Cell, Cell>, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
