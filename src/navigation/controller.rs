use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use super::heading::heading_between;
use crate::error::{NavError, Result};
use crate::planning::PathResult;
use crate::terrain::Cell;

/// Navigation state machine states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavState {
    /// No usable path attached (never planned, or the goal is unreachable)
    Idle,
    Traversing,
    /// Terminal for the attached path
    Arrived,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No path attached
    Idle,
    /// Cadence not elapsed yet
    Waiting,
    Moved { from: Cell, to: Cell },
    /// The move that reached the final path cell (reported once)
    Arrived { at: Cell },
    /// Already arrived on an earlier tick
    Finished,
}

/// Drone pose and progress along the active path
#[derive(Debug, Clone, PartialEq)]
pub struct AgentState {
    pub position: Cell,
    /// Degrees, clockwise from +y
    pub heading: f32,
    /// Index of `position` in the active path
    pub path_index: usize,
    /// Simulation-clock time of the last step
    pub last_step_at: Duration,
}

impl AgentState {
    fn at(position: Cell) -> Self {
        Self {
            position,
            heading: 0.0,
            path_index: 0,
            last_step_at: Duration::ZERO,
        }
    }
}

/// Advances the drone along a planned path on a fixed cadence.
///
/// Time is supplied by the caller through `tick(dt)`, so the controller is
/// fully deterministic under test.
#[derive(Debug, Clone)]
pub struct NavigationController {
    agent: AgentState,
    path: PathResult,
    state: NavState,
    move_delay: Duration,
    /// Simulation clock, sum of every `dt` seen since the last reset
    clock: Duration,
}

impl NavigationController {
    pub fn new(start: Cell, move_delay: Duration) -> Self {
        Self {
            agent: AgentState::at(start),
            path: PathResult::unreachable(),
            state: NavState::Idle,
            move_delay,
            clock: Duration::ZERO,
        }
    }

    /// Drop the active path and park the drone at `start`
    pub fn reset(&mut self, start: Cell) {
        self.agent = AgentState::at(start);
        self.path = PathResult::unreachable();
        self.state = NavState::Idle;
        self.clock = Duration::ZERO;
    }

    /// Replace the active path.
    ///
    /// An empty path leaves the controller `Idle` (the no-path condition). A
    /// non-empty path must begin at the drone's current cell and move one
    /// 4-neighbour at a time; heading is kept.
    pub fn attach_path(&mut self, path: PathResult) -> Result<NavState> {
        if let Some(first) = path.start() {
            if first != self.agent.position {
                return Err(NavError::PathDoesNotStartAtAgent {
                    expected: self.agent.position,
                    found: first,
                });
            }
        }
        if let Some(pair) = path.cells().windows(2).find(|w| !w[0].is_adjacent4(&w[1])) {
            return Err(NavError::DiscontinuousPath {
                from: pair[0],
                to: pair[1],
            });
        }

        self.agent.path_index = 0;
        self.agent.last_step_at = self.clock;
        self.state = match path.len() {
            0 => NavState::Idle,
            1 => NavState::Arrived,
            _ => NavState::Traversing,
        };
        self.path = path;

        debug!(
            "Attached path of {} cells at {}, state {:?}",
            self.path.len(),
            self.agent.position,
            self.state
        );
        Ok(self.state)
    }

    /// Advance the simulation clock by `dt` and step at most one cell.
    pub fn tick(&mut self, dt: Duration) -> TickOutcome {
        self.clock += dt;

        match self.state {
            NavState::Idle => TickOutcome::Idle,
            NavState::Arrived => TickOutcome::Finished,
            NavState::Traversing => {
                if self.clock.saturating_sub(self.agent.last_step_at) < self.move_delay {
                    TickOutcome::Waiting
                } else {
                    self.advance()
                }
            }
        }
    }

    /// Step one cell immediately, ignoring the cadence
    pub fn force_step(&mut self) -> TickOutcome {
        match self.state {
            NavState::Idle => TickOutcome::Idle,
            NavState::Arrived => TickOutcome::Finished,
            NavState::Traversing => self.advance(),
        }
    }

    fn advance(&mut self) -> TickOutcome {
        let next_index = self.agent.path_index + 1;
        let Some(next) = self.path.get(next_index) else {
            self.state = NavState::Arrived;
            return TickOutcome::Finished;
        };

        let from = self.agent.position;
        if let Some(heading) = heading_between(from, next) {
            self.agent.heading = heading;
        }
        self.agent.position = next;
        self.agent.path_index = next_index;
        self.agent.last_step_at = self.clock;

        debug!("Drone moved to {} heading {:.0}", next, self.agent.heading);

        if next_index + 1 == self.path.len() {
            self.state = NavState::Arrived;
            TickOutcome::Arrived { at: next }
        } else {
            TickOutcome::Moved { from, to: next }
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn position(&self) -> Cell {
        self.agent.position
    }

    pub fn heading(&self) -> f32 {
        self.agent.heading
    }

    pub fn path_index(&self) -> usize {
        self.agent.path_index
    }

    pub fn path(&self) -> &PathResult {
        &self.path
    }

    /// Path cells already flown, including the current one
    pub fn visited(&self) -> &[Cell] {
        let cells = self.path.cells();
        if cells.is_empty() {
            cells
        } else {
            &cells[..=self.agent.path_index]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planning::find_path;
    use crate::terrain::{CellState, TerrainGrid};

    const DELAY: Duration = Duration::from_millis(300);

    fn straight_path(len: usize) -> PathResult {
        PathResult::new((0..len).map(|x| Cell::new(x, 0)).collect())
    }

    #[test]
    fn test_starts_idle() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.path_index(), 0);
        assert_eq!(nav.tick(Duration::from_secs(5)), TickOutcome::Idle);
        assert_eq!(nav.position(), Cell::new(0, 0));
    }

    #[test]
    fn test_ticks_before_delay_do_not_move() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        nav.attach_path(straight_path(4)).unwrap();
        assert_eq!(nav.state(), NavState::Traversing);

        for _ in 0..5 {
            assert_eq!(nav.tick(Duration::from_millis(50)), TickOutcome::Waiting);
            assert_eq!(nav.position(), Cell::new(0, 0));
        }

        // 250ms so far; the next 50ms tick completes the delay
        assert_eq!(
            nav.tick(Duration::from_millis(50)),
            TickOutcome::Moved {
                from: Cell::new(0, 0),
                to: Cell::new(1, 0)
            }
        );
        assert_eq!(nav.path_index(), 1);
        assert_eq!(nav.tick(Duration::from_millis(10)), TickOutcome::Waiting);
    }

    #[test]
    fn test_one_cell_per_tick_even_after_long_gap() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        nav.attach_path(straight_path(5)).unwrap();

        let outcome = nav.tick(Duration::from_secs(10));
        assert!(matches!(outcome, TickOutcome::Moved { .. }));
        assert_eq!(nav.position(), Cell::new(1, 0));
    }

    #[test]
    fn test_arrives_at_final_cell() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        nav.attach_path(straight_path(3)).unwrap();

        assert!(matches!(nav.tick(DELAY), TickOutcome::Moved { .. }));
        assert_eq!(nav.tick(DELAY), TickOutcome::Arrived { at: Cell::new(2, 0) });
        assert_eq!(nav.state(), NavState::Arrived);
        assert_eq!(nav.tick(DELAY), TickOutcome::Finished);
        assert_eq!(nav.path_index(), 2);
        assert_eq!(nav.visited().len(), 3);
    }

    #[test]
    fn test_heading_follows_displacement() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        let path = PathResult::new(vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)]);
        nav.attach_path(path).unwrap();

        nav.tick(DELAY);
        assert!((nav.heading() - 90.0).abs() < 1e-3);
        nav.tick(DELAY);
        assert!(nav.heading().abs() < 1e-3);
    }

    #[test]
    fn test_single_cell_path_is_already_arrived() {
        let mut nav = NavigationController::new(Cell::new(3, 3), DELAY);
        let state = nav.attach_path(PathResult::new(vec![Cell::new(3, 3)])).unwrap();
        assert_eq!(state, NavState::Arrived);
        assert_eq!(nav.tick(DELAY), TickOutcome::Finished);
    }

    #[test]
    fn test_empty_path_stays_idle() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        assert_eq!(nav.attach_path(PathResult::unreachable()).unwrap(), NavState::Idle);
        assert!(!nav.path().is_reachable());
        for _ in 0..10 {
            assert_eq!(nav.tick(DELAY), TickOutcome::Idle);
        }
        assert!(nav.visited().is_empty());
    }

    #[test]
    fn test_rejects_path_not_starting_at_drone() {
        let mut nav = NavigationController::new(Cell::new(2, 2), DELAY);
        let err = nav.attach_path(straight_path(3)).unwrap_err();
        assert!(matches!(err, NavError::PathDoesNotStartAtAgent { .. }));
        assert_eq!(nav.state(), NavState::Idle);
    }

    #[test]
    fn test_rejects_path_with_jumps() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        let diagonal = PathResult::new(vec![Cell::new(0, 0), Cell::new(1, 1)]);
        assert!(matches!(
            nav.attach_path(diagonal),
            Err(NavError::DiscontinuousPath { .. })
        ));

        let stall = PathResult::new(vec![Cell::new(0, 0), Cell::new(0, 0), Cell::new(1, 0)]);
        assert!(nav.attach_path(stall).is_err());
        assert_eq!(nav.state(), NavState::Idle);
    }

    #[test]
    fn test_replan_mid_traversal() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        nav.attach_path(straight_path(5)).unwrap();
        nav.tick(DELAY);
        nav.tick(DELAY);
        assert_eq!(nav.position(), Cell::new(2, 0));

        let detour = PathResult::new(vec![Cell::new(2, 0), Cell::new(2, 1)]);
        assert_eq!(nav.attach_path(detour).unwrap(), NavState::Traversing);
        assert_eq!(nav.path_index(), 0);

        // Cadence restarts from the moment of replanning
        assert_eq!(nav.tick(Duration::from_millis(100)), TickOutcome::Waiting);
        assert_eq!(nav.tick(DELAY), TickOutcome::Arrived { at: Cell::new(2, 1) });
    }

    #[test]
    fn test_force_step_ignores_cadence() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        nav.attach_path(straight_path(3)).unwrap();
        assert!(matches!(nav.force_step(), TickOutcome::Moved { .. }));
        assert_eq!(nav.force_step(), TickOutcome::Arrived { at: Cell::new(2, 0) });
        assert_eq!(nav.force_step(), TickOutcome::Finished);
    }

    #[test]
    fn test_reset_discards_progress() {
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        nav.attach_path(straight_path(3)).unwrap();
        nav.tick(DELAY);
        nav.reset(Cell::new(0, 0));

        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.position(), Cell::new(0, 0));
        assert!(!nav.path().is_reachable());
    }

    #[test]
    fn test_drives_planned_path_to_goal() {
        let grid = TerrainGrid::empty(10, 10);
        let path = find_path(&grid, Cell::new(0, 0), Cell::new(9, 9)).unwrap();
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        nav.attach_path(path).unwrap();

        let mut moves = 0;
        loop {
            match nav.tick(DELAY) {
                TickOutcome::Moved { .. } => moves += 1,
                TickOutcome::Arrived { at } => {
                    moves += 1;
                    assert_eq!(at, Cell::new(9, 9));
                    break;
                }
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(moves, 18);
    }

    #[test]
    fn test_walled_goal_never_leaves_idle() {
        let mut grid = TerrainGrid::empty(10, 10);
        for y in 0..10 {
            grid.set_state(Cell::new(5, y), CellState::Obstacle).unwrap();
        }
        let path = find_path(&grid, Cell::new(0, 0), Cell::new(9, 9)).unwrap();
        let mut nav = NavigationController::new(Cell::new(0, 0), DELAY);
        nav.attach_path(path).unwrap();

        for _ in 0..100 {
            assert_eq!(nav.tick(DELAY), TickOutcome::Idle);
        }
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.position(), Cell::new(0, 0));
    }
}
