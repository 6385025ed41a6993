//! Simulation session: owns the terrain, the drone and the SOS detector.
//!
//! One session is one mission. `reset` throws everything away and starts a new
//! mission on fresh terrain; there is no other shared state.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SimConfig;
use crate::error::{NavError, Result};
use crate::navigation::{NavState, NavigationController, TickOutcome};
use crate::planning::{PathFinder, PathResult, PlannerConfig};
use crate::signal::{classify_detailed, Classification, DetectionResult, Predictor, SignalSource};
use crate::terrain::{Cell, CellState, TerrainGrid};

/// Mission-level state, as seen by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// The goal cannot be reached on this terrain
    NoPath,
    Traversing,
    Arrived,
}

/// State of the SOS detector for the current mission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectionStatus {
    /// Drone has not reached the goal yet
    Pending,
    Classified { result: DetectionResult },
    /// Fewer (or more) frames than the predictor needs
    Incomplete { samples: usize },
    /// Predictor artifact missing or corrupt; navigation is unaffected
    Unavailable { reason: String },
}

impl DetectionStatus {
    /// True only for a positive classification
    pub fn found(&self) -> bool {
        matches!(self, DetectionStatus::Classified { result } if result.found)
    }

    /// Collapse to a plain detection result
    pub fn result(&self) -> DetectionResult {
        match self {
            DetectionStatus::Classified { result } => *result,
            _ => DetectionResult::NOT_FOUND,
        }
    }
}

/// What a session tick did
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Paused,
    NoPath,
    Waiting,
    Moved { from: Cell, to: Cell },
    /// Reached the goal; the detector has run
    Arrived(DetectionStatus),
    Finished,
}

/// Summary of a mission, written by headless runs
#[derive(Debug, Clone, Serialize)]
pub struct MissionReport {
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub width: usize,
    pub height: usize,
    pub obstacles: usize,
    pub start: Cell,
    pub goal: Cell,
    pub path_length: usize,
    pub steps_taken: usize,
    pub elapsed_ms: u128,
    pub status: SessionStatus,
    pub detection: DetectionStatus,
}

pub struct SimulationSession {
    config: SimConfig,
    seed: u64,
    rng: StdRng,
    planner: PathFinder,

    /// Terrain reused by every reset instead of random generation
    fixed_terrain: Option<TerrainGrid>,
    grid: TerrainGrid,
    start: Cell,
    goal: Cell,
    controller: NavigationController,

    /// `Err` holds why the predictor could not be loaded
    predictor: std::result::Result<Box<dyn Predictor>, String>,
    signal: Box<dyn SignalSource>,
    detection: DetectionStatus,

    paused: bool,
    time_scale: f32,
    steps_taken: usize,
    elapsed: Duration,
}

impl SimulationSession {
    /// Create a session on randomly generated terrain
    pub fn new(
        config: SimConfig,
        predictor: Result<Box<dyn Predictor>>,
        signal: Box<dyn SignalSource>,
    ) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(rand::random);
        let start = config.start_cell();

        let mut session = Self::assemble(
            config,
            seed,
            TerrainGrid::empty(1, 1),
            start,
            predictor,
            signal,
        );
        session.reset()?;
        Ok(session)
    }

    /// Create a session on a fixed terrain with explicit start and goal.
    ///
    /// The grid is used as given for the first mission. Later resets start
    /// again from a copy of it, with the usual start and goal preparation.
    pub fn with_terrain(
        config: SimConfig,
        grid: TerrainGrid,
        start: Cell,
        goal: Cell,
        predictor: Result<Box<dyn Predictor>>,
        signal: Box<dyn SignalSource>,
    ) -> Result<Self> {
        let seed = config.seed.unwrap_or_default();
        let mut session = Self::assemble(config, seed, grid.clone(), start, predictor, signal);
        session.fixed_terrain = Some(grid);
        session.goal = goal;
        session.plan_from(start)?;
        Ok(session)
    }

    fn assemble(
        config: SimConfig,
        seed: u64,
        grid: TerrainGrid,
        start: Cell,
        predictor: Result<Box<dyn Predictor>>,
        signal: Box<dyn SignalSource>,
    ) -> Self {
        let predictor = predictor.map_err(|e| {
            warn!("SOS detection disabled: {}", e);
            e.to_string()
        });
        let planner = PathFinder::new(PlannerConfig {
            max_expansions: config.navigation.max_expansions,
        });
        let controller = NavigationController::new(start, config.move_delay());

        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            planner,
            fixed_terrain: None,
            grid,
            start,
            goal: start,
            controller,
            predictor,
            signal,
            detection: DetectionStatus::Pending,
            paused: false,
            time_scale: 1.0,
            steps_taken: 0,
            elapsed: Duration::ZERO,
            config,
        }
    }

    /// Start a new mission: fresh terrain (or the fixed map), new goal, new path
    pub fn reset(&mut self) -> Result<()> {
        let grid_cfg = &self.config.grid;
        let mut grid = match &self.fixed_terrain {
            Some(terrain) => terrain.clone(),
            None => TerrainGrid::generate(
                grid_cfg.width,
                grid_cfg.height,
                grid_cfg.obstacle_probability,
                &mut self.rng,
            ),
        };

        self.start = self.config.start_cell();
        grid.set_state(self.start, CellState::Free)?;

        let goal = match self.config.goal_cell() {
            Some(goal) => goal,
            None => grid
                .random_free_cell(&mut self.rng, grid_cfg.goal_min_x, grid_cfg.goal_min_y, Some(self.start))
                .or_else(|| grid.random_free_cell(&mut self.rng, 0, 0, Some(self.start)))
                .unwrap_or(self.start),
        };
        grid.clear_neighborhood(goal, grid_cfg.goal_clear_radius)?;

        info!(
            "Generated {}x{} terrain with {} obstacles, start {} goal {}",
            grid.width(),
            grid.height(),
            grid.obstacle_count(),
            self.start,
            goal
        );

        self.grid = grid;
        self.goal = goal;
        self.steps_taken = 0;
        self.elapsed = Duration::ZERO;
        self.controller.reset(self.start);
        self.plan_from(self.start)
    }

    /// Plan from the drone's current cell to a new goal, mid-flight if need be
    pub fn replan_to(&mut self, goal: Cell) -> Result<SessionStatus> {
        if !self.grid.is_free(goal)? {
            return Err(NavError::BlockedEndpoint { cell: goal });
        }
        self.goal = goal;
        self.plan_from(self.controller.position())?;
        Ok(self.status())
    }

    /// Send the drone to a new random free cell from wherever it is now
    pub fn retarget(&mut self) -> Result<SessionStatus> {
        let here = self.controller.position();
        let goal = self
            .grid
            .random_free_cell(&mut self.rng, 0, 0, Some(here))
            .unwrap_or(here);
        info!("Retargeting from {} to {}", here, goal);
        self.replan_to(goal)
    }

    fn plan_from(&mut self, from: Cell) -> Result<()> {
        let path = self.planner.find_path(&self.grid, from, self.goal)?;
        if path.is_reachable() {
            info!("Planned path from {} to {}: {} moves", from, self.goal, path.moves());
        } else {
            warn!("No path from {} to {}", from, self.goal);
        }

        self.controller.attach_path(path)?;
        self.detection = DetectionStatus::Pending;
        Ok(())
    }

    /// Advance the mission by `dt` of wall time (scaled by the speed setting)
    pub fn tick(&mut self, dt: Duration) -> SessionEvent {
        if self.paused {
            return SessionEvent::Paused;
        }

        let scaled = if self.time_scale == 1.0 {
            dt
        } else {
            dt.mul_f32(self.time_scale)
        };
        self.elapsed += scaled;
        let outcome = self.controller.tick(scaled);
        self.handle_outcome(outcome)
    }

    /// Manual step command: move one cell now, paused or not
    pub fn step(&mut self) -> SessionEvent {
        let outcome = self.controller.force_step();
        self.handle_outcome(outcome)
    }

    fn handle_outcome(&mut self, outcome: TickOutcome) -> SessionEvent {
        match outcome {
            TickOutcome::Idle => SessionEvent::NoPath,
            TickOutcome::Waiting => SessionEvent::Waiting,
            TickOutcome::Moved { from, to } => {
                self.steps_taken += 1;
                SessionEvent::Moved { from, to }
            }
            TickOutcome::Arrived { at } => {
                self.steps_taken += 1;
                info!("Drone reached {} after {} steps", at, self.steps_taken);
                SessionEvent::Arrived(self.run_detection())
            }
            // A single-cell path arrives without ever moving
            TickOutcome::Finished if self.detection == DetectionStatus::Pending => {
                SessionEvent::Arrived(self.run_detection())
            }
            TickOutcome::Finished => SessionEvent::Finished,
        }
    }

    fn run_detection(&mut self) -> DetectionStatus {
        let status = match &self.predictor {
            Err(reason) => {
                warn!("Skipping SOS detection: {}", reason);
                DetectionStatus::Unavailable {
                    reason: reason.clone(),
                }
            }
            Ok(predictor) => {
                let sequence = self.signal.sample();
                match classify_detailed(&sequence, predictor.as_ref()) {
                    Classification::Incomplete { samples } => {
                        warn!("Incomplete strobe sequence: {} frames", samples);
                        DetectionStatus::Incomplete { samples }
                    }
                    Classification::Classified(result) => {
                        info!(
                            "SOS detection: found={} confidence={:.2}",
                            result.found, result.confidence
                        );
                        DetectionStatus::Classified { result }
                    }
                }
            }
        };

        self.detection = status.clone();
        status
    }

    pub fn status(&self) -> SessionStatus {
        match self.controller.state() {
            NavState::Idle => SessionStatus::NoPath,
            NavState::Traversing => SessionStatus::Traversing,
            NavState::Arrived => SessionStatus::Arrived,
        }
    }

    pub fn detection(&self) -> &DetectionStatus {
        &self.detection
    }

    pub fn grid(&self) -> &TerrainGrid {
        &self.grid
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    pub fn path(&self) -> &PathResult {
        self.controller.path()
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Adjust playback speed
    pub fn adjust_speed(&mut self, delta: f32) {
        self.time_scale = (self.time_scale + delta).clamp(0.25, 4.0);
    }

    pub fn predictor_available(&self) -> bool {
        self.predictor.is_ok()
    }

    pub fn report(&self) -> MissionReport {
        MissionReport {
            generated_at: Utc::now(),
            seed: self.seed,
            width: self.grid.width(),
            height: self.grid.height(),
            obstacles: self.grid.obstacle_count(),
            start: self.start,
            goal: self.goal,
            path_length: self.path().len(),
            steps_taken: self.steps_taken,
            elapsed_ms: self.elapsed.as_millis(),
            status: self.status(),
            detection: self.detection.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{LinearPredictor, StaticSignal, StrobePattern};

    const DELAY: Duration = Duration::from_millis(300);

    fn canonical_predictor() -> Result<Box<dyn Predictor>> {
        let template = StrobePattern::default().brightness();
        LinearPredictor::matched_filter(&template).map(|p| Box::new(p) as Box<dyn Predictor>)
    }

    fn canonical_signal() -> Box<dyn SignalSource> {
        Box::new(StaticSignal(StrobePattern::default().brightness()))
    }

    fn seeded_config(seed: u64) -> SimConfig {
        SimConfig {
            seed: Some(seed),
            ..SimConfig::default()
        }
    }

    fn fixture_session(grid: TerrainGrid, start: Cell, goal: Cell) -> SimulationSession {
        SimulationSession::with_terrain(
            SimConfig::default(),
            grid,
            start,
            goal,
            canonical_predictor(),
            canonical_signal(),
        )
        .unwrap()
    }

    /// Tick until something other than movement happens
    fn run_to_end(session: &mut SimulationSession) -> SessionEvent {
        for _ in 0..10_000 {
            match session.tick(DELAY) {
                SessionEvent::Moved { .. } | SessionEvent::Waiting => continue,
                other => return other,
            }
        }
        panic!("mission did not finish");
    }

    #[test]
    fn test_open_grid_mission_detects_sos() {
        let mut session = fixture_session(TerrainGrid::empty(10, 10), Cell::new(0, 0), Cell::new(9, 9));
        assert_eq!(session.path().len(), 19);
        assert_eq!(session.status(), SessionStatus::Traversing);

        let event = run_to_end(&mut session);
        match event {
            SessionEvent::Arrived(status) => assert!(status.found()),
            other => panic!("unexpected {:?}", other),
        }

        assert_eq!(session.controller().position(), Cell::new(9, 9));
        assert_eq!(session.steps_taken(), 18);
        assert_eq!(session.status(), SessionStatus::Arrived);
        assert!(session.detection().found());
        assert_eq!(session.tick(DELAY), SessionEvent::Finished);
    }

    #[test]
    fn test_walled_goal_reports_no_path() {
        let mut grid = TerrainGrid::empty(10, 10);
        for y in 0..10 {
            grid.set_state(Cell::new(5, y), CellState::Obstacle).unwrap();
        }
        let mut session = fixture_session(grid, Cell::new(0, 0), Cell::new(9, 9));

        assert!(session.path().is_empty());
        assert_eq!(session.status(), SessionStatus::NoPath);
        for _ in 0..20 {
            assert_eq!(session.tick(DELAY), SessionEvent::NoPath);
        }
        assert_eq!(session.step(), SessionEvent::NoPath);
        assert_eq!(session.controller().state(), NavState::Idle);
        assert_eq!(session.detection(), &DetectionStatus::Pending);
    }

    #[test]
    fn test_missing_predictor_does_not_stop_navigation() {
        let mut session = SimulationSession::with_terrain(
            SimConfig::default(),
            TerrainGrid::empty(5, 5),
            Cell::new(0, 0),
            Cell::new(4, 0),
            Err(NavError::PredictorUnavailable("missing model".to_string())),
            canonical_signal(),
        )
        .unwrap();
        assert!(!session.predictor_available());

        match run_to_end(&mut session) {
            SessionEvent::Arrived(DetectionStatus::Unavailable { reason }) => {
                assert!(reason.contains("missing model"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(session.controller().position(), Cell::new(4, 0));
        assert!(!session.detection().found());
    }

    #[test]
    fn test_short_signal_is_incomplete() {
        let mut session = SimulationSession::with_terrain(
            SimConfig::default(),
            TerrainGrid::empty(5, 5),
            Cell::new(0, 0),
            Cell::new(1, 0),
            canonical_predictor(),
            Box::new(StaticSignal(vec![255.0; 45])),
        )
        .unwrap();

        assert_eq!(
            run_to_end(&mut session),
            SessionEvent::Arrived(DetectionStatus::Incomplete { samples: 45 })
        );
        assert_eq!(session.detection().result(), DetectionResult::NOT_FOUND);
    }

    #[test]
    fn test_start_equal_goal_detects_on_first_tick() {
        let mut session = fixture_session(TerrainGrid::empty(4, 4), Cell::new(2, 2), Cell::new(2, 2));
        assert_eq!(session.path().cells(), &[Cell::new(2, 2)]);
        assert!(matches!(session.tick(Duration::ZERO), SessionEvent::Arrived(_)));
        assert_eq!(session.tick(DELAY), SessionEvent::Finished);
    }

    #[test]
    fn test_detection_runs_once() {
        struct CountingSignal(std::sync::Arc<std::sync::atomic::AtomicUsize>);
        impl SignalSource for CountingSignal {
            fn sample(&mut self) -> Vec<f32> {
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                StrobePattern::default().brightness()
            }
        }

        let counter = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let mut session = SimulationSession::with_terrain(
            SimConfig::default(),
            TerrainGrid::empty(3, 1),
            Cell::new(0, 0),
            Cell::new(2, 0),
            canonical_predictor(),
            Box::new(CountingSignal(counter.clone())),
        )
        .unwrap();

        run_to_end(&mut session);
        for _ in 0..10 {
            session.tick(DELAY);
        }
        assert_eq!(counter.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reset_generates_usable_mission() {
        let mut session =
            SimulationSession::new(seeded_config(17), canonical_predictor(), canonical_signal()).unwrap();

        for _ in 0..10 {
            let grid = session.grid();
            let start = session.start();
            let goal = session.goal();

            assert_eq!(start, Cell::new(0, 0));
            assert_ne!(goal, start);
            assert!(goal.x >= 5 && goal.y >= 5);
            assert!(grid.is_free(start).unwrap());
            for y in goal.y.saturating_sub(2)..=(goal.y + 2).min(29) {
                for x in goal.x.saturating_sub(2)..=(goal.x + 2).min(29) {
                    assert!(grid.is_free(Cell::new(x, y)).unwrap());
                }
            }

            let path = session.path();
            if path.is_reachable() {
                assert_eq!(path.start(), Some(start));
                assert_eq!(path.goal(), Some(goal));
                assert_eq!(session.status(), SessionStatus::Traversing);
            } else {
                assert_eq!(session.status(), SessionStatus::NoPath);
            }

            session.reset().unwrap();
        }
    }

    #[test]
    fn test_same_seed_same_mission() {
        let a = SimulationSession::new(seeded_config(99), canonical_predictor(), canonical_signal()).unwrap();
        let b = SimulationSession::new(seeded_config(99), canonical_predictor(), canonical_signal()).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.goal(), b.goal());
        assert_eq!(a.path(), b.path());
    }

    #[test]
    fn test_reset_discards_progress() {
        let mut config = seeded_config(3);
        config.grid.obstacle_probability = 0.0;
        let mut session = SimulationSession::new(config, canonical_predictor(), canonical_signal()).unwrap();

        session.tick(DELAY);
        session.tick(DELAY);
        assert_eq!(session.steps_taken(), 2);

        session.reset().unwrap();
        assert_eq!(session.steps_taken(), 0);
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert_eq!(session.controller().position(), Cell::new(0, 0));
        assert_eq!(session.controller().path_index(), 0);
        assert_eq!(session.detection(), &DetectionStatus::Pending);
    }

    #[test]
    fn test_replan_mid_flight() {
        let mut session = fixture_session(TerrainGrid::empty(10, 10), Cell::new(0, 0), Cell::new(9, 0));
        for _ in 0..3 {
            session.tick(DELAY);
        }
        assert_eq!(session.controller().position(), Cell::new(3, 0));

        let status = session.replan_to(Cell::new(3, 4)).unwrap();
        assert_eq!(status, SessionStatus::Traversing);
        assert_eq!(session.path().start(), Some(Cell::new(3, 0)));
        assert_eq!(session.path().len(), 5);

        assert!(matches!(run_to_end(&mut session), SessionEvent::Arrived(_)));
        assert_eq!(session.controller().position(), Cell::new(3, 4));
    }

    #[test]
    fn test_replan_keeps_mission_totals() {
        let mut session = fixture_session(TerrainGrid::empty(10, 10), Cell::new(0, 0), Cell::new(9, 0));
        for _ in 0..3 {
            session.tick(DELAY);
        }
        assert_eq!(session.steps_taken(), 3);
        assert_eq!(session.elapsed(), DELAY * 3);

        session.replan_to(Cell::new(3, 4)).unwrap();
        assert_eq!(session.steps_taken(), 3);
        assert_eq!(session.elapsed(), DELAY * 3);

        run_to_end(&mut session);
        let report = session.report();
        assert_eq!(report.steps_taken, 7);
        assert_eq!(report.elapsed_ms, 2100);
        assert_eq!(report.path_length, 5);
    }

    #[test]
    fn test_retarget_picks_free_cell_elsewhere() {
        let mut grid = TerrainGrid::empty(4, 4);
        grid.set_state(Cell::new(2, 2), CellState::Obstacle).unwrap();
        let mut session = fixture_session(grid, Cell::new(0, 0), Cell::new(3, 3));
        session.tick(DELAY);

        let here = session.controller().position();
        for _ in 0..10 {
            session.retarget().unwrap();
            assert_ne!(session.goal(), here);
            assert!(session.grid().is_free(session.goal()).unwrap());
            assert_eq!(session.path().start(), Some(here));
        }
    }

    #[test]
    fn test_reset_reuses_fixed_terrain() {
        let mut grid = TerrainGrid::empty(8, 8);
        grid.set_state(Cell::new(0, 7), CellState::Obstacle).unwrap();
        let mut session = fixture_session(grid, Cell::new(0, 0), Cell::new(7, 7));
        session.tick(DELAY);

        session.reset().unwrap();
        assert_eq!(session.grid().width(), 8);
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert_eq!(session.steps_taken(), 0);
        assert_eq!(session.grid().state(Cell::new(0, 7)).unwrap(), CellState::Obstacle);
        assert!(session.goal().x >= 5 && session.goal().y >= 5);
    }

    #[test]
    fn test_configured_goal_is_used() {
        let mut config = seeded_config(11);
        config.grid.width = 12;
        config.grid.height = 12;
        config.goal = Some([10, 2]);
        let session = SimulationSession::new(config, canonical_predictor(), canonical_signal()).unwrap();

        assert_eq!(session.goal(), Cell::new(10, 2));
        assert!(session.grid().is_free(Cell::new(10, 2)).unwrap());
    }

    #[test]
    fn test_replan_to_obstacle_is_rejected() {
        let mut grid = TerrainGrid::empty(5, 5);
        grid.set_state(Cell::new(4, 4), CellState::Obstacle).unwrap();
        let mut session = fixture_session(grid, Cell::new(0, 0), Cell::new(2, 2));

        assert!(matches!(
            session.replan_to(Cell::new(4, 4)),
            Err(NavError::BlockedEndpoint { .. })
        ));
        assert!(matches!(
            session.replan_to(Cell::new(9, 9)),
            Err(NavError::OutOfBounds { .. })
        ));
        assert_eq!(session.goal(), Cell::new(2, 2));
    }

    #[test]
    fn test_pause_and_manual_step() {
        let mut session = fixture_session(TerrainGrid::empty(5, 1), Cell::new(0, 0), Cell::new(4, 0));
        session.toggle_pause();
        assert_eq!(session.tick(Duration::from_secs(10)), SessionEvent::Paused);
        assert_eq!(session.controller().position(), Cell::new(0, 0));

        assert_eq!(
            session.step(),
            SessionEvent::Moved {
                from: Cell::new(0, 0),
                to: Cell::new(1, 0)
            }
        );
        assert_eq!(session.steps_taken(), 1);
    }

    #[test]
    fn test_speed_scales_cadence() {
        let mut session = fixture_session(TerrainGrid::empty(5, 1), Cell::new(0, 0), Cell::new(4, 0));
        session.adjust_speed(1.0);
        assert_eq!(session.time_scale(), 2.0);

        // 150ms of wall time is 300ms of simulation time at 2x
        assert!(matches!(
            session.tick(Duration::from_millis(150)),
            SessionEvent::Moved { .. }
        ));

        session.adjust_speed(-10.0);
        assert_eq!(session.time_scale(), 0.25);
    }

    #[test]
    fn test_report_serializes() {
        let mut session = fixture_session(TerrainGrid::empty(3, 3), Cell::new(0, 0), Cell::new(2, 2));
        run_to_end(&mut session);

        let report = session.report();
        assert_eq!(report.path_length, 5);
        assert_eq!(report.steps_taken, 4);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "arrived");
        assert_eq!(json["detection"]["kind"], "classified");
        assert_eq!(json["detection"]["result"]["found"], true);
        assert_eq!(json["goal"]["x"], 2);
    }
}
