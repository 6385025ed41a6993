//! Configuration loading for DroneNav

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};
use crate::terrain::Cell;

/// Main configuration structure
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub grid: GridConfig,
    pub navigation: NavigationConfig,
    pub signal: SignalConfig,
    /// Start cell `[x, y]`
    pub start: [usize; 2],
    /// Fixed goal cell `[x, y]`; drawn at random when absent
    pub goal: Option<[usize; 2]>,
    /// RNG seed; a random seed is drawn when absent
    pub seed: Option<u64>,
}

/// Terrain generation and goal placement
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub width: usize,
    pub height: usize,
    /// Probability that a cell is an obstacle
    pub obstacle_probability: f64,
    /// Chebyshev radius cleared around the goal
    pub goal_clear_radius: usize,
    /// Random goals are drawn from `x >= goal_min_x`, `y >= goal_min_y`
    pub goal_min_x: usize,
    pub goal_min_y: usize,
    /// Grayscale map image used instead of random terrain
    pub map: Option<PathBuf>,
}

/// Motion cadence
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    pub move_delay_ms: u64,
    /// Abort A* after this many expansions
    pub max_expansions: Option<usize>,
}

/// Predictor artifact and frame fixtures
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SignalConfig {
    pub model_path: PathBuf,
    pub frames_dir: PathBuf,
    /// Overrides the decision threshold stored in the artifact
    pub threshold: Option<f32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            navigation: NavigationConfig::default(),
            signal: SignalConfig::default(),
            start: [0, 0],
            goal: None,
            seed: None,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            obstacle_probability: 0.25,
            goal_clear_radius: 2,
            goal_min_x: 5,
            goal_min_y: 5,
            map: None,
        }
    }
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            move_delay_ms: 300,
            max_expansions: None,
        }
    }
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/sos_classifier.json"),
            frames_dir: PathBuf::from("assets/sos_sequence"),
            threshold: None,
        }
    }
}

impl SimConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: SimConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the session cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.grid.width == 0 || self.grid.height == 0 {
            return Err(NavError::Config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid.width, self.grid.height
            )));
        }
        if !(0.0..=1.0).contains(&self.grid.obstacle_probability) {
            return Err(NavError::Config(format!(
                "obstacle_probability must be in [0, 1], got {}",
                self.grid.obstacle_probability
            )));
        }
        if let Some(threshold) = self.signal.threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(NavError::Config(format!(
                    "threshold must be in [0, 1], got {}",
                    threshold
                )));
            }
        }

        // Map dimensions are only known once the image is loaded
        if self.grid.map.is_some() {
            return Ok(());
        }
        let cells = [("start", Some(self.start_cell())), ("goal", self.goal_cell())];
        for (name, cell) in cells {
            if let Some(cell) = cell {
                if cell.x >= self.grid.width || cell.y >= self.grid.height {
                    return Err(NavError::Config(format!(
                        "{} {} lies outside the {}x{} grid",
                        name, cell, self.grid.width, self.grid.height
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn start_cell(&self) -> Cell {
        Cell::new(self.start[0], self.start[1])
    }

    pub fn goal_cell(&self) -> Option<Cell> {
        self.goal.map(|[x, y]| Cell::new(x, y))
    }

    pub fn move_delay(&self) -> Duration {
        Duration::from_millis(self.navigation.move_delay_ms)
    }
}
