use std::path::PathBuf;

use super::{load_brightness_sequence, SEQUENCE_LEN};

/// Where the session gets a brightness sequence when the drone reaches the goal
pub trait SignalSource: Send {
    fn sample(&mut self) -> Vec<f32>;
}

/// Frame fixtures on disk
#[derive(Debug, Clone)]
pub struct FrameDirectory {
    dir: PathBuf,
    count: usize,
}

impl FrameDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            count: SEQUENCE_LEN,
        }
    }
}

impl SignalSource for FrameDirectory {
    fn sample(&mut self) -> Vec<f32> {
        load_brightness_sequence(&self.dir, self.count)
    }
}

/// Fixed in-memory sequence
#[derive(Debug, Clone, Default)]
pub struct StaticSignal(pub Vec<f32>);

impl SignalSource for StaticSignal {
    fn sample(&mut self) -> Vec<f32> {
        self.0.clone()
    }
}
