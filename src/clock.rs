use std::time::{Duration, Instant};

/// Target frame rate of the terminal view
pub const TARGET_FPS: u32 = 30;

pub const FRAME_DURATION: Duration = Duration::from_millis(1000 / TARGET_FPS as u64);

/// Weight of the newest frame in the smoothed rate
const FPS_SMOOTHING: f32 = 0.1;

/// Wall-clock pacing for the render loop.
///
/// Only the terminal view uses real time; the session itself advances by the
/// `dt` that [`FrameClock::tick`] hands out.
pub struct FrameClock {
    frame: Duration,
    last: Instant,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_frame(FRAME_DURATION)
    }

    pub fn with_frame(frame: Duration) -> Self {
        Self {
            frame,
            last: Instant::now(),
            fps: 1.0 / frame.as_secs_f32(),
        }
    }

    /// Start a frame if one is due. Returns the time since the previous one.
    pub fn tick(&mut self) -> Option<Duration> {
        let now = Instant::now();
        let dt = now.duration_since(self.last);
        if dt < self.frame {
            return None;
        }

        self.last = now;
        let instant_fps = 1.0 / dt.as_secs_f32().max(f32::EPSILON);
        self.fps += (instant_fps - self.fps) * FPS_SMOOTHING;
        Some(dt)
    }

    /// How long to sleep before the next frame is due
    pub fn wait(&self) -> Duration {
        self.frame.saturating_sub(self.last.elapsed())
    }

    pub fn fps(&self) -> u32 {
        self.fps.round() as u32
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
