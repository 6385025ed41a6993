use super::SEQUENCE_LEN;

/// Temporal template of the SOS strobe.
///
/// The canonical strobe is 15 frames on, 10 off, 30 on. That is 55 frames,
/// so the remaining frames of the classification window are rendered off.
#[derive(Debug, Clone, PartialEq)]
pub struct StrobePattern {
    pub on_frames: usize,
    pub gap_frames: usize,
    pub hold_frames: usize,
    pub on_level: f32,
    pub off_level: f32,
}

impl Default for StrobePattern {
    fn default() -> Self {
        Self {
            on_frames: 15,
            gap_frames: 10,
            hold_frames: 30,
            on_level: 255.0,
            off_level: 0.0,
        }
    }
}

impl StrobePattern {
    /// On/off state of each frame, padded or truncated to `SEQUENCE_LEN`
    pub fn frames(&self) -> Vec<bool> {
        let mut frames: Vec<bool> = std::iter::repeat(true)
            .take(self.on_frames)
            .chain(std::iter::repeat(false).take(self.gap_frames))
            .chain(std::iter::repeat(true).take(self.hold_frames))
            .collect();

        frames.resize(SEQUENCE_LEN, false);
        frames
    }

    /// Per-frame brightness values
    pub fn brightness(&self) -> Vec<f32> {
        self.frames()
            .into_iter()
            .map(|on| if on { self.on_level } else { self.off_level })
            .collect()
    }
}
