//! SOS strobe recognition.
//!
//! A strobe is observed as one brightness sample per frame. Exactly
//! [`SEQUENCE_LEN`] samples are handed to an opaque [`Predictor`]; anything
//! shorter or longer is reported as incomplete without consulting it.

pub mod frames;
pub mod pattern;
pub mod predictor;
pub mod source;

pub use frames::{load_brightness_sequence, write_frames};
pub use pattern::StrobePattern;
pub use predictor::{LinearPredictor, Predictor};
pub use source::{FrameDirectory, SignalSource, StaticSignal};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of frames in a classifiable brightness sequence
pub const SEQUENCE_LEN: usize = 60;

/// Outcome of a single classification call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub found: bool,
    /// Confidence in the reported label, in `[0, 1]`
    pub confidence: f32,
}

impl DetectionResult {
    pub const NOT_FOUND: DetectionResult = DetectionResult {
        found: false,
        confidence: 0.0,
    };
}

/// Classification with the incomplete-sequence case kept distinct
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Incomplete { samples: usize },
    Classified(DetectionResult),
}

impl Classification {
    pub fn result(&self) -> DetectionResult {
        match self {
            Classification::Incomplete { .. } => DetectionResult::NOT_FOUND,
            Classification::Classified(result) => *result,
        }
    }
}

/// Classify a brightness sequence, keeping incomplete input distinguishable
pub fn classify_detailed<P: Predictor + ?Sized>(sequence: &[f32], predictor: &P) -> Classification {
    if sequence.len() != SEQUENCE_LEN {
        debug!(
            "Brightness sequence has {} samples, need {}",
            sequence.len(),
            SEQUENCE_LEN
        );
        return Classification::Incomplete {
            samples: sequence.len(),
        };
    }

    let label = predictor.predict(sequence);
    let confidence = predictor
        .predict_proba(sequence)
        .map(|proba| proba[usize::from(label == 1)])
        .unwrap_or(1.0);

    Classification::Classified(DetectionResult {
        found: label == 1,
        confidence: if confidence.is_nan() { 0.0 } else { confidence.clamp(0.0, 1.0) },
    })
}

/// Classify a brightness sequence; incomplete input yields `NOT_FOUND`
pub fn classify<P: Predictor + ?Sized>(sequence: &[f32], predictor: &P) -> DetectionResult {
    classify_detailed(sequence, predictor).result()
}
