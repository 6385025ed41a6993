use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::SEQUENCE_LEN;
use crate::error::{NavError, Result};

/// Pre-trained binary classifier over a brightness sequence.
///
/// Implementations are consulted only with sequences of exactly
/// `SEQUENCE_LEN` samples.
pub trait Predictor: Send {
    /// Predicted label: 1 for "SOS present", 0 otherwise
    fn predict(&self, features: &[f32]) -> u8;

    /// Class probabilities `[p(0), p(1)]`, if the model is calibrated
    fn predict_proba(&self, _features: &[f32]) -> Option<[f32; 2]> {
        None
    }
}

fn default_threshold() -> f32 {
    0.5
}

/// Logistic model loaded from a JSON artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearPredictor {
    weights: Vec<f32>,
    bias: f32,
    /// Probability at or above which the label is 1
    #[serde(default = "default_threshold")]
    threshold: f32,
}

impl LinearPredictor {
    pub fn new(weights: Vec<f32>, bias: f32) -> Result<Self> {
        let predictor = Self {
            weights,
            bias,
            threshold: default_threshold(),
        };
        predictor.validate()?;
        Ok(predictor)
    }

    /// Builder-style setter for the decision threshold
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold.clamp(0.0, 1.0);
        self
    }

    /// Correlation model for a known template.
    ///
    /// Weights are the mean-centered template, scaled so the template scores a
    /// logit of +6 and any steady brightness scores -6.
    pub fn matched_filter(template: &[f32]) -> Result<Self> {
        if template.len() != SEQUENCE_LEN {
            return Err(NavError::PredictorUnavailable(format!(
                "template has {} samples, expected {}",
                template.len(),
                SEQUENCE_LEN
            )));
        }

        let mean = template.iter().sum::<f32>() / template.len() as f32;
        let energy: f32 = template.iter().map(|t| (t - mean).powi(2)).sum();
        if energy <= f32::EPSILON {
            return Err(NavError::PredictorUnavailable(
                "template has no contrast".to_string(),
            ));
        }

        let scale = 12.0 / energy;
        let weights = template.iter().map(|t| (t - mean) * scale).collect();
        Self::new(weights, -6.0)
    }

    /// Load a predictor artifact; any failure means the predictor is unavailable
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            NavError::PredictorUnavailable(format!("cannot read {}: {}", path.display(), e))
        })?;

        let predictor: LinearPredictor = serde_json::from_str(&content).map_err(|e| {
            NavError::PredictorUnavailable(format!("cannot parse {}: {}", path.display(), e))
        })?;
        predictor.validate()?;

        info!("Loaded predictor from {}", path.display());
        Ok(predictor)
    }

    /// Write the artifact as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.weights.len() != SEQUENCE_LEN {
            return Err(NavError::PredictorUnavailable(format!(
                "model has {} weights, expected {}",
                self.weights.len(),
                SEQUENCE_LEN
            )));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(NavError::PredictorUnavailable(
                "model contains non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }

    /// Probability of label 1
    fn positive_probability(&self, features: &[f32]) -> f32 {
        let logit: f32 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f32>()
            + self.bias;
        1.0 / (1.0 + (-logit).exp())
    }
}

impl Predictor for LinearPredictor {
    fn predict(&self, features: &[f32]) -> u8 {
        u8::from(self.positive_probability(features) >= self.threshold)
    }

    fn predict_proba(&self, features: &[f32]) -> Option<[f32; 2]> {
        let p = self.positive_probability(features);
        Some([1.0 - p, p])
    }
}
