// ============================================================
// Layer 4 - Window Preprocessors
// ============================================================
// The models were trained on magnitude windows that had been
// transformed with scikit-learn's PowerTransformer followed by
// a StandardScaler, both fitted with one parameter per window
// position. The same transformations must be applied before
// inference or the model sees data from a different
// distribution.
//
// Preprocessors (all position-wise, output length = input length):
//
//   PowerTransformer - Yeo-Johnson transform with λ per position
//   StandardScaler   - (x - mean) / scale per position
//   MovingAverage    - trailing average over `period` values
//
// Reference: scikit-learn PowerTransformer / StandardScaler docs
//            Yeo & Johnson (2000)

use serde::{Deserialize, Serialize};

use crate::domain::traits::Preprocessor;

// ─── MovingAverage ────────────────────────────────────────────────────────────
/// Trailing moving average.
///
/// The first value passes through unchanged. Every later value `i`
/// becomes the sum of up to `period` values *before* it, divided by
/// `period` (not by the number of values actually summed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovingAverage {
    pub period: usize,
}

impl MovingAverage {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Preprocessor for MovingAverage {
    fn transform(&self, input: &[f32]) -> Vec<f32> {
        if self.period == 0 {
            return input.to_vec();
        }
        (0..input.len())
            .map(|i| {
                if i == 0 {
                    return input[0];
                }
                let start = i.saturating_sub(self.period);
                input[start..i].iter().sum::<f32>() / self.period as f32
            })
            .collect()
    }
}

// ─── PowerTransformer ─────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerTransformerConfig {
    pub lambdas: Vec<f32>,
}

/// Yeo-Johnson power transform with one λ per window position.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerTransformer {
    config: PowerTransformerConfig,
}

impl PowerTransformer {
    pub fn new(config: PowerTransformerConfig) -> Self {
        Self { config }
    }
}

/// Yeo-Johnson transform of a single value.
pub fn yeo_johnson(x: f32, lambda: f32) -> f32 {
    if x >= 0.0 {
        if lambda != 0.0 {
            ((x + 1.0).powf(lambda) - 1.0) / lambda
        } else {
            (x + 1.0).ln()
        }
    } else if lambda != 2.0 {
        -((-x + 1.0).powf(2.0 - lambda) - 1.0) / (2.0 - lambda)
    } else {
        -(-x + 1.0).ln()
    }
}

impl Preprocessor for PowerTransformer {
    fn transform(&self, input: &[f32]) -> Vec<f32> {
        input
            .iter()
            .zip(&self.config.lambdas)
            .map(|(&x, &lambda)| yeo_johnson(x, lambda))
            .collect()
    }
}

// ─── StandardScaler ───────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    pub scales: Vec<f32>,
    pub means:  Vec<f32>,
}

/// Standard scaling with one mean and scale per window position.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    config: StandardScalerConfig,
}

impl StandardScaler {
    pub fn new(config: StandardScalerConfig) -> Self {
        Self { config }
    }
}

impl Preprocessor for StandardScaler {
    fn transform(&self, input: &[f32]) -> Vec<f32> {
        input
            .iter()
            .zip(self.config.means.iter().zip(&self.config.scales))
            .map(|(&x, (&mean, &scale))| (x - mean) / scale)
            .collect()
    }
}

/// Run a chain of preprocessors in order.
pub fn apply_all(chain: &[Box<dyn Preprocessor>], values: Vec<f32>) -> Vec<f32> {
    chain.iter().fold(values, |acc, p| p.transform(&acc))
}
