// ============================================================
// Layer 3 - Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types the
// pipeline can swap implementations without changing the code
// that uses them:
//   - RecordingLoader implements SampleSource
//   - a live sensor feed could also implement SampleSource
//   - PowerTransformer, StandardScaler and MovingAverage all
//     implement Preprocessor and are chained per sensor
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use std::fmt;
use crate::domain::sensor::SensorReading;

// ─── SampleSource ─────────────────────────────────────────────────────────────
/// Any component that can produce synchronised sensor readings.
pub trait SampleSource {
    /// Load every reading this source has, in time order.
    fn load_all(&self) -> Result<Vec<SensorReading>>;
}

// ─── Preprocessor ─────────────────────────────────────────────────────────────
/// A transformation applied to one sensor window before inference.
///
/// Implementations work position by position, so the output always
/// has the same length as the input.
pub trait Preprocessor: Send + Sync + fmt::Debug {
    fn transform(&self, input: &[f32]) -> Vec<f32>;
}
