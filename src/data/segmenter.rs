// ============================================================
// Layer 4 - Sensor Pipeline (segmentation)
// ============================================================
// Replays a sensor stream the way the phone app consumes it:
//
//   reading ──► magnitudes ──► one Window per sensor
//                                    │
//               every `inference_stride` readings, once all
//               windows are full:    │
//                                    ▼
//               preprocess each sensor window (per-sensor chain)
//                                    │
//                                    ▼
//               transpose (features × T) → (T × features)
//                                    │
//                                    ▼
//                              SensorWindow
//
// With the defaults (500-sample windows at 100 Hz, inference
// every 0.5 s) consecutive windows overlap by 450 samples.

use serde::{Deserialize, Serialize};

use crate::data::{dataset::SensorWindow, preprocessor::apply_all};
use crate::domain::{
    sensor::{DeviceFormat, Sensor, SensorReading},
    traits::Preprocessor,
    window::Window,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Seconds between two inferences
    pub inference_interval: f64,
    /// Seconds between two sensor readings
    pub sample_interval:    f64,
    /// Readings per window (the model's timesteps)
    pub window_length:      usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            inference_interval: 0.5,
            sample_interval:    0.01,
            window_length:      500,
        }
    }
}

impl PipelineConfig {
    /// Readings between two inferences, at least 1
    pub fn inference_stride(&self) -> usize {
        let stride = (self.inference_interval / self.sample_interval).round();
        if stride.is_finite() && stride >= 1.0 { stride as usize } else { 1 }
    }
}

pub struct SensorPipeline {
    config:        PipelineConfig,
    format:        DeviceFormat,
    windows:       Vec<Window>,
    preprocessors: Vec<Vec<Box<dyn Preprocessor>>>,
    samples_seen:  usize,
}

impl SensorPipeline {
    pub fn new(config: PipelineConfig, format: DeviceFormat) -> Self {
        let windows       = Sensor::ALL.iter().map(|_| Window::new(config.window_length)).collect();
        let preprocessors = Sensor::ALL.iter().map(|_| Vec::new()).collect();
        Self { config, format, windows, preprocessors, samples_seen: 0 }
    }

    /// Replace the preprocessing chain of one sensor
    pub fn with_preprocessors(mut self, sensor: Sensor, chain: Vec<Box<dyn Preprocessor>>) -> Self {
        self.preprocessors[sensor.feature_index()] = chain;
        self
    }

    /// Feed one reading; returns a window when an inference is due.
    pub fn push(&mut self, reading: &SensorReading) -> Option<SensorWindow> {
        self.samples_seen += 1;
        for (window, value) in self.windows.iter_mut().zip(reading.magnitudes(self.format)) {
            window.push(value);
        }

        if self.samples_seen % self.config.inference_stride() != 0 {
            return None;
        }
        if !self.windows.iter().all(Window::is_full) {
            return None;
        }
        Some(self.snapshot())
    }

    /// Feed a whole recording and collect every emitted window.
    pub fn run(&mut self, readings: &[SensorReading]) -> Vec<SensorWindow> {
        let windows: Vec<SensorWindow> = readings.iter().filter_map(|r| self.push(r)).collect();
        tracing::debug!(
            "Segmented {} readings into {} windows (stride {})",
            readings.len(),
            windows.len(),
            self.config.inference_stride()
        );
        windows
    }

    fn snapshot(&self) -> SensorWindow {
        // (features × T), one preprocessed row per sensor
        let per_sensor: Vec<Vec<f32>> = self
            .windows
            .iter()
            .zip(&self.preprocessors)
            .map(|(window, chain)| apply_all(chain, window.values()))
            .collect();

        let values = (0..self.config.window_length)
            .map(|t| per_sensor.iter().map(|row| row[t]).collect())
            .collect();

        SensorWindow::new(self.samples_seen, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::preprocessor::{StandardScaler, StandardScalerConfig};
    use crate::domain::sensor::Triaxial;

    fn reading(v: f32) -> SensorReading {
        SensorReading::new(
            Triaxial::new(v, 0.0, 0.0),
            Triaxial::new(0.0, 2.0 * v, 0.0),
            Triaxial::new(0.0, 0.0, 3.0 * v),
        )
    }

    fn small_config() -> PipelineConfig {
        PipelineConfig { inference_interval: 0.02, sample_interval: 0.01, window_length: 4 }
    }

    #[test]
    fn test_default_stride_is_fifty_readings() {
        assert_eq!(PipelineConfig::default().inference_stride(), 50);
    }

    #[test]
    fn test_emits_on_stride_once_windows_are_full() {
        let mut pipeline = SensorPipeline::new(small_config(), DeviceFormat::Android);
        let readings: Vec<_> = (1..=10).map(|v| reading(v as f32)).collect();

        let windows = pipeline.run(&readings);
        let ends: Vec<usize> = windows.iter().map(|w| w.end_sample).collect();
        assert_eq!(ends, vec![4, 6, 8, 10]);
    }

    #[test]
    fn test_window_is_time_major() {
        let mut pipeline = SensorPipeline::new(small_config(), DeviceFormat::Android);
        let readings: Vec<_> = (1..=4).map(|v| reading(v as f32)).collect();

        let windows = pipeline.run(&readings);
        let last    = windows.last().unwrap();
        assert_eq!(last.values.len(), 4);
        assert_eq!(last.values[0], vec![1.0, 2.0, 3.0]);
        assert_eq!(last.values[3], vec![4.0, 8.0, 12.0]);
    }

    #[test]
    fn test_preprocessors_apply_per_sensor() {
        let scaler = StandardScaler::new(StandardScalerConfig {
            scales: vec![2.0; 4],
            means:  vec![0.0; 4],
        });
        let mut pipeline = SensorPipeline::new(small_config(), DeviceFormat::Android)
            .with_preprocessors(Sensor::GyrMag, vec![Box::new(scaler)]);

        let readings: Vec<_> = (1..=4).map(|v| reading(v as f32)).collect();
        let windows = pipeline.run(&readings);
        // Only the gyroscope column is halved
        assert_eq!(windows[0].values[1], vec![2.0, 4.0, 3.0]);
    }

    #[test]
    fn test_nothing_emitted_before_first_full_window() {
        let mut pipeline = SensorPipeline::new(small_config(), DeviceFormat::Android);
        let readings: Vec<_> = (1..=3).map(|v| reading(v as f32)).collect();
        assert!(pipeline.run(&readings).is_empty());
    }
}
