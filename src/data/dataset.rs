use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One model-ready window: `values[t][feature]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorWindow {
    /// Number of readings consumed when this window was emitted
    pub end_sample: usize,
    pub values:     Vec<Vec<f32>>,
}

impl SensorWindow {
    pub fn new(end_sample: usize, values: Vec<Vec<f32>>) -> Self {
        Self { end_sample, values }
    }

    pub fn timesteps(&self) -> usize { self.values.len() }

    pub fn features(&self) -> usize {
        self.values.first().map_or(0, Vec::len)
    }
}

pub struct WindowDataset {
    windows: Vec<SensorWindow>,
}

impl WindowDataset {
    pub fn new(windows: Vec<SensorWindow>) -> Self { Self { windows } }
}

impl Dataset<SensorWindow> for WindowDataset {
    fn get(&self, index: usize) -> Option<SensorWindow> {
        self.windows.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.windows.len()
    }
}
