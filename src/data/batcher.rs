// ============================================================
// Layer 4 - Window Batcher
// ============================================================
// Implements Burn's Batcher trait to stack SensorWindows into
// one tensor for the forward pass.
//
//   Input:  Vec of N windows, each T rows of F values
//   Output: WindowBatch with inputs of shape [N, T, F]
//
// All windows coming out of the pipeline share the same
// (T, F), so stacking is a flatten followed by a reshape.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
    tensor::TensorData,
};

use crate::data::dataset::SensorWindow;

#[derive(Debug, Clone)]
pub struct WindowBatch<B: Backend> {
    /// Stacked windows: [batch_size, timesteps, features]
    pub inputs: Tensor<B, 3>,

    /// `end_sample` of each window, in batch order
    pub end_samples: Vec<usize>,
}

#[derive(Clone, Debug)]
pub struct WindowBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> WindowBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SensorWindow, WindowBatch<B>> for WindowBatcher<B> {
    fn batch(&self, items: Vec<SensorWindow>) -> WindowBatch<B> {
        let batch_size = items.len();
        let timesteps  = items.first().map_or(0, SensorWindow::timesteps);
        let features   = items.first().map_or(0, SensorWindow::features);

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|w| w.values.iter().flatten().copied())
            .collect();

        let inputs = Tensor::<B, 3>::from_data(
            TensorData::new(flat, [batch_size, timesteps, features]),
            &self.device,
        );
        let end_samples = items.iter().map(|w| w.end_sample).collect();

        WindowBatch { inputs, end_samples }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_stacks_windows_in_order() {
        let batcher = WindowBatcher::<TestBackend>::new(Default::default());
        let a = SensorWindow::new(500, vec![vec![1.0, 2.0, 3.0]; 2]);
        let b = SensorWindow::new(550, vec![vec![4.0, 5.0, 6.0]; 2]);

        let batch = batcher.batch(vec![a, b]);
        assert_eq!(batch.inputs.dims(), [2, 2, 3]);
        assert_eq!(batch.end_samples, vec![500, 550]);

        let values = batch.inputs.into_data().to_vec::<f32>().unwrap();
        assert_eq!(&values[..3], &[1.0, 2.0, 3.0]);
        assert_eq!(&values[6..9], &[4.0, 5.0, 6.0]);
    }
}
