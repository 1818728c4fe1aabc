// ============================================================
// Layer 5 - Convolutional + Recurrent Builder
// ============================================================
// A 1-D convolution extracts local (non-shallow) features from
// the raw sequence before the LSTM classifies it:
//
//   input [batch, T, F]
//     → Conv1d(filters, kernel_size, relu)   [batch, T-k+1, filters]
//     → LSTM(lstm_units), final hidden state  [batch, lstm_units]
//     → Dense(dense_units)                    (linear)
//     → Dense(1, sigmoid)
//   output [batch, 1]
//
// Burn's Conv1d works channels-first ([batch, channels, length])
// so the sequence is transposed around the convolution.
// The head is a single binary unit; `output_classes` is kept in
// the config so all three builders share one signature.

use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        lstm::{Lstm, LstmConfig},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

use crate::domain::shape::InputShape;
use crate::ml::{
    check_input, check_units,
    summary::LayerSummary,
    ModelConfigError, SequenceClassifier,
};

#[derive(Config, Debug)]
pub struct ConvLstmConfig {
    pub input_shape:    InputShape,
    pub output_classes: usize,
    #[config(default = 64)]
    pub filters:        usize,
    #[config(default = 3)]
    pub kernel_size:    usize,
    #[config(default = 128)]
    pub lstm_units:     usize,
    #[config(default = 64)]
    pub dense_units:    usize,
}

impl ConvLstmConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ConvLstmClassifier<B> {
        let conv   = Conv1dConfig::new(self.input_shape.features, self.filters, self.kernel_size)
            .init(device);
        let lstm   = LstmConfig::new(self.filters, self.lstm_units, true).init(device);
        let hidden = LinearConfig::new(self.lstm_units, self.dense_units).init(device);
        let output = LinearConfig::new(self.dense_units, 1).init(device);
        ConvLstmClassifier {
            conv, lstm, hidden, output,
            timesteps: self.input_shape.timesteps,
            features:  self.input_shape.features,
        }
    }

    pub fn validate(&self) -> Result<(), ModelConfigError> {
        check_input(self.input_shape, self.output_classes)?;
        check_units("conv1d", self.filters)?;
        check_units("conv1d kernel", self.kernel_size)?;
        check_units("lstm", self.lstm_units)?;
        check_units("dense", self.dense_units)?;
        if self.kernel_size > self.input_shape.timesteps {
            return Err(ModelConfigError::KernelTooLong {
                kernel_size: self.kernel_size,
                timesteps:   self.input_shape.timesteps,
            });
        }
        Ok(())
    }

    /// Sequence length after the valid-padded convolution
    pub fn conv_output_len(&self) -> usize {
        (self.input_shape.timesteps + 1).saturating_sub(self.kernel_size)
    }

    pub fn layers(&self) -> Vec<LayerSummary> {
        vec![
            LayerSummary::new(
                "Conv1d",
                format!("{}, k={}, relu", self.filters, self.kernel_size),
                vec![self.conv_output_len(), self.filters],
            ),
            LayerSummary::new("Lstm", self.lstm_units.to_string(), vec![self.lstm_units]),
            LayerSummary::new("Dense", self.dense_units.to_string(), vec![self.dense_units]),
            LayerSummary::new("Dense", "1, sigmoid", vec![1]),
        ]
    }
}

/// Build the convolutional-recurrent binary classifier with default hyperparameters.
pub fn make_conv_lstm<B: Backend>(
    input_shape:    InputShape,
    output_classes: usize,
    device:         &B::Device,
) -> ConvLstmClassifier<B> {
    ConvLstmConfig::new(input_shape, output_classes).init(device)
}

#[derive(Module, Debug)]
pub struct ConvLstmClassifier<B: Backend> {
    pub conv:      Conv1d<B>,
    pub lstm:      Lstm<B>,
    pub hidden:    Linear<B>,
    pub output:    Linear<B>,
    pub timesteps: usize,
    pub features:  usize,
}

impl<B: Backend> ConvLstmClassifier<B> {
    /// input: [batch, timesteps, features] → [batch, 1]
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let x = relu(self.conv.forward(input.swap_dims(1, 2)));
        let (_, state) = self.lstm.forward(x.swap_dims(1, 2), None);
        let x = self.hidden.forward(state.hidden);
        sigmoid(self.output.forward(x))
    }
}

impl<B: Backend> SequenceClassifier<B> for ConvLstmClassifier<B> {
    fn probabilities(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        self.forward(input)
    }

    fn input_shape(&self) -> InputShape {
        InputShape::new(self.timesteps, self.features)
    }

    fn output_units(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use pretty_assertions::assert_eq;

    type TestBackend = NdArray;

    #[test]
    fn test_single_unit_output_in_unit_interval() {
        let device = Default::default();
        let model  = make_conv_lstm::<TestBackend>(InputShape::new(16, 3), 9, &device);

        let out = model.forward(Tensor::ones([3, 16, 3], &device));
        assert_eq!(out.dims(), [3, 1]);
        for p in out.into_data().to_vec::<f32>().unwrap() {
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn test_conv_shortens_sequence() {
        let cfg = ConvLstmConfig::new(InputShape::new(500, 3), 1);
        assert_eq!(cfg.conv_output_len(), 498);
        assert_eq!(cfg.layers()[0].output_shape, vec![498, 64]);
    }

    #[test]
    fn test_kernel_longer_than_sequence_is_rejected() {
        let cfg = ConvLstmConfig::new(InputShape::new(2, 3), 1);
        assert_eq!(
            cfg.validate(),
            Err(ModelConfigError::KernelTooLong { kernel_size: 3, timesteps: 2 })
        );
    }

    #[test]
    fn test_topology_is_deterministic() {
        let a = ConvLstmConfig::new(InputShape::new(100, 3), 1);
        let b = ConvLstmConfig::new(InputShape::new(100, 3), 1);
        assert_eq!(a.layers(), b.layers());

        let device = Default::default();
        assert_eq!(
            a.init::<TestBackend>(&device).num_params(),
            b.init::<TestBackend>(&device).num_params()
        );
    }
}
