// ============================================================
// Layer 5 - Recurrent-only Builder
// ============================================================
// Basic LSTM classifier without a convolutional encoder:
//
//   input [batch, T, F]
//     → LSTM(hidden_units), keep the final hidden state
//     → Dropout(dropout)          (LSTMs overfit quickly)
//     → Dense(dense_units, relu)
//     → Dense(output_classes, softmax)
//   output [batch, output_classes]

use burn::{
    nn::{
        lstm::{Lstm, LstmConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, softmax},
};

use crate::domain::shape::InputShape;
use crate::ml::{
    check_dropout, check_input, check_units,
    summary::LayerSummary,
    ModelConfigError, SequenceClassifier,
};

#[derive(Config, Debug)]
pub struct LstmClassifierConfig {
    pub input_shape:    InputShape,
    pub output_classes: usize,
    #[config(default = 100)]
    pub hidden_units:   usize,
    #[config(default = 0.5)]
    pub dropout:        f64,
    #[config(default = 100)]
    pub dense_units:    usize,
}

impl LstmClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LstmClassifier<B> {
        let lstm    = LstmConfig::new(self.input_shape.features, self.hidden_units, true).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        let hidden  = LinearConfig::new(self.hidden_units, self.dense_units).init(device);
        let output  = LinearConfig::new(self.dense_units, self.output_classes).init(device);
        LstmClassifier {
            lstm, dropout, hidden, output,
            timesteps:      self.input_shape.timesteps,
            features:       self.input_shape.features,
            output_classes: self.output_classes,
        }
    }

    pub fn validate(&self) -> Result<(), ModelConfigError> {
        check_input(self.input_shape, self.output_classes)?;
        check_units("lstm", self.hidden_units)?;
        check_units("dense", self.dense_units)?;
        check_dropout("dropout", self.dropout)
    }

    pub fn layers(&self) -> Vec<LayerSummary> {
        vec![
            LayerSummary::new("Lstm", self.hidden_units.to_string(), vec![self.hidden_units]),
            LayerSummary::new("Dropout", self.dropout.to_string(), vec![self.hidden_units]),
            LayerSummary::new("Dense", format!("{}, relu", self.dense_units), vec![self.dense_units]),
            LayerSummary::new(
                "Dense",
                format!("{}, softmax", self.output_classes),
                vec![self.output_classes],
            ),
        ]
    }
}

/// Build the recurrent-only classifier with default hyperparameters.
pub fn make_lstm<B: Backend>(
    input_shape:    InputShape,
    output_classes: usize,
    device:         &B::Device,
) -> LstmClassifier<B> {
    LstmClassifierConfig::new(input_shape, output_classes).init(device)
}

#[derive(Module, Debug)]
pub struct LstmClassifier<B: Backend> {
    pub lstm:           Lstm<B>,
    pub dropout:        Dropout,
    pub hidden:         Linear<B>,
    pub output:         Linear<B>,
    pub timesteps:      usize,
    pub features:       usize,
    pub output_classes: usize,
}

impl<B: Backend> LstmClassifier<B> {
    /// input: [batch, timesteps, features] → [batch, output_classes]
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let (_, state) = self.lstm.forward(input, None);
        let x = self.dropout.forward(state.hidden);
        let x = relu(self.hidden.forward(x));
        softmax(self.output.forward(x), 1)
    }
}

impl<B: Backend> SequenceClassifier<B> for LstmClassifier<B> {
    fn probabilities(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        self.forward(input)
    }

    fn input_shape(&self) -> InputShape {
        InputShape::new(self.timesteps, self.features)
    }

    fn output_units(&self) -> usize {
        self.output_classes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use pretty_assertions::assert_eq;

    type TestBackend = NdArray;

    #[test]
    fn test_output_matches_class_count() {
        let device = Default::default();
        let model  = make_lstm::<TestBackend>(InputShape::new(20, 3), 9, &device);

        let out = model.forward(Tensor::zeros([4, 20, 3], &device));
        assert_eq!(out.dims(), [4, 9]);
    }

    #[test]
    fn test_rows_are_probability_distributions() {
        let device = Default::default();
        let model  = make_lstm::<TestBackend>(InputShape::new(12, 3), 5, &device);

        let input  = Tensor::<TestBackend, 3>::ones([2, 12, 3], &device);
        let sums   = model.forward(input).sum_dim(1).into_data().to_vec::<f32>().unwrap();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-4, "row sums to {s}");
        }
    }

    #[test]
    fn test_topology_is_deterministic() {
        let a = LstmClassifierConfig::new(InputShape::new(500, 3), 9);
        let b = LstmClassifierConfig::new(InputShape::new(500, 3), 9);
        assert_eq!(a.layers(), b.layers());

        let device = Default::default();
        let m1 = a.init::<TestBackend>(&device);
        let m2 = b.init::<TestBackend>(&device);
        assert_eq!(m1.num_params(), m2.num_params());
    }

    #[test]
    fn test_defaults_follow_reference_architecture() {
        let cfg = LstmClassifierConfig::new(InputShape::new(500, 3), 9);
        assert_eq!(cfg.hidden_units, 100);
        assert_eq!(cfg.dropout, 0.5);
        assert_eq!(cfg.dense_units, 100);
        assert_eq!(cfg.layers().last().unwrap().output_shape, vec![9]);
    }
}
