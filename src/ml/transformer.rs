// ============================================================
// Layer 5 - Attention-based Builder
// ============================================================
// Transformer encoder for time-series classification, after
// the Keras "Timeseries classification with a Transformer
// model" example:
//
//   input [batch, T, F]
//     → num_transformer_blocks × EncoderBlock
//     → global average pooling over the feature axis  [batch, T]
//     → for each u in mlp_units: Dense(u, relu) → Dropout(mlp_dropout)
//     → Dense(output_classes, softmax)
//
// Each EncoderBlock is pre-norm with two residual branches:
//
//   res = x + Dropout(SelfAttention(LayerNorm(x)))
//   out = res + Conv1d(F, k=1)(Dropout(relu(Conv1d(ff_dim, k=1)(LayerNorm(res)))))
//
// The kernel-size-1 convolutions act as a position-wise
// feed-forward network over the features of each time step.
//
// Pooling averages channels-first, i.e. over the F features of
// every time step, so the MLP head sees T values per sample.

use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        Dropout, DropoutConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, softmax},
};

use crate::domain::shape::InputShape;
use crate::ml::{
    attention::{SelfAttention, SelfAttentionConfig},
    check_dropout, check_input, check_units,
    summary::LayerSummary,
    ModelConfigError, SequenceClassifier,
};

#[derive(Config, Debug)]
pub struct TransformerClassifierConfig {
    pub input_shape:            InputShape,
    pub output_classes:         usize,
    #[config(default = 100)]
    pub head_size:              usize,
    #[config(default = 5)]
    pub num_heads:              usize,
    #[config(default = 3)]
    pub ff_dim:                 usize,
    #[config(default = 4)]
    pub num_transformer_blocks: usize,
    #[config(default = "vec![128]")]
    pub mlp_units:              Vec<usize>,
    #[config(default = 0.4)]
    pub dropout:                f64,
    #[config(default = 0.25)]
    pub mlp_dropout:            f64,
    #[config(default = 1e-6)]
    pub epsilon:                f64,
}

impl TransformerClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TransformerClassifier<B> {
        let blocks: Vec<EncoderBlock<B>> = (0..self.num_transformer_blocks)
            .map(|_| self.build_encoder_block(device))
            .collect();

        // The pooled vector has one value per time step
        let mut d_in = self.input_shape.timesteps;
        let mut mlp  = Vec::with_capacity(self.mlp_units.len());
        for &units in &self.mlp_units {
            mlp.push(LinearConfig::new(d_in, units).init(device));
            d_in = units;
        }

        TransformerClassifier {
            blocks,
            mlp,
            mlp_dropout:    DropoutConfig::new(self.mlp_dropout).init(),
            output:         LinearConfig::new(d_in, self.output_classes).init(device),
            timesteps:      self.input_shape.timesteps,
            features:       self.input_shape.features,
            output_classes: self.output_classes,
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let features  = self.input_shape.features;
        let attention = SelfAttentionConfig::new(features, self.num_heads, self.head_size)
            .with_dropout(self.dropout)
            .init(device);
        let norm1    = LayerNormConfig::new(features).with_epsilon(self.epsilon).init(device);
        let norm2    = LayerNormConfig::new(features).with_epsilon(self.epsilon).init(device);
        let ff_conv1 = Conv1dConfig::new(features, self.ff_dim, 1).init(device);
        let ff_conv2 = Conv1dConfig::new(self.ff_dim, features, 1).init(device);
        let dropout  = DropoutConfig::new(self.dropout).init();
        EncoderBlock { norm1, attention, norm2, ff_conv1, ff_conv2, dropout }
    }

    pub fn validate(&self) -> Result<(), ModelConfigError> {
        check_input(self.input_shape, self.output_classes)?;
        check_units("attention head", self.head_size)?;
        check_units("attention heads", self.num_heads)?;
        check_units("feed-forward conv1d", self.ff_dim)?;
        for &units in &self.mlp_units {
            check_units("mlp dense", units)?;
        }
        check_dropout("dropout", self.dropout)?;
        check_dropout("mlp_dropout", self.mlp_dropout)
    }

    pub fn layers(&self) -> Vec<LayerSummary> {
        let seq      = self.input_shape.timesteps;
        let features = self.input_shape.features;
        let dropout  = self.dropout.to_string();

        let mut layers = Vec::new();
        for _ in 0..self.num_transformer_blocks {
            layers.extend([
                LayerSummary::new("LayerNorm", "", vec![seq, features]),
                LayerSummary::new(
                    "MultiHeadAttention",
                    format!("heads={}, head_size={}", self.num_heads, self.head_size),
                    vec![seq, features],
                ),
                LayerSummary::new("Dropout", dropout.clone(), vec![seq, features]),
                LayerSummary::new("Add", "", vec![seq, features]),
                LayerSummary::new("LayerNorm", "", vec![seq, features]),
                LayerSummary::new("Conv1d", format!("{}, k=1, relu", self.ff_dim), vec![seq, self.ff_dim]),
                LayerSummary::new("Dropout", dropout.clone(), vec![seq, self.ff_dim]),
                LayerSummary::new("Conv1d", format!("{features}, k=1"), vec![seq, features]),
                LayerSummary::new("Add", "", vec![seq, features]),
            ]);
        }

        layers.push(LayerSummary::new("GlobalAvgPool1d", "channels_first", vec![seq]));
        for &units in &self.mlp_units {
            layers.push(LayerSummary::new("Dense", format!("{units}, relu"), vec![units]));
            layers.push(LayerSummary::new("Dropout", self.mlp_dropout.to_string(), vec![units]));
        }
        layers.push(LayerSummary::new(
            "Dense",
            format!("{}, softmax", self.output_classes),
            vec![self.output_classes],
        ));
        layers
    }
}

/// Build the transformer classifier with default hyperparameters.
/// Use `TransformerClassifierConfig` directly to change them.
pub fn make_transformer<B: Backend>(
    input_shape:    InputShape,
    output_classes: usize,
    device:         &B::Device,
) -> TransformerClassifier<B> {
    TransformerClassifierConfig::new(input_shape, output_classes).init(device)
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub norm1:     LayerNorm<B>,
    pub attention: SelfAttention<B>,
    pub norm2:     LayerNorm<B>,
    pub ff_conv1:  Conv1d<B>,
    pub ff_conv2:  Conv1d<B>,
    pub dropout:   Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    pub fn forward(&self, inputs: Tensor<B, 3>) -> Tensor<B, 3> {
        let x   = self.attention.forward(self.norm1.forward(inputs.clone()));
        let res = self.dropout.forward(x) + inputs;

        // Conv1d is channels-first: [batch, features, seq]
        let x = self.norm2.forward(res.clone()).swap_dims(1, 2);
        let x = self.dropout.forward(relu(self.ff_conv1.forward(x)));
        let x = self.ff_conv2.forward(x).swap_dims(1, 2);
        x + res
    }
}

#[derive(Module, Debug)]
pub struct TransformerClassifier<B: Backend> {
    pub blocks:         Vec<EncoderBlock<B>>,
    pub mlp:            Vec<Linear<B>>,
    pub mlp_dropout:    Dropout,
    pub output:         Linear<B>,
    pub timesteps:      usize,
    pub features:       usize,
    pub output_classes: usize,
}

impl<B: Backend> TransformerClassifier<B> {
    /// input: [batch, timesteps, features] → [batch, output_classes]
    pub fn forward(&self, input: Tensor<B, 3>) -> Tensor<B, 2> {
        let mut x = input;
        for block in &self.blocks {
            x = block.forward(x);
        }

        let [batch, timesteps, _] = x.dims();
        let mut x: Tensor<B, 2> = x.mean_dim(2).reshape([batch, timesteps]);

        for dense in &self.mlp {
            x = self.mlp_dropout.forward(relu(dense.forward(x)));
        }
        softmax(self.output.forward(x), 1)
    }
}

impl<B: Backend> SequenceClassifier<B> for TransformerClassifier<B> {
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

    fn small_config() -> TransformerClassifierConfig {
        TransformerClassifierConfig::new(InputShape::new(10, 3), 9)
            .with_head_size(4)
            .with_num_heads(2)
    }

    #[test]
    fn test_output_is_softmax_over_classes() {
        let device = Default::default();
        let model  = small_config().init::<TestBackend>(&device);

        let out = model.forward(Tensor::ones([2, 10, 3], &device));
        assert_eq!(out.dims(), [2, 9]);

        let sums = out.sum_dim(1).into_data().to_vec::<f32>().unwrap();
        for s in sums {
            assert!((s - 1.0).abs() < 1e-4, "row sums to {s}");
        }
    }

    #[test]
    fn test_default_builder_output_shape() {
        let device = Default::default();
        let model  = make_transformer::<TestBackend>(InputShape::new(8, 3), 4, &device);

        assert_eq!(model.blocks.len(), 4);
        assert_eq!(model.mlp.len(), 1);
        let out = model.forward(Tensor::zeros([1, 8, 3], &device));
        assert_eq!(out.dims(), [1, 4]);
    }

    #[test]
    fn test_block_count_follows_config() {
        let device = Default::default();
        for blocks in [0, 1, 3] {
            let cfg   = small_config().with_num_transformer_blocks(blocks);
            let model = cfg.init::<TestBackend>(&device);
            assert_eq!(model.blocks.len(), blocks);
            assert_eq!(
                cfg.layers().iter().filter(|l| l.name == "MultiHeadAttention").count(),
                blocks
            );
        }
    }

    #[test]
    fn test_mlp_stack_follows_config() {
        let device = Default::default();
        for units in [vec![], vec![32], vec![64, 32, 16]] {
            let cfg   = small_config().with_mlp_units(units.clone());
            let model = cfg.init::<TestBackend>(&device);
            assert_eq!(model.mlp.len(), units.len());

            // Hidden dense layers plus the softmax head
            let dense = cfg.layers().iter().filter(|l| l.name == "Dense").count();
            assert_eq!(dense, units.len() + 1);

            let out = model.forward(Tensor::zeros([1, 10, 3], &device));
            assert_eq!(out.dims(), [1, 9]);
        }
    }

    #[test]
    fn test_pooling_yields_one_value_per_timestep() {
        let cfg    = small_config();
        let layers = cfg.layers();
        let pool   = layers.iter().find(|l| l.name == "GlobalAvgPool1d").unwrap();
        assert_eq!(pool.output_shape, vec![10]);
    }

    #[test]
    fn test_topology_is_deterministic() {
        let device = Default::default();
        let a = small_config();
        let b = small_config();
        assert_eq!(a.layers(), b.layers());
        assert_eq!(
            a.init::<TestBackend>(&device).num_params(),
            b.init::<TestBackend>(&device).num_params()
        );
    }

    #[test]
    fn test_defaults_follow_reference_architecture() {
        let cfg = TransformerClassifierConfig::new(InputShape::new(500, 3), 9);
        assert_eq!(cfg.head_size, 100);
        assert_eq!(cfg.num_heads, 5);
        assert_eq!(cfg.ff_dim, 3);
        assert_eq!(cfg.num_transformer_blocks, 4);
        assert_eq!(cfg.mlp_units, vec![128]);
        assert_eq!(cfg.dropout, 0.4);
        assert_eq!(cfg.mlp_dropout, 0.25);
        assert!(cfg.validate().is_ok());
    }
}
