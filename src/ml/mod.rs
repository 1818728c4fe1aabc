// ============================================================
// Layer 5 - ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer builds tensors or modules directly.
//
// What's in this layer:
//
//   lstm.rs        - Recurrent-only builder
//                    LSTM → Dropout → Dense(relu) → Dense(softmax)
//
//   conv_lstm.rs   - Convolutional + recurrent builder
//                    Conv1d(relu) → LSTM → Dense → Dense(sigmoid)
//
//   transformer.rs - Attention-based builder
//                    N × encoder block → pooling → MLP → softmax
//
//   attention.rs   - Multi-head self-attention with a free key
//                    size per head (used by the encoder blocks)
//
//   summary.rs     - Layer-by-layer topology description
//
//   classifier.rs  - Runs a built model and ranks its outputs
//
// Every builder is a thin front-end over Burn's `Config::init`:
// it only chooses layers and hyperparameters. Shape errors are
// whatever Burn raises; `ModelConfig::validate` catches the
// common ones up front with a typed error.
//
// Reference: Burn Book §3 (Building Blocks)

/// Recurrent-only sequence classifier
pub mod lstm;

/// Convolutional feature extractor feeding an LSTM
pub mod conv_lstm;

/// Self-attention encoder stack with an MLP head
pub mod transformer;

/// Multi-head self-attention used by the transformer blocks
pub mod attention;

/// Topology summaries (layer names and output shapes)
pub mod summary;

/// Inference wrapper that turns model outputs into predictions
pub mod classifier;

use burn::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::shape::InputShape;
use conv_lstm::ConvLstmConfig;
use lstm::LstmClassifierConfig;
use summary::LayerSummary;
use transformer::TransformerClassifierConfig;

/// Backend used for building, summarising and CPU inference
pub type CpuBackend = burn::backend::NdArray;

/// Backend used when inference runs on the GPU
pub type GpuBackend = burn::backend::Wgpu;

/// Where inference runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accelerator {
    /// NdArray backend
    #[default]
    Cpu,
    /// Wgpu backend
    Gpu,
}

// ─── SequenceClassifier ───────────────────────────────────────────────────────
/// Shared surface of every model built here.
///
/// input:  [batch, timesteps, features]
/// output: [batch, output_units] probabilities
pub trait SequenceClassifier<B: Backend>: Module<B> {
    fn probabilities(&self, input: Tensor<B, 3>) -> Tensor<B, 2>;

    /// The per-sample shape the model was built for
    fn input_shape(&self) -> InputShape;

    /// Width of the probability output
    fn output_units(&self) -> usize;
}

// ─── Architecture ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Architecture {
    Lstm,
    ConvLstm,
    Transformer,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Architecture::Lstm        => "lstm",
            Architecture::ConvLstm    => "conv-lstm",
            Architecture::Transformer => "transformer",
        };
        f.write_str(s)
    }
}

// ─── ModelConfig ──────────────────────────────────────────────────────────────
// One of the three builder configurations. Serialised with an
// "architecture" tag so a checkpoint directory records which
// builder to call before loading weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "architecture", rename_all = "snake_case")]
pub enum ModelConfig {
    Lstm(LstmClassifierConfig),
    ConvLstm(ConvLstmConfig),
    Transformer(TransformerClassifierConfig),
}

impl ModelConfig {
    pub fn architecture(&self) -> Architecture {
        match self {
            ModelConfig::Lstm(_)        => Architecture::Lstm,
            ModelConfig::ConvLstm(_)    => Architecture::ConvLstm,
            ModelConfig::Transformer(_) => Architecture::Transformer,
        }
    }

    pub fn input_shape(&self) -> InputShape {
        match self {
            ModelConfig::Lstm(c)        => c.input_shape,
            ModelConfig::ConvLstm(c)    => c.input_shape,
            ModelConfig::Transformer(c) => c.input_shape,
        }
    }

    /// Layer topology implied by this configuration
    pub fn layers(&self) -> Vec<LayerSummary> {
        match self {
            ModelConfig::Lstm(c)        => c.layers(),
            ModelConfig::ConvLstm(c)    => c.layers(),
            ModelConfig::Transformer(c) => c.layers(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelConfigError> {
        match self {
            ModelConfig::Lstm(c)        => c.validate(),
            ModelConfig::ConvLstm(c)    => c.validate(),
            ModelConfig::Transformer(c) => c.validate(),
        }
    }
}

// ─── ModelConfigError ─────────────────────────────────────────────────────────
#[derive(Debug, Error, PartialEq)]
pub enum ModelConfigError {
    #[error("input shape {0} has an empty dimension")]
    EmptyInputShape(InputShape),

    #[error("a classifier needs at least one output class")]
    NoOutputClasses,

    #[error("{layer} must have at least one unit")]
    ZeroUnits { layer: &'static str },

    #[error("{name} must be in [0, 1), got {value}")]
    InvalidDropout { name: &'static str, value: f64 },

    #[error("kernel size {kernel_size} is longer than the {timesteps} input time steps")]
    KernelTooLong { kernel_size: usize, timesteps: usize },
}

pub(crate) fn check_input(shape: InputShape, output_classes: usize) -> Result<(), ModelConfigError> {
    if shape.is_empty() {
        return Err(ModelConfigError::EmptyInputShape(shape));
    }
    if output_classes == 0 {
        return Err(ModelConfigError::NoOutputClasses);
    }
    Ok(())
}

pub(crate) fn check_units(layer: &'static str, units: usize) -> Result<(), ModelConfigError> {
    if units == 0 {
        return Err(ModelConfigError::ZeroUnits { layer });
    }
    Ok(())
}

pub(crate) fn check_dropout(name: &'static str, value: f64) -> Result<(), ModelConfigError> {
    if !(0.0..1.0).contains(&value) {
        return Err(ModelConfigError::InvalidDropout { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_records_architecture() {
        let cfg = ModelConfig::ConvLstm(ConvLstmConfig::new(InputShape::new(500, 3), 1));
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(json["architecture"], "conv_lstm");

        let back: ModelConfig = serde_json::from_value(json).unwrap();
        assert_eq!(back.architecture(), Architecture::ConvLstm);
        assert_eq!(back.input_shape(), InputShape::new(500, 3));
    }

    #[test]
    fn test_validate_rejects_empty_shape() {
        let cfg = ModelConfig::Lstm(LstmClassifierConfig::new(InputShape::new(0, 3), 9));
        assert_eq!(
            cfg.validate(),
            Err(ModelConfigError::EmptyInputShape(InputShape::new(0, 3)))
        );
    }

    #[test]
    fn test_validate_rejects_bad_dropout() {
        let cfg = ModelConfig::Transformer(
            TransformerClassifierConfig::new(InputShape::new(50, 3), 9).with_dropout(1.0),
        );
        assert!(matches!(
            cfg.validate(),
            Err(ModelConfigError::InvalidDropout { name: "dropout", .. })
        ));
    }

    #[test]
    fn test_architecture_display_matches_cli_names() {
        assert_eq!(Architecture::ConvLstm.to_string(), "conv-lstm");
        assert_eq!(Architecture::Transformer.to_string(), "transformer");
    }
}
