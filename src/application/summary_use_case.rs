// ============================================================
// Layer 2 - SummaryUseCase
// ============================================================
// Builds the requested architecture on the CPU backend and
// reports its layer table and parameter count. Nothing is
// written to disk.

use anyhow::Result;
use burn::module::Module;

use crate::ml::{summary::ModelSummary, CpuBackend, ModelConfig};

pub struct SummaryUseCase {
    config: ModelConfig,
}

impl SummaryUseCase {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<ModelSummary> {
        self.config.validate()?;

        let device = Default::default();
        let num_params = match &self.config {
            ModelConfig::Lstm(c)        => c.init::<CpuBackend>(&device).num_params(),
            ModelConfig::ConvLstm(c)    => c.init::<CpuBackend>(&device).num_params(),
            ModelConfig::Transformer(c) => c.init::<CpuBackend>(&device).num_params(),
        };

        tracing::info!(
            "Built {} model for input {} with {} parameters",
            self.config.architecture(),
            self.config.input_shape(),
            num_params
        );

        Ok(ModelSummary {
            architecture: self.config.architecture(),
            input_shape:  self.config.input_shape(),
            layers:       self.config.layers(),
            num_params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use crate::domain::shape::InputShape;
    use crate::ml::{
        conv_lstm::ConvLstmConfig, lstm::LstmClassifierConfig,
        transformer::TransformerClassifierConfig, Architecture,
    };

    #[test]
    fn test_summary_output_matches_class_count() {
        let shape = InputShape::new(30, 3);
        let cases = [
            (ModelConfig::Lstm(LstmClassifierConfig::new(shape, 9)), vec![9]),
            (ModelConfig::ConvLstm(ConvLstmConfig::new(shape, 9)), vec![1]),
            (
                ModelConfig::Transformer(
                    TransformerClassifierConfig::new(shape, 7).with_num_transformer_blocks(1),
                ),
                vec![7],
            ),
        ];

        for (cfg, expected) in cases {
            let summary = SummaryUseCase::new(cfg).execute().unwrap();
            assert_eq!(summary.output_shape(), expected.as_slice());
            assert!(summary.num_params > 0);
        }
    }

    #[test]
    fn test_identical_arguments_give_identical_summaries() {
        let cfg = ModelConfig::ConvLstm(ConvLstmConfig::new(InputShape::new(40, 3), 1));
        let a = SummaryUseCase::new(cfg.clone()).execute().unwrap();
        let b = SummaryUseCase::new(cfg).execute().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.architecture, Architecture::ConvLstm);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_building() {
        let cfg = ModelConfig::Lstm(LstmClassifierConfig::new(InputShape::new(30, 3), 0));
        assert!(SummaryUseCase::new(cfg).execute().is_err());
    }
}
