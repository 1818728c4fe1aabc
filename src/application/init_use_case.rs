// ============================================================
// Layer 2 - InitUseCase
// ============================================================
// Builds a model with freshly initialised weights and stores
// it as a checkpoint:
//
//   Step 1: Validate the configuration     (Layer 5 - ml)
//   Step 2: Build the model                (Layer 5 - ml)
//   Step 3: Save config + weights          (Layer 6 - infra)
//
// The checkpoint is what `classify` loads, whether the weights
// came from here or were produced elsewhere with the same
// architecture.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::infra::checkpoint::CheckpointManager;
use crate::ml::{CpuBackend, ModelConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitConfig {
    pub model:          ModelConfig,
    pub checkpoint_dir: String,
}

pub struct InitUseCase {
    config: InitConfig,
}

impl InitUseCase {
    pub fn new(config: InitConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;
        cfg.model.validate()?;

        let ckpt   = CheckpointManager::new(&cfg.checkpoint_dir);
        let device = Default::default();

        match &cfg.model {
            ModelConfig::Lstm(c) => {
                ckpt.save_model::<CpuBackend, _>(&c.init::<CpuBackend>(&device))?
            }
            ModelConfig::ConvLstm(c) => {
                ckpt.save_model::<CpuBackend, _>(&c.init::<CpuBackend>(&device))?
            }
            ModelConfig::Transformer(c) => {
                ckpt.save_model::<CpuBackend, _>(&c.init::<CpuBackend>(&device))?
            }
        }
        ckpt.save_config(&cfg.model)?;

        tracing::info!(
            "Initialised {} model in '{}'",
            cfg.model.architecture(),
            cfg.checkpoint_dir
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shape::InputShape;
    use crate::ml::{lstm::LstmClassifierConfig, Architecture};

    #[test]
    fn test_writes_a_loadable_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let config = InitConfig {
            model: ModelConfig::Lstm(
                LstmClassifierConfig::new(InputShape::new(10, 3), 9).with_hidden_units(8),
            ),
            checkpoint_dir: dir.path().to_string_lossy().into_owned(),
        };

        InitUseCase::new(config).execute().unwrap();

        let ckpt = CheckpointManager::new(dir.path());
        let back = ckpt.load_config().unwrap();
        assert_eq!(back.architecture(), Architecture::Lstm);
    }
}
