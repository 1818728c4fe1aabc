// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores models using Burn's CompactRecorder.
//
// What gets saved:
//   1. model_config.json - which builder and hyperparameters
//   2. model.mpk         - all parameters of the built model
//
// Why save the config separately?
//   A record only holds parameter values. To load it we first
//   need an identically shaped model, so the config is read
//   back and handed to the same builder before the weights are
//   loaded into it.
//
// Burn's CompactRecorder:
//   - Serialises parameters to MessagePack
//   - Stores floats in half precision
//   - Type-safe: loading fails if the architecture doesn't match
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::ml::ModelConfig;

const CONFIG_FILE: &str = "model_config.json";
const MODEL_FILE:  &str = "model";

/// Manages saving and loading of a model checkpoint.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save the parameters of any built model.
    /// The recorder appends its own extension to the file name.
    pub fn save_model<B: Backend, M: Module<B>>(&self, model: &M) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(MODEL_FILE);
        Recorder::<B>::record(&CompactRecorder::new(), model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        tracing::debug!("Saved model weights to '{}'", path.display());
        Ok(())
    }

    /// Load saved parameters into a freshly built model of the same shape.
    pub fn load_model<B: Backend, M: Module<B>>(&self, model: M, device: &B::Device) -> Result<M> {
        let path = self.dir.join(MODEL_FILE);

        let record: M::Record = Recorder::<B>::load(&CompactRecorder::new(), path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load checkpoint '{}'. Have you run 'init' first?",
                    path.display()
                )
            })?;

        tracing::info!("Loaded model weights from '{}'", path.display());
        Ok(model.load_record(record))
    }

    pub fn save_config(&self, cfg: &ModelConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Cannot create '{}'", self.dir.display()))?;

        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved model config to '{}'", path.display());
        Ok(())
    }

    pub fn load_config(&self) -> Result<ModelConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'init' first.",
                path.display()
            )
        })?;

        serde_json::from_str(&json)
            .with_context(|| format!("Invalid model config in '{}'", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    use crate::domain::shape::InputShape;
    use crate::ml::lstm::LstmClassifierConfig;

    type TestBackend = NdArray;

    #[test]
    fn test_config_round_trip() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let cfg  = ModelConfig::Lstm(
            LstmClassifierConfig::new(InputShape::new(50, 3), 9).with_hidden_units(16),
        );

        ckpt.save_config(&cfg).unwrap();
        match ckpt.load_config().unwrap() {
            ModelConfig::Lstm(back) => {
                assert_eq!(back.hidden_units, 16);
                assert_eq!(back.input_shape, InputShape::new(50, 3));
            }
            other => panic!("unexpected architecture {}", other.architecture()),
        }
    }

    #[test]
    fn test_model_weights_round_trip() {
        let dir    = tempfile::tempdir().unwrap();
        let ckpt   = CheckpointManager::new(dir.path());
        let device = Default::default();
        let cfg    = LstmClassifierConfig::new(InputShape::new(5, 3), 4).with_hidden_units(8);

        let saved = cfg.init::<TestBackend>(&device);
        ckpt.save_model::<TestBackend, _>(&saved).unwrap();
        assert!(dir.path().join("model.mpk").exists());

        let loaded = ckpt.load_model::<TestBackend, _>(cfg.init::<TestBackend>(&device), &device).unwrap();
        let input  = Tensor::<TestBackend, 3>::ones([1, 5, 3], &device);
        let a = saved.forward(input.clone()).into_data().to_vec::<f32>().unwrap();
        let b = loaded.forward(input).into_data().to_vec::<f32>().unwrap();

        // Half-precision storage
        for (x, y) in a.iter().zip(&b) {
            assert!((x - y).abs() < 1e-2);
        }
    }

    #[test]
    fn test_missing_checkpoint_is_an_error() {
        let dir  = tempfile::tempdir().unwrap();
        let ckpt = CheckpointManager::new(dir.path());
        let err  = ckpt.load_config().unwrap_err();
        assert!(err.to_string().contains("init"));
        assert!(ckpt.load_model::<TestBackend, _>(
            LstmClassifierConfig::new(InputShape::new(5, 3), 4).init::<TestBackend>(&Default::default()),
            &Default::default(),
        ).is_err());
    }
}
