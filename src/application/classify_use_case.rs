// ============================================================
// Layer 2 - ClassifyUseCase
// ============================================================
// Replays a sensor recording through the inference pipeline:
//
//   Step 1: Load model config              (Layer 6 - infra)
//   Step 2: Load the recording             (Layer 4 - data)
//   Step 3: Build per-sensor preprocessing (Layers 4 and 6)
//   Step 4: Segment into windows           (Layer 4 - data)
//   Step 5: Rebuild model, load weights    (Layers 5 and 6)
//   Step 6: Batch and classify windows     (Layers 4 and 5)
//
// The window length is taken from the model's input shape, so
// a checkpoint built for (500, 3) consumes 500-reading windows
// of the three sensor magnitudes.

use anyhow::{bail, Result};
use burn::{data::dataloader::DataLoaderBuilder, prelude::*};
use serde::{Deserialize, Serialize};

use crate::data::{
    batcher::WindowBatcher,
    dataset::{SensorWindow, WindowDataset},
    loader::RecordingLoader,
    preprocessor::MovingAverage,
    segmenter::{PipelineConfig, SensorPipeline},
};
use crate::domain::{
    activity::Prediction,
    sensor::{DeviceFormat, Sensor},
    traits::{Preprocessor, SampleSource},
};
use crate::infra::{checkpoint::CheckpointManager, scaler_store::ScalerStore};
use crate::ml::{
    classifier::Classifier,
    Accelerator, CpuBackend, GpuBackend, ModelConfig, SequenceClassifier,
};

// ─── Classification Configuration ─────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyConfig {
    pub recording:          String,
    pub checkpoint_dir:     String,
    /// Directory of per-sensor scaler JSON files; None skips scaling
    pub scalers_dir:        Option<String>,
    pub accelerator:        Accelerator,
    pub device_format:      DeviceFormat,
    /// Moving-average period applied before scaling
    pub smoothing:          Option<usize>,
    pub batch_size:         usize,
    pub inference_interval: f64,
    pub sample_interval:    f64,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        let pipeline = PipelineConfig::default();
        Self {
            recording:          "recording.csv".to_string(),
            checkpoint_dir:     "checkpoints".to_string(),
            scalers_dir:        None,
            accelerator:        Accelerator::Cpu,
            device_format:      DeviceFormat::Android,
            smoothing:          None,
            batch_size:         32,
            inference_interval: pipeline.inference_interval,
            sample_interval:    pipeline.sample_interval,
        }
    }
}

/// Ranked predictions for one window of the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowPrediction {
    /// Readings consumed when the window was emitted
    pub end_sample:  usize,
    /// Recording time at the end of the window
    pub seconds:     f64,
    pub predictions: Vec<Prediction>,
}

impl WindowPrediction {
    pub fn top(&self) -> Option<&Prediction> {
        self.predictions.first()
    }
}

pub struct ClassifyUseCase {
    config: ClassifyConfig,
}

impl ClassifyUseCase {
    pub fn new(config: ClassifyConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<Vec<WindowPrediction>> {
        let cfg = &self.config;

        // ── Step 1: Model config decides the window shape ─────────────────────
        let ckpt      = CheckpointManager::new(&cfg.checkpoint_dir);
        let model_cfg = ckpt.load_config()?;
        model_cfg.validate()?;

        let shape = model_cfg.input_shape();
        if shape.features != Sensor::ALL.len() {
            bail!(
                "model expects {} features per step but the pipeline produces {}",
                shape.features,
                Sensor::ALL.len()
            );
        }

        // ── Step 2-4: Load, preprocess and segment ────────────────────────────
        let windows = self.prepare_windows(shape.timesteps)?;
        if windows.is_empty() {
            tracing::warn!("Recording is shorter than one {}-reading window", shape.timesteps);
            return Ok(Vec::new());
        }
        tracing::info!("Classifying {} windows on {:?}", windows.len(), cfg.accelerator);

        // ── Step 5 + 6: Run on the chosen backend ─────────────────────────────
        match cfg.accelerator {
            Accelerator::Cpu => self.run::<CpuBackend>(&ckpt, model_cfg, windows),
            Accelerator::Gpu => self.run::<GpuBackend>(&ckpt, model_cfg, windows),
        }
    }

    /// Turn the recording into preprocessed `window_length × 3` windows.
    fn prepare_windows(&self, window_length: usize) -> Result<Vec<SensorWindow>> {
        let cfg      = &self.config;
        let readings = RecordingLoader::new(&cfg.recording).load_all()?;

        let pipeline_cfg = PipelineConfig {
            inference_interval: cfg.inference_interval,
            sample_interval:    cfg.sample_interval,
            window_length,
        };
        let mut pipeline = self.build_pipeline(pipeline_cfg)?;
        Ok(pipeline.run(&readings))
    }

    fn build_pipeline(&self, pipeline_cfg: PipelineConfig) -> Result<SensorPipeline> {
        let cfg     = &self.config;
        let scalers = cfg.scalers_dir.as_ref().map(ScalerStore::new);
        if scalers.is_none() {
            tracing::warn!("No scalers directory given, windows are fed unscaled");
        }

        let mut pipeline = SensorPipeline::new(pipeline_cfg, cfg.device_format);
        for sensor in Sensor::ALL {
            let mut chain: Vec<Box<dyn Preprocessor>> = Vec::new();
            if let Some(period) = cfg.smoothing {
                chain.push(Box::new(MovingAverage::new(period)));
            }
            if let Some(store) = &scalers {
                chain.extend(store.load(sensor, pipeline_cfg.window_length)?);
            }
            pipeline = pipeline.with_preprocessors(sensor, chain);
        }
        Ok(pipeline)
    }

    fn run<B: Backend>(
        &self,
        ckpt:      &CheckpointManager,
        model_cfg: ModelConfig,
        windows:   Vec<SensorWindow>,
    ) -> Result<Vec<WindowPrediction>> {
        let device = B::Device::default();
        match model_cfg {
            ModelConfig::Lstm(c) => {
                let model = ckpt.load_model::<B, _>(c.init::<B>(&device), &device)?;
                self.classify_windows(Classifier::<B, _>::new(model, device), windows)
            }
            ModelConfig::ConvLstm(c) => {
                let model = ckpt.load_model::<B, _>(c.init::<B>(&device), &device)?;
                self.classify_windows(Classifier::<B, _>::new(model, device), windows)
            }
            ModelConfig::Transformer(c) => {
                let model = ckpt.load_model::<B, _>(c.init::<B>(&device), &device)?;
                self.classify_windows(Classifier::<B, _>::new(model, device), windows)
            }
        }
    }

    fn classify_windows<B: Backend, M: SequenceClassifier<B>>(
        &self,
        classifier: Classifier<B, M>,
        windows:    Vec<SensorWindow>,
    ) -> Result<Vec<WindowPrediction>> {
        let batcher = WindowBatcher::<B>::new(classifier.device().clone());
        let loader  = DataLoaderBuilder::new(batcher)
            .batch_size(self.config.batch_size.max(1))
            .build(WindowDataset::new(windows));

        let mut results = Vec::new();
        for batch in loader.iter() {
            let ranked = classifier.classify_batch(batch.inputs)?;
            for (end_sample, predictions) in batch.end_samples.into_iter().zip(ranked) {
                results.push(WindowPrediction {
                    end_sample,
                    seconds: end_sample as f64 * self.config.sample_interval,
                    predictions,
                });
            }
        }

        results.sort_by_key(|r| r.end_sample);
        Ok(results)
    }
}
