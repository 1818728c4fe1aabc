// ============================================================
// Layer 5 - Classifier (inference)
// ============================================================
// Wraps any built model and turns its probability output into
// ranked predictions.
//
// Shape rules:
//   - every window must be exactly (timesteps, features) as the
//     model was built for; anything else is rejected before the
//     forward pass
//   - a softmax head with 9 outputs is labelled with the SHL
//     activity classes, any other width keeps bare indices
//   - a single sigmoid output p is reported as two entries,
//     index 0 with 1 - p and index 1 with p

use burn::{prelude::*, tensor::TensorData};
use thiserror::Error;

use crate::domain::{
    activity::{ActivityClass, Prediction},
    shape::InputShape,
};
use crate::ml::SequenceClassifier;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("expected input of shape {expected}, got ({timesteps}, {features})")]
    InputShape { expected: InputShape, timesteps: usize, features: usize },

    #[error("cannot classify an empty batch")]
    EmptyBatch,

    #[error("cannot read model output: {0}")]
    Readback(String),
}

pub struct Classifier<B: Backend, M> {
    model:  M,
    device: B::Device,
}

impl<B: Backend, M: SequenceClassifier<B>> Classifier<B, M> {
    pub fn new(model: M, device: B::Device) -> Self {
        Self { model, device }
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }

    /// Classify one window given as `timesteps` rows of `features` values.
    pub fn classify(&self, window: &[Vec<f32>]) -> Result<Vec<Prediction>, ClassifierError> {
        let expected  = self.model.input_shape();
        let timesteps = window.len();
        let features  = window.first().map_or(0, Vec::len);

        let ragged = window.iter().any(|row| row.len() != features);
        if ragged || timesteps != expected.timesteps || features != expected.features {
            return Err(ClassifierError::InputShape { expected, timesteps, features });
        }

        let flat: Vec<f32> = window.iter().flatten().copied().collect();
        let input = Tensor::<B, 3>::from_data(
            TensorData::new(flat, [1, timesteps, features]),
            &self.device,
        );

        self.classify_batch(input)?
            .pop()
            .ok_or(ClassifierError::EmptyBatch)
    }

    /// Classify a [batch, timesteps, features] tensor, one ranking per row.
    pub fn classify_batch(&self, input: Tensor<B, 3>) -> Result<Vec<Vec<Prediction>>, ClassifierError> {
        let expected = self.model.input_shape();
        let [batch, timesteps, features] = input.dims();

        if timesteps != expected.timesteps || features != expected.features {
            return Err(ClassifierError::InputShape { expected, timesteps, features });
        }
        if batch == 0 {
            return Err(ClassifierError::EmptyBatch);
        }

        let probs = self.model.probabilities(input);
        let [_, outputs] = probs.dims();
        if outputs == 0 {
            return Err(ClassifierError::Readback("model has no outputs".to_string()));
        }

        let values = probs
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| ClassifierError::Readback(format!("{e:?}")))?;

        Ok(values.chunks(outputs).map(rank_predictions).collect())
    }
}

/// Pair each probability with its class and sort by descending confidence.
pub fn rank_predictions(probabilities: &[f32]) -> Vec<Prediction> {
    let expanded: Vec<f32> = match probabilities {
        [p] => vec![1.0 - p, *p],
        all => all.to_vec(),
    };
    let labelled = expanded.len() == ActivityClass::COUNT;

    let mut predictions: Vec<Prediction> = expanded
        .into_iter()
        .enumerate()
        .map(|(i, confidence)| {
            let label = if labelled { ActivityClass::from_index(i) } else { None };
            Prediction::new(i, label, confidence)
        })
        .collect();

    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions
}
