// ============================================================
// Layer 4 - Data Pipeline
// ============================================================
// This layer handles everything from a raw sensor recording
// all the way to model-ready tensor batches.
//
//   recording.csv
//       │
//       ▼
//   RecordingLoader   → parses triaxial readings
//       │
//       ▼
//   SensorPipeline    → magnitudes, sliding windows, preprocessing
//       │
//       ▼
//   WindowDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   WindowBatcher     → stacks windows into [N, T, F] tensors
//       │
//       ▼
//   DataLoader        → feeds batches to the classifier
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads CSV sensor recordings
pub mod loader;

/// Yeo-Johnson, standard scaling and moving average transforms
pub mod preprocessor;

/// Turns a reading stream into overlapping model windows
pub mod segmenter;

/// Implements Burn's Dataset trait for sensor windows
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
