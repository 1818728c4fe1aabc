// ============================================================
// Layer 6 - Infrastructure Layer
// ============================================================
// Persistence that the other layers share:
//
//   checkpoint.rs   - Saving and loading built models
//                     Stores the ModelConfig as JSON and the
//                     parameters with Burn's CompactRecorder so
//                     a model can be rebuilt and reloaded.
//
//   scaler_store.rs - Fitted preprocessing parameters
//                     Reads the per-sensor power transformer and
//                     standard scaler configs used before inference.
//
// Reference: Rust Book §9 (Error Handling with anyhow)
//            Burn Book §5 (Checkpointing)

/// Model config and weight persistence
pub mod checkpoint;

/// Per-sensor preprocessing parameters
pub mod scaler_store;
