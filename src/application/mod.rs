// ============================================================
// Layer 2 - Application / Use Cases
// ============================================================
// This layer orchestrates the other layers to accomplish one
// goal per use case.
//
// Rules for this layer:
//   - No tensor math or module code here (that's Layer 5)
//   - No printing here (that's Layer 1)
//   - No direct file parsing (that's Layers 4 and 6)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern

// Build a model and describe its topology
pub mod summary_use_case;

// Build a model and persist it as a checkpoint
pub mod init_use_case;

// Run a recording through the pipeline and a checkpointed model
pub mod classify_use_case;
