// ============================================================
// Layer 3 - Domain Layer
// ============================================================
// Plain Rust types describing what the system works with:
// sensor readings, magnitude windows, activity classes and
// the predictions a model produces for them.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Everything tensor-shaped lives in Layer 5 (ml); this layer
// only knows about Vec<f32> and the shapes callers ask for.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// The nine SHL transport/locomotion classes and predictions over them
pub mod activity;

// Sensors, triaxial readings and device formats
pub mod sensor;

// The (timesteps, features) input shape handed to every builder
pub mod shape;

// Bounded FIFO of the latest sensor magnitudes
pub mod window;

// Core abstractions (traits) that other layers implement
pub mod traits;
