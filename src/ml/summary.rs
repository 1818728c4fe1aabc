// ============================================================
// Layer 5 - Model Summary
// ============================================================
// A flat, printable description of a model's topology:
// one entry per layer with its per-sample output shape
// (the batch dimension is left out).
//
// Summaries are derived from the configuration rather than
// from live modules, so two calls with identical arguments
// always produce identical summaries.

use std::fmt;

use crate::domain::shape::InputShape;
use crate::ml::Architecture;

#[derive(Debug, Clone, PartialEq)]
pub struct LayerSummary {
    /// Layer type, e.g. "Lstm" or "Dense"
    pub name: &'static str,

    /// Hyperparameters worth showing next to the name
    pub detail: String,

    /// Output shape for one sample
    pub output_shape: Vec<usize>,
}

impl LayerSummary {
    pub fn new(name: &'static str, detail: impl Into<String>, output_shape: Vec<usize>) -> Self {
        Self { name, detail: detail.into(), output_shape }
    }
}

impl fmt::Display for LayerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = self
            .output_shape
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let name = if self.detail.is_empty() {
            self.name.to_string()
        } else {
            format!("{}({})", self.name, self.detail)
        };
        write!(f, "{name:<40} (None, {shape})")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelSummary {
    pub architecture: Architecture,
    pub input_shape:  InputShape,
    pub layers:       Vec<LayerSummary>,
    /// Trainable parameter count reported by Burn
    pub num_params:   usize,
}

impl ModelSummary {
    /// How many layers of the given type the model contains
    pub fn count(&self, name: &str) -> usize {
        self.layers.iter().filter(|l| l.name == name).count()
    }

    /// Output shape of the final layer
    pub fn output_shape(&self) -> &[usize] {
        self.layers.last().map_or(&[], |l| l.output_shape.as_slice())
    }
}

impl fmt::Display for ModelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {} | input {}", self.architecture, self.input_shape)?;
        for layer in &self.layers {
            writeln!(f, "  {layer}")?;
        }
        write!(f, "Total params: {}", self.num_params)
    }
}
