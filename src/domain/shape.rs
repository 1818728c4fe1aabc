// ============================================================
// Layer 3 - InputShape
// ============================================================
// The (sequence length, feature count) pair every model builder
// receives. The batch dimension is never part of it: a model
// built for InputShape { timesteps: 500, features: 3 } accepts
// tensors of shape [batch, 500, 3] for any batch size.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-sample input shape of a sequence model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputShape {
    /// Number of time steps in one window
    pub timesteps: usize,

    /// Number of values recorded per time step
    pub features: usize,
}

impl InputShape {
    pub fn new(timesteps: usize, features: usize) -> Self {
        Self { timesteps, features }
    }

    /// Total number of scalars in one sample
    pub fn len(&self) -> usize {
        self.timesteps * self.features
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for InputShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.timesteps, self.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_tuple_notation() {
        assert_eq!(InputShape::new(500, 3).to_string(), "(500, 3)");
    }

    #[test]
    fn test_len_counts_all_scalars() {
        let shape = InputShape::new(500, 3);
        assert_eq!(shape.len(), 1500);
        assert!(!shape.is_empty());
        assert!(InputShape::new(0, 3).is_empty());
    }
}
