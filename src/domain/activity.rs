// ============================================================
// Layer 3 - Activity Classes and Predictions
// ============================================================
// The SHL (Sussex-Huawei Locomotion) dataset labels every
// window with one of nine transport or locomotion modes. The
// numeric value of each variant is its index in the model's
// output vector, so the order below must never change.
//
// Example:
//   softmax output [0.01, 0.02, 0.90, ...]
//   → index 2 → ActivityClass::Walking with confidence 0.90

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the nine SHL classes, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum ActivityClass {
    Null    = 0,
    Still   = 1,
    Walking = 2,
    Run     = 3,
    Bike    = 4,
    Car     = 5,
    Bus     = 6,
    Train   = 7,
    Subway  = 8,
}

impl ActivityClass {
    /// Every class in output-index order
    pub const ALL: [ActivityClass; 9] = [
        ActivityClass::Null,
        ActivityClass::Still,
        ActivityClass::Walking,
        ActivityClass::Run,
        ActivityClass::Bike,
        ActivityClass::Car,
        ActivityClass::Bus,
        ActivityClass::Train,
        ActivityClass::Subway,
    ];

    /// Number of classes a multi-class SHL model must output
    pub const COUNT: usize = Self::ALL.len();

    /// Map an output index back to its class.
    /// Returns None for indices past the last class.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ActivityClass::Null    => "Null",
            ActivityClass::Still   => "Still",
            ActivityClass::Walking => "Walking",
            ActivityClass::Run     => "Run",
            ActivityClass::Bike    => "Bike",
            ActivityClass::Car     => "Car",
            ActivityClass::Bus     => "Bus",
            ActivityClass::Train   => "Train",
            ActivityClass::Subway  => "Subway",
        }
    }
}

impl fmt::Display for ActivityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The model's confidence for one output index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Position in the model's output vector
    pub class_index: usize,

    /// The SHL class at that position, when the model outputs all nine
    pub label: Option<ActivityClass>,

    /// Probability assigned by the softmax/sigmoid head
    pub confidence: f32,
}

impl Prediction {
    pub fn new(class_index: usize, label: Option<ActivityClass>, confidence: f32) -> Self {
        Self { class_index, label, confidence }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Some(label) => write!(f, "{label} {:.3}", self.confidence),
            None        => write!(f, "class {} {:.3}", self.class_index, self.confidence),
        }
    }
}
