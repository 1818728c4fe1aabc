// ============================================================
// Layer 3 - Sliding Window
// ============================================================
// Holds the most recent `max_length` values of one sensor.
// New values are appended at the back; once the window is
// over capacity the oldest values are dropped from the front.
//
// Example with max_length = 3:
//   push 1 → [1]
//   push 2 → [1, 2]
//   push 3 → [1, 2, 3]   (full)
//   push 4 → [2, 3, 4]   (1 evicted)

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Window {
    max_length: usize,
    values:     VecDeque<f32>,
}

impl Window {
    pub fn new(max_length: usize) -> Self {
        Self { max_length, values: VecDeque::with_capacity(max_length + 1) }
    }

    pub fn push(&mut self, value: f32) {
        self.values.push_back(value);
        while self.values.len() > self.max_length {
            self.values.pop_front();
        }
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.max_length
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of the current contents, oldest first
    pub fn values(&self) -> Vec<f32> {
        self.values.iter().copied().collect()
    }
}
