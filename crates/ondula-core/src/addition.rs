//! Two-input summing junction.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::filter::{Filter, FilterError, check_input_len};

/// Sums its two inputs into a single output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Addition;

impl Addition {
    /// Creates a summing junction.
    pub fn new() -> Self {
        Self
    }
}

impl Filter for Addition {
    fn input_count(&self) -> usize {
        2
    }

    fn output_count(&self) -> usize {
        1
    }

    #[inline]
    fn compute_one_step(&mut self, input: &[f32]) -> Result<Vec<f32>, FilterError> {
        check_input_len(input, 2)?;
        Ok(vec![input[0] + input[1]])
    }

    fn reset(&mut self) {}
}
