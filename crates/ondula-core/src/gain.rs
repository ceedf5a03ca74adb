//! Constant gain stage.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::filter::{Filter, FilterError, check_input_len};

/// Multiplies its single input by a constant factor.
///
/// # Example
///
/// ```rust
/// use ondula_core::{Filter, Gain};
///
/// let mut half = Gain::new(0.5);
/// assert_eq!(half.compute_one_step(&[0.8]).unwrap(), vec![0.4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gain {
    gain: f32,
}

impl Gain {
    /// Creates a gain stage with the given linear factor.
    pub fn new(gain: f32) -> Self {
        Self { gain }
    }

    /// Returns the linear factor.
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Sets the linear factor.
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain;
    }
}

impl Filter for Gain {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    #[inline]
    fn compute_one_step(&mut self, input: &[f32]) -> Result<Vec<f32>, FilterError> {
        check_input_len(input, 1)?;
        Ok(vec![self.gain * input[0]])
    }

    fn reset(&mut self) {}
}
