//! Fixed-length unit delay.
//!
//! [`Delay`] is the only primitive whose output does not depend on the
//! current step's input. Inside a [`CompositeFilter`](crate::CompositeFilter)
//! its step is split in two halves:
//!
//! 1. [`pop()`](Delay::pop) emits the oldest sample and leaves the delay
//!    *awaiting refill*;
//! 2. [`enqueue()`](Delay::enqueue) stores the new input once it has been
//!    computed, closing the gap.
//!
//! Emitting before consuming is what lets a feedback loop containing a delay
//! be evaluated without recursing forever.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::filter::{Filter, FilterError, check_input_len};

/// FIFO delay of a fixed number of samples, backed by a circular buffer.
///
/// The buffer always holds `capacity` entries. While awaiting refill the slot
/// under the read cursor is the one vacated by the last [`pop()`](Self::pop).
///
/// # Example
///
/// ```rust
/// use ondula_core::{Delay, Filter};
///
/// let mut delay = Delay::new(2);
/// assert_eq!(delay.compute_one_step(&[1.0]).unwrap(), vec![0.0]);
/// assert_eq!(delay.compute_one_step(&[0.0]).unwrap(), vec![0.0]);
/// assert_eq!(delay.compute_one_step(&[0.0]).unwrap(), vec![1.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Delay {
    /// Circular buffer storage
    buffer: Vec<f32>,
    /// Position of the oldest sample
    read_pos: usize,
    awaiting_refill: bool,
}

impl Delay {
    /// Creates a delay of `samples` samples, initially silent.
    ///
    /// # Panics
    ///
    /// Panics if `samples` is 0.
    pub fn new(samples: usize) -> Self {
        assert!(samples > 0, "Delay length must be > 0");

        Self {
            buffer: vec![0.0; samples],
            read_pos: 0,
            awaiting_refill: false,
        }
    }

    /// Delay length in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` between a [`pop()`](Self::pop) and the matching
    /// [`enqueue()`](Self::enqueue).
    pub fn is_awaiting_refill(&self) -> bool {
        self.awaiting_refill
    }

    /// Removes and returns the oldest sample, leaving the delay awaiting refill.
    ///
    /// Popping again before refilling returns the same sample.
    #[inline]
    pub fn pop(&mut self) -> f32 {
        self.awaiting_refill = true;
        self.buffer[self.read_pos]
    }

    /// Appends `sample` as the newest entry and clears the refill flag.
    ///
    /// Has no effect unless the delay is awaiting refill, so the buffer
    /// never grows past its capacity.
    #[inline]
    pub fn enqueue(&mut self, sample: f32) {
        if !self.awaiting_refill {
            return;
        }
        self.buffer[self.read_pos] = sample;
        self.read_pos = (self.read_pos + 1) % self.buffer.len();
        self.awaiting_refill = false;
    }
}

impl Filter for Delay {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        1
    }

    fn compute_one_step(&mut self, input: &[f32]) -> Result<Vec<f32>, FilterError> {
        check_input_len(input, 1)?;
        let output = self.pop();
        self.enqueue(input[0]);
        Ok(vec![output])
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.read_pos = 0;
        self.awaiting_refill = false;
    }
}
