//! Schroeder all-pass sections and series cascades of them.
//!
//! An all-pass section passes every frequency at unit magnitude and only
//! smears phase, which makes it the basic diffuser of artificial
//! reverberation.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use ondula_core::{Addition, CascadeBuilder, CompositeFilter, Delay, Gain, GraphError};

/// Schroeder all-pass section.
///
/// ```text
/// a[n] = x[n] + gain · y[n]
/// y[n] = -gain · x[n] + a[n - delay]
/// ```
///
/// # Panics
///
/// Panics if `delay` is zero.
pub fn all_pass(gain: f32, delay: usize) -> Result<CompositeFilter, GraphError> {
    let mut filter = CompositeFilter::new(1, 1);
    let feedback = filter.add_block(Gain::new(gain));
    let feed_forward = filter.add_block(Gain::new(-gain));
    let line = filter.add_block(Delay::new(delay));
    let head = filter.add_block(Addition::new());
    let tail = filter.add_block(Addition::new());

    filter.connect_input_to_block(0, feed_forward, 0)?;
    filter.connect_input_to_block(0, head, 0)?;
    filter.connect_block_to_block(head, 0, line, 0)?;
    filter.connect_block_to_block(line, 0, tail, 0)?;
    filter.connect_block_to_block(feed_forward, 0, tail, 1)?;
    filter.connect_block_to_block(tail, 0, feedback, 0)?;
    filter.connect_block_to_block(feedback, 0, head, 1)?;
    filter.connect_block_to_output(tail, 0, 0)?;
    Ok(filter)
}

/// Builds a series chain of [`all_pass`] sections.
///
/// ```rust
/// use ondula_effects::AllPassCascadeBuilder;
///
/// let diffuser = AllPassCascadeBuilder::new()
///     .push(0.7, 347)
///     .push(0.7, 113)
///     .push(0.7, 37)
///     .build()?;
/// assert_eq!(diffuser.node_count(), 3);
/// # Ok::<(), ondula_core::GraphError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct AllPassCascadeBuilder {
    sections: Vec<(f32, usize)>,
}

impl AllPassCascadeBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an all-pass section with the given gain and delay.
    #[must_use]
    pub fn push(mut self, gain: f32, delay: usize) -> Self {
        self.sections.push((gain, delay));
        self
    }

    /// Number of sections pushed so far.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if no section has been pushed.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Wires the sections in series.
    ///
    /// Fails with [`GraphError::EmptyCascade`] when nothing was pushed.
    ///
    /// # Panics
    ///
    /// Panics if any section has a zero delay.
    pub fn build(self) -> Result<CompositeFilter, GraphError> {
        let mut cascade = CascadeBuilder::new();
        for (gain, delay) in self.sections {
            cascade = cascade.push(all_pass(gain, delay)?);
        }
        cascade.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ondula_core::Filter;

    #[test]
    fn impulse_response_shape() {
        // y = -g at 0, (1 - g²)·g^(k-1) at k·delay
        let g = 0.5f32;
        let mut filter = all_pass(g, 2).unwrap();
        assert!(filter.is_valid());
        let out: Vec<f32> = (0..7)
            .map(|n| {
                let x = if n == 0 { 1.0 } else { 0.0 };
                filter.compute_one_step(&[x]).unwrap()[0]
            })
            .collect();
        let expected = [-0.5, 0.0, 0.75, 0.0, 0.375, 0.0, 0.1875];
        for (y, e) in out.iter().zip(expected) {
            assert!((y - e).abs() < 1e-6, "{out:?}");
        }
    }

    #[test]
    fn zero_gain_is_a_pure_delay() {
        let mut filter = all_pass(0.0, 3).unwrap();
        let out: Vec<f32> = [1.0, 2.0, 3.0, 4.0, 5.0]
            .iter()
            .map(|&x| filter.compute_one_step(&[x]).unwrap()[0])
            .collect();
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn empty_builder_fails() {
        let builder = AllPassCascadeBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.build().unwrap_err(), GraphError::EmptyCascade);
    }

    #[test]
    fn builder_chains_sections() {
        let builder = AllPassCascadeBuilder::new().push(0.0, 2).push(0.0, 3);
        assert_eq!(builder.len(), 2);
        let mut filter = builder.build().unwrap();
        assert!(filter.is_valid());
        let out: Vec<f32> = (0..7)
            .map(|n| {
                let x = if n == 0 { 1.0 } else { 0.0 };
                filter.compute_one_step(&[x]).unwrap()[0]
            })
            .collect();
        assert_eq!(out, vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }
}
