//! Feedback and feed-forward echoes.
//!
//! Both are one-input, one-output composites built from a single
//! Addition/Delay/Gain triple; they differ only in where the delay taps the
//! signal.

use ondula_core::{Addition, CompositeFilter, Delay, Gain, GraphError};

/// Recirculating echo: `y[n] = x[n] + gain · y[n - delay]`.
///
/// The sum is fed back through the delay, so each repeat is `gain` times
/// the previous one. Keep `|gain| < 1` for a decaying tail.
///
/// # Panics
///
/// Panics if `delay` is zero.
///
/// # Example
///
/// ```rust
/// use ondula_core::Filter;
/// use ondula_effects::echo;
///
/// let mut filter = echo(0.5, 2)?;
/// let out: Vec<f32> = [1.0, 0.0, 0.0, 0.0, 0.0]
///     .iter()
///     .map(|&x| filter.compute_one_step(&[x]).unwrap()[0])
///     .collect();
/// assert_eq!(out, vec![1.0, 0.0, 0.5, 0.0, 0.25]);
/// # Ok::<(), ondula_core::GraphError>(())
/// ```
pub fn echo(gain: f32, delay: usize) -> Result<CompositeFilter, GraphError> {
    let mut filter = CompositeFilter::new(1, 1);
    let feedback = filter.add_block(Gain::new(gain));
    let line = filter.add_block(Delay::new(delay));
    let sum = filter.add_block(Addition::new());

    filter.connect_input_to_block(0, sum, 0)?;
    filter.connect_block_to_block(sum, 0, line, 0)?;
    filter.connect_block_to_block(line, 0, feedback, 0)?;
    filter.connect_block_to_block(feedback, 0, sum, 1)?;
    filter.connect_block_to_output(sum, 0, 0)?;
    Ok(filter)
}

/// Single-repeat echo: `y[n] = x[n] + gain · x[n - delay]`.
///
/// The delay taps the input rather than the output, so there is no loop and
/// exactly one repeat.
///
/// # Panics
///
/// Panics if `delay` is zero.
pub fn alt_echo(gain: f32, delay: usize) -> Result<CompositeFilter, GraphError> {
    let mut filter = CompositeFilter::new(1, 1);
    let level = filter.add_block(Gain::new(gain));
    let line = filter.add_block(Delay::new(delay));
    let sum = filter.add_block(Addition::new());

    filter.connect_input_to_block(0, sum, 0)?;
    filter.connect_input_to_block(0, line, 0)?;
    filter.connect_block_to_block(line, 0, level, 0)?;
    filter.connect_block_to_block(level, 0, sum, 1)?;
    filter.connect_block_to_output(sum, 0, 0)?;
    Ok(filter)
}
