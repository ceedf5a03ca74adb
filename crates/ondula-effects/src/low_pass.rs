//! One-pole comb low-pass.
//!
//! Used inside the [`reverberator`](crate::reverberator)'s feedback path to
//! darken each pass around the loop.

use ondula_core::{Addition, CompositeFilter, Delay, Gain, GraphError};

/// Recursive low-pass: `y[n] = (1 - gain) · x[n] + gain · y[n - delay]`.
///
/// With `delay == 1` this is the classic one-pole smoother; DC passes at
/// unit gain for any `gain` in `[0, 1)`.
///
/// # Panics
///
/// Panics if `delay` is zero.
pub fn low_pass(gain: f32, delay: usize) -> Result<CompositeFilter, GraphError> {
    let mut filter = CompositeFilter::new(1, 1);
    let feedback = filter.add_block(Gain::new(gain));
    let direct = filter.add_block(Gain::new(1.0 - gain));
    let line = filter.add_block(Delay::new(delay));
    let sum = filter.add_block(Addition::new());

    filter.connect_input_to_block(0, direct, 0)?;
    filter.connect_block_to_block(line, 0, feedback, 0)?;
    filter.connect_block_to_block(feedback, 0, sum, 1)?;
    filter.connect_block_to_block(direct, 0, sum, 0)?;
    filter.connect_block_to_block(sum, 0, line, 0)?;
    filter.connect_block_to_output(sum, 0, 0)?;
    Ok(filter)
}
