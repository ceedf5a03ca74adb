//! Nested all-pass: an all-pass whose delay line holds another filter.

use ondula_core::{Addition, Block, CompositeFilter, Delay, Gain, GraphError};

/// All-pass structure with `inner` in series with the delay.
///
/// ```text
/// s[n] = x[n] + gain · y[n]
/// y[n] = -gain · x[n] + D(inner(s))[n]
/// ```
///
/// `inner` must be a one-input, one-output block. With `inner` a unity
/// [`Gain`] this reduces to [`all_pass(gain, delay)`](crate::all_pass).
///
/// # Panics
///
/// Panics if `delay` is zero.
pub fn nested_all_pass(
    inner: impl Into<Block>,
    delay: usize,
    gain: f32,
) -> Result<CompositeFilter, GraphError> {
    let mut filter = CompositeFilter::new(1, 1);
    let head = filter.add_block(Addition::new());
    let body = filter.add_block(inner);
    let line = filter.add_block(Delay::new(delay));
    let feed_forward = filter.add_block(Gain::new(-gain));
    let feedback = filter.add_block(Gain::new(gain));
    let tail = filter.add_block(Addition::new());

    filter.connect_input_to_block(0, head, 0)?;
    filter.connect_block_to_block(feedback, 0, head, 1)?;
    filter.connect_input_to_block(0, feed_forward, 0)?;
    filter.connect_block_to_block(feed_forward, 0, tail, 0)?;
    filter.connect_block_to_block(tail, 0, feedback, 0)?;
    filter.connect_block_to_block(head, 0, body, 0)?;
    filter.connect_block_to_block(body, 0, line, 0)?;
    filter.connect_block_to_block(line, 0, tail, 1)?;
    filter.connect_block_to_output(tail, 0, 0)?;
    Ok(filter)
}
