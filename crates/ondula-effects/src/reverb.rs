//! Gardner-style room reverberator.
//!
//! A single recirculating loop: input diffusion through two all-pass
//! sections, a chain of delays with two nested all-pass sections as taps, and
//! a low-pass feedback path back to the input summing junction. Three taps
//! along the loop are mixed into the output.

use ondula_core::{Addition, Block, CompositeFilter, Delay, Gain, GraphError, chain};

use crate::all_pass::all_pass;
use crate::low_pass::low_pass;
use crate::nested::nested_all_pass;

/// Delay lengths in samples at 44.1kHz.
mod tuning {
    pub const DIFFUSER_A: usize = 353;
    pub const DIFFUSER_B: usize = 529;
    pub const PRE_TAP: usize = 176;
    pub const TO_FIRST_NEST: usize = 750;
    pub const FIRST_NEST_INNER: usize = 2734;
    pub const FIRST_NEST_LINE: usize = 3837;
    pub const AFTER_FIRST_NEST: usize = 1367;
    pub const TO_SECOND_NEST: usize = 132;
    pub const SECOND_NEST_A: usize = 3352;
    pub const SECOND_NEST_B: usize = 1323;
    pub const SECOND_NEST_LINE: usize = 2646;
    pub const DAMPING: usize = 88;
}

const DIFFUSER_GAIN: f32 = 0.3;
const NEST_INNER_GAIN: f32 = 0.25;
const NEST_GAIN: f32 = 0.5;
const PRE_TAP_LEVEL: f32 = 0.34;
const NEST_TAP_LEVEL: f32 = 0.14;
const DAMPING_GAIN: f32 = 0.7133;
const LOOP_GAIN: f32 = 0.1;

/// Builds the reverberator as a one-input, one-output composite.
///
/// Delay lengths are fixed sample counts tuned for 44.1kHz; at other rates
/// the room simply sounds larger or smaller. The first output sample that
/// is not silence appears 176 samples after the input.
pub fn reverberator() -> Result<CompositeFilter, GraphError> {
    let mut room = CompositeFilter::new(1, 1);

    let inlet = room.add_block(Addition::new());
    let diffuser_a = room.add_block(all_pass(DIFFUSER_GAIN, tuning::DIFFUSER_A)?);
    let diffuser_b = room.add_block(all_pass(DIFFUSER_GAIN, tuning::DIFFUSER_B)?);
    let pre_tap = room.add_block(Delay::new(tuning::PRE_TAP));
    let pre_tap_level = room.add_block(Gain::new(PRE_TAP_LEVEL));
    let to_first = room.add_block(Delay::new(tuning::TO_FIRST_NEST));
    let first_nest = room.add_block(first_nest()?);
    let after_first = room.add_block(Delay::new(tuning::AFTER_FIRST_NEST));
    let first_tap_level = room.add_block(Gain::new(NEST_TAP_LEVEL));
    let early_mix = room.add_block(Addition::new());
    let to_second = room.add_block(Delay::new(tuning::TO_SECOND_NEST));
    let second_nest = room.add_block(second_nest()?);
    let second_tap_level = room.add_block(Gain::new(NEST_TAP_LEVEL));
    let outlet = room.add_block(Addition::new());
    let damping = room.add_block(low_pass(DAMPING_GAIN, tuning::DAMPING)?);
    let loop_gain = room.add_block(Gain::new(LOOP_GAIN));

    room.connect_input_to_block(0, inlet, 0)?;
    room.connect_block_to_block(loop_gain, 0, inlet, 1)?;
    room.connect_block_to_block(inlet, 0, diffuser_a, 0)?;
    room.connect_block_to_block(diffuser_a, 0, diffuser_b, 0)?;
    room.connect_block_to_block(diffuser_b, 0, pre_tap, 0)?;
    room.connect_block_to_block(pre_tap, 0, pre_tap_level, 0)?;
    room.connect_block_to_block(pre_tap_level, 0, early_mix, 0)?;
    room.connect_block_to_block(pre_tap, 0, to_first, 0)?;
    room.connect_block_to_block(to_first, 0, first_nest, 0)?;
    room.connect_block_to_block(first_nest, 0, after_first, 0)?;
    room.connect_block_to_block(after_first, 0, first_tap_level, 0)?;
    room.connect_block_to_block(first_tap_level, 0, early_mix, 1)?;
    room.connect_block_to_block(after_first, 0, to_second, 0)?;
    room.connect_block_to_block(to_second, 0, second_nest, 0)?;
    room.connect_block_to_block(second_nest, 0, second_tap_level, 0)?;
    room.connect_block_to_block(early_mix, 0, outlet, 0)?;
    room.connect_block_to_block(second_tap_level, 0, outlet, 1)?;
    room.connect_block_to_block(second_nest, 0, damping, 0)?;
    room.connect_block_to_block(damping, 0, loop_gain, 0)?;
    room.connect_block_to_output(outlet, 0, 0)?;
    Ok(room)
}

/// Single all-pass inside a nested section.
fn first_nest() -> Result<CompositeFilter, GraphError> {
    nested_all_pass(
        all_pass(NEST_INNER_GAIN, tuning::FIRST_NEST_INNER)?,
        tuning::FIRST_NEST_LINE,
        NEST_GAIN,
    )
}

/// Two all-passes separated by a delay inside a nested section.
fn second_nest() -> Result<CompositeFilter, GraphError> {
    let inner = chain([
        Block::from(all_pass(NEST_INNER_GAIN, tuning::SECOND_NEST_A)?),
        Delay::new(tuning::SECOND_NEST_LINE).into(),
        all_pass(NEST_INNER_GAIN, tuning::SECOND_NEST_B)?.into(),
    ])?;
    nested_all_pass(inner, tuning::SECOND_NEST_LINE, NEST_GAIN)
}
