//! Integration tests for ondula-core graphs.
//!
//! Exercises the public wiring API end to end: nesting, user-defined filters
//! with several ports, feedback through nested composites, and the error
//! paths a caller can observe.

use ondula_core::{
    Addition, Block, CascadeBuilder, CompositeFilter, Delay, Filter, FilterError, Gain,
    GraphError, check_input_len,
};

fn run(filter: &mut impl Filter, input: &[f32]) -> Vec<f32> {
    input
        .iter()
        .map(|&x| filter.compute_one_step(&[x]).unwrap()[0])
        .collect()
}

fn impulse(len: usize) -> Vec<f32> {
    (0..len).map(|n| if n == 0 { 1.0 } else { 0.0 }).collect()
}

/// Splits one input into its positive and negative halves.
struct Rectify;

impl Filter for Rectify {
    fn input_count(&self) -> usize {
        1
    }

    fn output_count(&self) -> usize {
        2
    }

    fn compute_one_step(&mut self, input: &[f32]) -> Result<Vec<f32>, FilterError> {
        check_input_len(input, 1)?;
        Ok(vec![input[0].max(0.0), input[0].min(0.0)])
    }

    fn reset(&mut self) {}
}

// ============================================================================
// Nesting
// ============================================================================

/// Feedback loop whose delay lives inside a nested composite.
fn nested_echo(gain: f32, delay: usize) -> CompositeFilter {
    let mut inner = CompositeFilter::new(1, 1);
    let d = inner.add_block(Delay::new(delay));
    let g = inner.add_block(Gain::new(gain));
    inner.connect_input_to_block(0, d, 0).unwrap();
    inner.connect_block_to_block(d, 0, g, 0).unwrap();
    inner.connect_block_to_output(g, 0, 0).unwrap();

    let mut outer = CompositeFilter::new(1, 1);
    let sum = outer.add_block(Addition::new());
    let body = outer.add_block(inner);
    outer.connect_input_to_block(0, sum, 0).unwrap();
    outer.connect_block_to_block(sum, 0, body, 0).unwrap();
    outer.connect_block_to_block(body, 0, sum, 1).unwrap();
    outer.connect_block_to_output(sum, 0, 0).unwrap();
    outer
}

#[test]
fn nested_delay_does_not_break_the_outer_loop() {
    // The nested composite is opaque: the outer graph sees no delay and the
    // loop cannot be primed.
    let mut filter = nested_echo(0.5, 2);
    assert!(filter.is_valid());
    let err = filter.compute_one_step(&[1.0]).unwrap_err();
    assert!(matches!(err, FilterError::IncompleteGraph(_)));
}

#[test]
fn nested_feed_forward_matches_flattened() {
    // x → [Delay(3) → Gain(0.5)] → Addition ← x
    let mut inner = CompositeFilter::new(1, 1);
    let d = inner.add_block(Delay::new(3));
    let g = inner.add_block(Gain::new(0.5));
    inner.connect_input_to_block(0, d, 0).unwrap();
    inner.connect_block_to_block(d, 0, g, 0).unwrap();
    inner.connect_block_to_output(g, 0, 0).unwrap();

    let mut nested = CompositeFilter::new(1, 1);
    let body = nested.add_block(inner);
    let sum = nested.add_block(Addition::new());
    nested.connect_input_to_block(0, sum, 0).unwrap();
    nested.connect_input_to_block(0, body, 0).unwrap();
    nested.connect_block_to_block(body, 0, sum, 1).unwrap();
    nested.connect_block_to_output(sum, 0, 0).unwrap();

    let mut flat = CompositeFilter::new(1, 1);
    let d = flat.add_block(Delay::new(3));
    let g = flat.add_block(Gain::new(0.5));
    let sum = flat.add_block(Addition::new());
    flat.connect_input_to_block(0, sum, 0).unwrap();
    flat.connect_input_to_block(0, d, 0).unwrap();
    flat.connect_block_to_block(d, 0, g, 0).unwrap();
    flat.connect_block_to_block(g, 0, sum, 1).unwrap();
    flat.connect_block_to_output(sum, 0, 0).unwrap();

    let input = [1.0, -0.5, 0.25, 0.0, 0.75, 0.0, 0.0, -1.0];
    assert_eq!(run(&mut nested, &input), run(&mut flat, &input));
}

#[test]
fn nested_loop_with_outer_delay_rings() {
    // The outer loop carries its own delay, the nested composite only scales.
    let mut inner = CompositeFilter::new(1, 1);
    let g = inner.add_block(Gain::new(0.5));
    inner.connect_input_to_block(0, g, 0).unwrap();
    inner.connect_block_to_output(g, 0, 0).unwrap();

    let mut outer = CompositeFilter::new(1, 1);
    let sum = outer.add_block(Addition::new());
    let d = outer.add_block(Delay::new(1));
    let scale = outer.add_block(inner);
    outer.connect_input_to_block(0, sum, 0).unwrap();
    outer.connect_block_to_block(sum, 0, d, 0).unwrap();
    outer.connect_block_to_block(d, 0, scale, 0).unwrap();
    outer.connect_block_to_block(scale, 0, sum, 1).unwrap();
    outer.connect_block_to_output(sum, 0, 0).unwrap();

    assert_eq!(run(&mut outer, &impulse(4)), vec![1.0, 0.5, 0.25, 0.125]);
}

// ============================================================================
// Custom filters
// ============================================================================

#[test]
fn multi_output_custom_filter() {
    let mut c = CompositeFilter::new(1, 2);
    let rectify = c.add_block(Block::custom(Rectify));
    let invert = c.add_block(Gain::new(-1.0));
    c.connect_input_to_block(0, rectify, 0).unwrap();
    c.connect_block_to_output(rectify, 0, 0).unwrap();
    c.connect_block_to_block(rectify, 1, invert, 0).unwrap();
    c.connect_block_to_output(invert, 0, 1).unwrap();
    assert!(c.is_valid());

    assert_eq!(c.compute_one_step(&[0.5]).unwrap(), vec![0.5, 0.0]);
    assert_eq!(c.compute_one_step(&[-0.25]).unwrap(), vec![0.0, 0.25]);
}

#[test]
fn custom_filter_with_unwired_output_is_invalid() {
    let mut c = CompositeFilter::new(1, 1);
    let rectify = c.add_block(Block::custom(Rectify));
    c.connect_input_to_block(0, rectify, 0).unwrap();
    c.connect_block_to_output(rectify, 0, 0).unwrap();
    assert!(!c.is_valid());
    let reason = c.validate().unwrap_err().to_string();
    assert!(reason.contains("1 of 2 outputs"), "got: {reason}");
}

#[test]
fn boxed_filter_converts_into_block() {
    let boxed: Box<dyn Filter + Send> = Box::new(Rectify);
    let block = Block::from(boxed);
    assert_eq!(block.kind_name(), "custom");
    assert_eq!(block.output_count(), 2);
}

// ============================================================================
// Builders and errors
// ============================================================================

#[test]
fn cascade_inside_a_graph() {
    let cascade = CascadeBuilder::new()
        .push(Gain::new(2.0))
        .push(Delay::new(1))
        .build()
        .unwrap();

    let mut c = CompositeFilter::new(1, 1);
    let block = c.add_block(cascade);
    c.connect_input_to_block(0, block, 0).unwrap();
    c.connect_block_to_output(block, 0, 0).unwrap();
    assert_eq!(run(&mut c, &[1.0, 2.0, 3.0]), vec![0.0, 2.0, 4.0]);

    let inner = c.block(block).and_then(Block::as_composite).unwrap();
    assert_eq!(inner.node_count(), 2);
}

#[test]
fn rejected_wiring_leaves_graph_unchanged() {
    let mut c = CompositeFilter::new(1, 1);
    let g = c.add_block(Gain::new(1.0));
    c.connect_input_to_block(0, g, 0).unwrap();
    let before = c.connection_count();

    assert!(matches!(
        c.connect_block_to_block(g, 3, g, 0),
        Err(GraphError::OutputPortOutOfRange { .. })
    ));
    assert!(matches!(
        c.connect_input_to_block(0, g, 0),
        Err(GraphError::DuplicateConnection(_))
    ));
    assert!(matches!(
        c.connect_block_to_block(g, 0, g, 0),
        Err(GraphError::InputSlotTaken { port: 0, .. })
    ));
    assert_eq!(c.connection_count(), before);
    assert!(!c.is_valid());
}

#[test]
fn errors_implement_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&FilterError::IncompleteGraph("x".into()));
    assert_error(&GraphError::EmptyCascade);
}
