//! Recursive push propagation through a composite's node arena.
//!
//! A node fires once all of its input slots hold a value, then pushes each
//! output into the slots it feeds and recurses into those nodes. Delays are
//! the exception that makes feedback computable:
//!
//! - **Phase 1**: a delay that has not popped yet is always ready. It pops
//!   last step's value and forwards it, but is *not* marked visited, so its
//!   real input can still reach it later in the same step.
//! - **Phase 2**: when that input arrives the delay enqueues it, is marked
//!   visited, and forwards nothing (its output already went out in phase 1).
//!
//! The visited flags stop a node reached through several paths, or through a
//! loop, from firing twice in one step.

#[cfg(not(feature = "std"))]
use alloc::{format, vec, vec::Vec};

use crate::block::Block;
use crate::filter::{Filter, FilterError};

use super::composite::CompositeFilter;
use super::edge::Connection;
use super::node::{NodeId, NodeKind, take_slots};

impl CompositeFilter {
    /// Cycle-priming pass: give every delay the chance to pop.
    pub(crate) fn prime_delays(&mut self) -> Result<(), FilterError> {
        for slot in 1..self.nodes.len() {
            if self.nodes[slot].is_delay() {
                self.compute_node(NodeId(slot as u32))?;
            }
        }
        Ok(())
    }

    /// Injection pass: push every composite input into the nodes it feeds.
    pub(crate) fn inject_inputs(&mut self, input: &[f32]) -> Result<(), FilterError> {
        for k in 0..self.nodes[0].downstream.len() {
            let connection = self.nodes[0].downstream[k];
            self.deliver(connection, input[connection.from_port])?;
        }
        Ok(())
    }

    /// Fires `id` if it is ready, then pushes its outputs downstream.
    pub(crate) fn compute_node(&mut self, id: NodeId) -> Result<(), FilterError> {
        let slot = id.slot();
        if self.visited[slot] {
            return Ok(());
        }

        let node = &mut self.nodes[slot];
        if !node.all_inputs_available() {
            // Still waiting on another path; a later push retries.
            return Ok(());
        }

        let NodeKind::Block(block) = &mut node.kind else {
            return Ok(());
        };

        let output = match block {
            Block::Delay(delay) if !delay.is_awaiting_refill() => vec![delay.pop()],
            Block::Delay(delay) => {
                let input = take_slots(&mut node.buffer).ok_or_else(|| empty_slot(id))?;
                delay.enqueue(input[0]);
                self.visited[slot] = true;
                return Ok(());
            }
            _ => {
                let input = take_slots(&mut node.buffer).ok_or_else(|| empty_slot(id))?;
                let output = block.compute_one_step(&input)?;
                self.visited[slot] = true;
                output
            }
        };

        self.forward(id, &output)
    }

    /// Pushes `output` along every connection leaving `id`.
    fn forward(&mut self, id: NodeId, output: &[f32]) -> Result<(), FilterError> {
        for k in 0..self.nodes[id.slot()].downstream.len() {
            let connection = self.nodes[id.slot()].downstream[k];
            let value = output.get(connection.from_port).copied().ok_or_else(|| {
                FilterError::IncompleteGraph(format!(
                    "{id} produced {} output(s) but output {} is wired",
                    output.len(),
                    connection.from_port
                ))
            })?;
            self.deliver(connection, value)?;
        }
        Ok(())
    }

    /// Writes `value` into the connection's target and fires it; values
    /// reaching the boundary land in the composite's output slots.
    fn deliver(&mut self, connection: Connection, value: f32) -> Result<(), FilterError> {
        if connection.to.is_boundary() {
            self.outputs[connection.to_port] = Some(value);
            return Ok(());
        }
        self.nodes[connection.to.slot()].buffer[connection.to_port] = Some(value);
        self.compute_node(connection.to)
    }
}

fn empty_slot(id: NodeId) -> FilterError {
    FilterError::IncompleteGraph(format!("{id} fired with an empty input slot"))
}

#[cfg(test)]
mod tests {
    use crate::{Addition, CompositeFilter, Delay, Filter, Gain};

    fn run(filter: &mut CompositeFilter, input: &[f32]) -> Vec<f32> {
        input
            .iter()
            .map(|&x| filter.compute_one_step(&[x]).unwrap()[0])
            .collect()
    }

    #[test]
    fn diamond_fires_merge_once() {
        // x → a(×2) ─┐
        //  └→ b(×3) ─┴→ sum → out
        let mut c = CompositeFilter::new(1, 1);
        let a = c.add_block(Gain::new(2.0));
        let b = c.add_block(Gain::new(3.0));
        let sum = c.add_block(Addition::new());
        c.connect_input_to_block(0, a, 0).unwrap();
        c.connect_input_to_block(0, b, 0).unwrap();
        c.connect_block_to_block(a, 0, sum, 0).unwrap();
        c.connect_block_to_block(b, 0, sum, 1).unwrap();
        c.connect_block_to_output(sum, 0, 0).unwrap();
        assert_eq!(run(&mut c, &[1.0, -2.0]), vec![5.0, -10.0]);
    }

    #[test]
    fn delay_feeding_delay() {
        // Two chained delays behave like one of the summed length,
        // whatever order the priming pass visits them in.
        let mut c = CompositeFilter::new(1, 1);
        let second = c.add_block(Delay::new(2));
        let first = c.add_block(Delay::new(1));
        c.connect_input_to_block(0, first, 0).unwrap();
        c.connect_block_to_block(first, 0, second, 0).unwrap();
        c.connect_block_to_output(second, 0, 0).unwrap();
        assert_eq!(
            run(&mut c, &[1.0, 2.0, 3.0, 4.0, 5.0]),
            vec![0.0, 0.0, 0.0, 1.0, 2.0]
        );
    }

    #[test]
    fn delay_feeding_delay_reverse_order() {
        let mut c = CompositeFilter::new(1, 1);
        let first = c.add_block(Delay::new(1));
        let second = c.add_block(Delay::new(2));
        c.connect_input_to_block(0, first, 0).unwrap();
        c.connect_block_to_block(first, 0, second, 0).unwrap();
        c.connect_block_to_output(second, 0, 0).unwrap();
        assert_eq!(
            run(&mut c, &[1.0, 2.0, 3.0, 4.0, 5.0]),
            vec![0.0, 0.0, 0.0, 1.0, 2.0]
        );
    }

    #[test]
    fn self_loop_delay_circulates() {
        // sum = x + d; d holds sum for 2 steps. An impulse repeats every 2 steps.
        let mut c = CompositeFilter::new(1, 1);
        let sum = c.add_block(Addition::new());
        let d = c.add_block(Delay::new(2));
        c.connect_input_to_block(0, sum, 0).unwrap();
        c.connect_block_to_block(d, 0, sum, 1).unwrap();
        c.connect_block_to_block(sum, 0, d, 0).unwrap();
        c.connect_block_to_output(sum, 0, 0).unwrap();
        assert_eq!(
            run(&mut c, &[1.0, 0.0, 0.0, 0.0, 0.0]),
            vec![1.0, 0.0, 1.0, 0.0, 1.0]
        );
    }

    #[test]
    fn delay_tap_feeds_output_directly() {
        // The delay's popped value reaches the output during priming.
        let mut c = CompositeFilter::new(1, 2);
        let d = c.add_block(Delay::new(1));
        c.connect_input_to_block(0, d, 0).unwrap();
        c.connect_block_to_output(d, 0, 0).unwrap();
        c.connect_input_to_output(0, 1).unwrap();
        assert_eq!(c.compute_one_step(&[0.5]).unwrap(), vec![0.0, 0.5]);
        assert_eq!(c.compute_one_step(&[0.25]).unwrap(), vec![0.5, 0.25]);
    }

    #[test]
    fn unfed_delay_fails_the_step() {
        // The delay's only source sits in a delay-free loop, so it never refills.
        let mut c = CompositeFilter::new(1, 1);
        let sum = c.add_block(Addition::new());
        let g = c.add_block(Gain::new(1.0));
        let d = c.add_block(Delay::new(1));
        c.connect_input_to_block(0, sum, 0).unwrap();
        c.connect_block_to_block(g, 0, sum, 1).unwrap();
        c.connect_block_to_block(sum, 0, g, 0).unwrap();
        c.connect_block_to_block(sum, 0, d, 0).unwrap();
        c.connect_block_to_output(d, 0, 0).unwrap();
        assert!(c.is_valid());

        let err = c.compute_one_step(&[1.0]).unwrap_err();
        assert!(err.to_string().contains("never received"), "got: {err}");
    }
}
