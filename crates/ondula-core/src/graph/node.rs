//! Graph node types for composite filters.
//!
//! Each node in a composite has a [`NodeId`]. Node 0 is always the
//! composite's own boundary (its external inputs and outputs); every other
//! node wraps a [`Block`]. `NodeData` bundles the node's role with its
//! per-slot input buffer and its adjacency lists.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::block::Block;
use crate::filter::Filter;

use super::edge::Connection;

/// Identifier of a node inside one [`CompositeFilter`](super::CompositeFilter).
///
/// Node IDs are assigned sequentially by
/// [`add_block()`](super::CompositeFilter::add_block) and never reused.
/// They are only meaningful for the composite that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The composite's own boundary node.
    pub const BOUNDARY: NodeId = NodeId(0);

    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    /// Returns `true` for [`NodeId::BOUNDARY`].
    #[inline]
    pub fn is_boundary(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub(crate) fn slot(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for NodeId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_boundary() {
            f.write_str("NodeId(boundary)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// The role of a node.
pub(crate) enum NodeKind {
    /// The composite's external ports. Never computed.
    Boundary,
    /// A contained filter.
    Block(Block),
}

/// Internal bookkeeping for a node in the composite.
pub(crate) struct NodeData {
    pub kind: NodeKind,
    /// One slot per filter input; `None` until a value arrives this step.
    pub buffer: Vec<Option<f32>>,
    /// Connections arriving at this node, in wiring order.
    pub upstream: Vec<Connection>,
    /// Connections leaving this node, in wiring order.
    pub downstream: Vec<Connection>,
}

impl NodeData {
    pub fn boundary() -> Self {
        Self {
            kind: NodeKind::Boundary,
            buffer: Vec::new(),
            upstream: Vec::new(),
            downstream: Vec::new(),
        }
    }

    pub fn new(block: Block) -> Self {
        let inputs = block.input_count();
        Self {
            kind: NodeKind::Block(block),
            buffer: vec![None; inputs],
            upstream: Vec::new(),
            downstream: Vec::new(),
        }
    }

    pub fn block(&self) -> Option<&Block> {
        match &self.kind {
            NodeKind::Block(block) => Some(block),
            NodeKind::Boundary => None,
        }
    }

    pub fn is_delay(&self) -> bool {
        self.block().is_some_and(Block::is_delay)
    }

    pub fn is_delay_awaiting_refill(&self) -> bool {
        self.block().is_some_and(Block::is_delay_awaiting_refill)
    }

    /// Every slot holds a value, or the node is a delay that can pop now.
    pub fn all_inputs_available(&self) -> bool {
        if self.is_delay() && !self.is_delay_awaiting_refill() {
            return true;
        }
        self.buffer.iter().all(Option::is_some)
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.fill(None);
    }
}

/// Drains a slot buffer into a sample vector, leaving every slot empty.
///
/// Returns `None` if any slot was still empty.
pub(crate) fn take_slots(buffer: &mut [Option<f32>]) -> Option<Vec<f32>> {
    let values: Option<Vec<f32>> = buffer.iter().copied().collect();
    buffer.fill(None);
    values
}
