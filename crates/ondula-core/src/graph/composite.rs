//! Composite filter: wiring API, validity tracking and step orchestration.
//!
//! [`CompositeFilter`] owns an arena of nodes. Node 0 stands for the
//! composite's own boundary, so composite inputs and outputs are ordinary
//! connections out of and into that node. Wiring happens up front; each call
//! to [`compute_one_step()`](Filter::compute_one_step) then runs three passes:
//!
//! 1. **Cycle priming**: every delay pops last step's value into its
//!    downstream nodes, seeding feedback loops before any input arrives.
//! 2. **Injection**: each composite input is written into the slots it feeds
//!    and pushed through the graph recursively.
//! 3. **Collection**: every composite output must have been written;
//!    otherwise the step fails instead of emitting a default.
//!
//! The recursive push itself lives in `propagation.rs`.

#[cfg(not(feature = "std"))]
use alloc::{format, string::String, vec, vec::Vec};

use crate::block::Block;
use crate::filter::{Filter, FilterError, check_input_len};
use crate::gain::Gain;

use super::edge::Connection;
use super::node::{NodeData, NodeId, NodeKind};

/// Errors raised while wiring a composite filter.
///
/// A rejected call leaves the composite unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The specified node was not issued by this composite.
    NodeNotFound(NodeId),
    /// The node has no input slot with this index.
    InputPortOutOfRange {
        /// Node whose input was addressed ([`NodeId::BOUNDARY`] for composite outputs).
        node: NodeId,
        /// Requested slot.
        port: usize,
        /// Number of slots the node has.
        count: usize,
    },
    /// The node has no output port with this index.
    OutputPortOutOfRange {
        /// Node whose output was addressed ([`NodeId::BOUNDARY`] for composite inputs).
        node: NodeId,
        /// Requested port.
        port: usize,
        /// Number of ports the node has.
        count: usize,
    },
    /// An identical connection already exists.
    DuplicateConnection(Connection),
    /// The target slot already has a driver.
    InputSlotTaken {
        /// Node whose slot is taken ([`NodeId::BOUNDARY`] for composite outputs).
        node: NodeId,
        /// The taken slot.
        port: usize,
        /// The connection already driving it.
        driver: Connection,
    },
    /// The boundary was passed where a contained block is required; use the
    /// dedicated input/output wiring calls instead.
    BoundaryNotAllowed,
    /// A cascade was built without any block.
    EmptyCascade,
}

impl core::fmt::Display for GraphError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "node {id} not found"),
            Self::InputPortOutOfRange { node, port, count } => {
                write!(f, "{node} has {count} input(s), no input {port}")
            }
            Self::OutputPortOutOfRange { node, port, count } => {
                write!(f, "{node} has {count} output(s), no output {port}")
            }
            Self::DuplicateConnection(c) => write!(f, "connection {c} already exists"),
            Self::InputSlotTaken { node, port, driver } => {
                write!(f, "input {port} of {node} is already driven by {driver}")
            }
            Self::BoundaryNotAllowed => {
                write!(f, "the boundary node can only be wired through input/output calls")
            }
            Self::EmptyCascade => write!(f, "cascade has no blocks"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for GraphError {}

/// A graph of filters, including feedback loops, evaluated as one filter.
///
/// Every feedback loop must pass through a [`Delay`](crate::Delay); a loop
/// without one leaves some output unfilled and the step fails with
/// [`FilterError::IncompleteGraph`]. A failed step may leave delays
/// mid-update; call [`reset()`](Filter::reset) before evaluating again.
///
/// # Usage
///
/// 1. Create with [`new()`](Self::new)
/// 2. Add blocks: [`add_block()`](Self::add_block)
/// 3. Wire: [`connect_input_to_block()`](Self::connect_input_to_block),
///    [`connect_block_to_block()`](Self::connect_block_to_block),
///    [`connect_block_to_output()`](Self::connect_block_to_output),
///    [`connect_input_to_output()`](Self::connect_input_to_output)
/// 4. Process: [`compute_one_step()`](Filter::compute_one_step)
///
/// # Example
///
/// ```rust
/// use ondula_core::{Addition, CompositeFilter, Delay, Filter, Gain};
///
/// // y[n] = x[n] + 0.5 * y[n - 2]
/// let mut echo = CompositeFilter::new(1, 1);
/// let sum = echo.add_block(Addition::new());
/// let delay = echo.add_block(Delay::new(2));
/// let feedback = echo.add_block(Gain::new(0.5));
///
/// echo.connect_input_to_block(0, sum, 0)?;
/// echo.connect_block_to_block(sum, 0, delay, 0)?;
/// echo.connect_block_to_block(delay, 0, feedback, 0)?;
/// echo.connect_block_to_block(feedback, 0, sum, 1)?;
/// echo.connect_block_to_output(sum, 0, 0)?;
/// assert!(echo.is_valid());
///
/// let impulse = [1.0, 0.0, 0.0, 0.0, 0.0];
/// let out: Vec<f32> = impulse
///     .iter()
///     .map(|&x| echo.compute_one_step(&[x]).unwrap()[0])
///     .collect();
/// assert_eq!(out, vec![1.0, 0.0, 0.5, 0.0, 0.25]);
/// # Ok::<(), ondula_core::GraphError>(())
/// ```
pub struct CompositeFilter {
    input_count: usize,
    output_count: usize,
    /// Node arena; index 0 is the boundary.
    pub(crate) nodes: Vec<NodeData>,
    /// Output values collected during the current step.
    pub(crate) outputs: Vec<Option<f32>>,
    /// Per-node visited flags for the current step, indexed by node id.
    pub(crate) visited: Vec<bool>,
    valid: bool,
}

impl CompositeFilter {
    /// Creates an empty composite with the given external port counts.
    ///
    /// A composite with inputs or outputs is invalid until they are wired.
    pub fn new(input_count: usize, output_count: usize) -> Self {
        let mut composite = Self {
            input_count,
            output_count,
            nodes: vec![NodeData::boundary()],
            outputs: vec![None; output_count],
            visited: vec![false],
            valid: false,
        };
        composite.refresh_validity();
        composite
    }

    // --- Node mutations ---

    /// Adds a block to the graph and returns its ID.
    ///
    /// The block does nothing until it is connected.
    pub fn add_block(&mut self, block: impl Into<Block>) -> NodeId {
        let block = block.into();
        let id = NodeId(self.nodes.len() as u32);
        #[cfg(feature = "tracing")]
        tracing::debug!("composite_add: {} node {id}", block.kind_name());
        self.nodes.push(NodeData::new(block));
        self.visited.push(false);
        self.refresh_validity();
        id
    }

    /// Connects output `from_port` of `from` to input slot `to_port` of `to`.
    ///
    /// Returns an error if:
    /// - Either node doesn't exist, or either is the boundary
    /// - A port is out of range
    /// - The same connection already exists
    /// - Slot `to_port` of `to` already has a driver
    pub fn connect_block_to_block(
        &mut self,
        from: NodeId,
        from_port: usize,
        to: NodeId,
        to_port: usize,
    ) -> Result<(), GraphError> {
        let from_outputs = self.block_ref(from)?.output_count();
        let to_inputs = self.block_ref(to)?.input_count();
        check_port(from, from_port, from_outputs, false)?;
        check_port(to, to_port, to_inputs, true)?;
        self.insert(Connection::new(from, from_port, to, to_port))
    }

    /// Feeds composite input `input` into slot `to_port` of `to`.
    pub fn connect_input_to_block(
        &mut self,
        input: usize,
        to: NodeId,
        to_port: usize,
    ) -> Result<(), GraphError> {
        let to_inputs = self.block_ref(to)?.input_count();
        check_port(NodeId::BOUNDARY, input, self.input_count, false)?;
        check_port(to, to_port, to_inputs, true)?;
        self.insert(Connection::new(NodeId::BOUNDARY, input, to, to_port))
    }

    /// Routes output `from_port` of `from` to composite output `output`.
    pub fn connect_block_to_output(
        &mut self,
        from: NodeId,
        from_port: usize,
        output: usize,
    ) -> Result<(), GraphError> {
        let from_outputs = self.block_ref(from)?.output_count();
        check_port(from, from_port, from_outputs, false)?;
        check_port(NodeId::BOUNDARY, output, self.output_count, true)?;
        self.insert(Connection::new(from, from_port, NodeId::BOUNDARY, output))
    }

    /// Routes composite input `input` straight to composite output `output`
    /// with no filter in between.
    pub fn connect_input_to_output(&mut self, input: usize, output: usize) -> Result<(), GraphError> {
        check_port(NodeId::BOUNDARY, input, self.input_count, false)?;
        check_port(NodeId::BOUNDARY, output, self.output_count, true)?;
        self.insert(Connection::new(
            NodeId::BOUNDARY,
            input,
            NodeId::BOUNDARY,
            output,
        ))
    }

    // --- Introspection ---

    /// Returns `true` when every port and every contained block is wired.
    ///
    /// This is a necessary condition for evaluation, not a sufficient one: a
    /// feedback loop without a delay is only detected when a step runs.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Like [`is_valid()`](Self::is_valid), but names the first unmet rule.
    pub fn validate(&self) -> Result<(), FilterError> {
        match self.first_wiring_gap() {
            Some(reason) => Err(FilterError::IncompleteGraph(reason)),
            None => Ok(()),
        }
    }

    /// Number of contained blocks (the boundary is not counted).
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Number of connections, including those touching the boundary.
    pub fn connection_count(&self) -> usize {
        self.nodes.iter().map(|n| n.downstream.len()).sum()
    }

    /// Iterates every connection once, grouped by source node.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.nodes.iter().flat_map(|n| n.downstream.iter())
    }

    /// Iterates contained blocks with their IDs.
    pub fn blocks(&self) -> impl Iterator<Item = (NodeId, &Block)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.block().map(|b| (NodeId(i as u32), b)))
    }

    /// Returns the block behind `id`, or `None` for the boundary or a
    /// foreign ID.
    pub fn block(&self, id: NodeId) -> Option<&Block> {
        self.nodes.get(id.slot())?.block()
    }

    /// Mutable access to the [`Gain`](crate::Gain) behind `id`, for retuning
    /// between steps. `None` if `id` is not a gain block.
    pub fn gain_mut(&mut self, id: NodeId) -> Option<&mut Gain> {
        match &mut self.nodes.get_mut(id.slot())?.kind {
            NodeKind::Block(Block::Gain(gain)) => Some(gain),
            _ => None,
        }
    }

    // --- Internals ---

    fn block_ref(&self, id: NodeId) -> Result<&Block, GraphError> {
        if id.is_boundary() {
            return Err(GraphError::BoundaryNotAllowed);
        }
        self.block(id).ok_or(GraphError::NodeNotFound(id))
    }

    fn insert(&mut self, connection: Connection) -> Result<(), GraphError> {
        let source = &self.nodes[connection.from.slot()];
        if source.downstream.contains(&connection) {
            return Err(GraphError::DuplicateConnection(connection));
        }

        let target = &self.nodes[connection.to.slot()];
        if let Some(driver) = target
            .upstream
            .iter()
            .find(|c| c.to_port == connection.to_port)
        {
            return Err(GraphError::InputSlotTaken {
                node: connection.to,
                port: connection.to_port,
                driver: *driver,
            });
        }

        self.nodes[connection.from.slot()]
            .downstream
            .push(connection);
        self.nodes[connection.to.slot()].upstream.push(connection);
        self.refresh_validity();

        #[cfg(feature = "tracing")]
        tracing::debug!("composite_connect: {connection} (valid={})", self.valid);
        Ok(())
    }

    fn refresh_validity(&mut self) {
        self.valid = self.first_wiring_gap().is_none();
    }

    /// Describes the first violated wiring rule, if any.
    fn first_wiring_gap(&self) -> Option<String> {
        let boundary = &self.nodes[0];

        if let Some(input) =
            (0..self.input_count).find(|&i| !boundary.downstream.iter().any(|c| c.from_port == i))
        {
            return Some(format!("composite input {input} is not connected"));
        }

        if let Some(output) =
            (0..self.output_count).find(|&o| !boundary.upstream.iter().any(|c| c.to_port == o))
        {
            return Some(format!("composite output {output} is not connected"));
        }

        for (id, node) in self.nodes.iter().enumerate().skip(1) {
            let Some(block) = node.block() else {
                continue;
            };
            if node.upstream.len() < block.input_count() {
                return Some(format!(
                    "{} {} has {} of {} inputs connected",
                    block.kind_name(),
                    NodeId(id as u32),
                    node.upstream.len(),
                    block.input_count()
                ));
            }
            if node.downstream.len() < block.output_count() {
                return Some(format!(
                    "{} {} has {} of {} outputs connected",
                    block.kind_name(),
                    NodeId(id as u32),
                    node.downstream.len(),
                    block.output_count()
                ));
            }
        }

        None
    }

    /// Clears all per-step scratch state: visited flags and input buffers.
    pub(crate) fn clear_step_state(&mut self) {
        self.visited.fill(false);
        for node in &mut self.nodes {
            node.clear_buffer();
        }
    }

    /// Gathers the step's output vector, failing if any slot stayed empty or
    /// any delay was popped without being refilled.
    fn collect_outputs(&mut self) -> Result<Vec<f32>, FilterError> {
        if let Some(output) = self.outputs.iter().position(Option::is_none) {
            return Err(FilterError::IncompleteGraph(format!(
                "composite output {output} was not reached; check for a feedback loop without a delay"
            )));
        }

        if let Some(id) = self.nodes.iter().position(NodeData::is_delay_awaiting_refill) {
            return Err(FilterError::IncompleteGraph(format!(
                "delay {} never received its input",
                NodeId(id as u32)
            )));
        }

        Ok(self.outputs.iter_mut().filter_map(Option::take).collect())
    }
}

/// Fails unless `port < count`; `input` selects which error variant applies.
fn check_port(node: NodeId, port: usize, count: usize, input: bool) -> Result<(), GraphError> {
    if port < count {
        Ok(())
    } else if input {
        Err(GraphError::InputPortOutOfRange { node, port, count })
    } else {
        Err(GraphError::OutputPortOutOfRange { node, port, count })
    }
}

impl Filter for CompositeFilter {
    fn input_count(&self) -> usize {
        self.input_count
    }

    fn output_count(&self) -> usize {
        self.output_count
    }

    fn compute_one_step(&mut self, input: &[f32]) -> Result<Vec<f32>, FilterError> {
        // Reject before touching any state.
        check_input_len(input, self.input_count)?;
        if !self.valid {
            self.validate()?;
        }

        self.outputs.fill(None);
        let propagated = self
            .prime_delays()
            .and_then(|()| self.inject_inputs(input));
        self.clear_step_state();
        propagated?;

        let result = self.collect_outputs();
        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::trace!("composite_step failed: {err}");
        }
        result
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            if let NodeKind::Block(block) = &mut node.kind {
                block.reset();
            }
            node.clear_buffer();
        }
        self.outputs.fill(None);
        self.visited.fill(false);
    }
}

impl core::fmt::Debug for CompositeFilter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CompositeFilter")
            .field("inputs", &self.input_count)
            .field("outputs", &self.output_count)
            .field("nodes", &self.node_count())
            .field("connections", &self.connection_count())
            .field("valid", &self.valid)
            .finish()
    }
}
