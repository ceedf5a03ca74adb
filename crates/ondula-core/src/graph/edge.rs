//! Port-level connections between nodes.
//!
//! A [`Connection`] is stored twice: in the `downstream` list of its source
//! node and in the `upstream` list of its target node. Connections touching
//! the boundary use the composite's external port numbers: a composite input
//! is a connection *from* the boundary, a composite output is a connection
//! *into* it.

use super::node::NodeId;

/// A directed connection from one node's output port to another node's
/// input slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Connection {
    /// Source node.
    pub from: NodeId,
    /// Output port on the source (composite input index for the boundary).
    pub from_port: usize,
    /// Destination node.
    pub to: NodeId,
    /// Input slot on the destination (composite output index for the boundary).
    pub to_port: usize,
}

impl Connection {
    /// Creates a new connection.
    pub fn new(from: NodeId, from_port: usize, to: NodeId, to_port: usize) -> Self {
        Self {
            from,
            from_port,
            to,
            to_port,
        }
    }

    /// Returns `true` for a composite input wired straight to a composite output.
    pub fn is_pass_through(&self) -> bool {
        self.from.is_boundary() && self.to.is_boundary()
    }
}

impl core::fmt::Display for Connection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}:{} → {}:{}",
            self.from, self.from_port, self.to, self.to_port
        )
    }
}
