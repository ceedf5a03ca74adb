//! Composite filter graphs with feedback.
//!
//! A [`CompositeFilter`] wires [`Block`](crate::Block)s together by port and
//! then behaves as a single [`Filter`](crate::Filter) with its own input and
//! output counts. Because a composite is itself a block, graphs nest to any
//! depth.
//!
//! # Evaluation model
//!
//! There is no compile step and no schedule. Each call to
//! [`compute_one_step()`](crate::Filter::compute_one_step) pushes values
//! through the graph recursively:
//!
//! - a node fires once every one of its input slots holds a value;
//! - a [`Delay`](crate::Delay) fires twice per step: first it emits the value
//!   stored on a previous step, later it accepts this step's input;
//! - a feedback loop is therefore computable exactly when it contains a delay.
//!
//! Wiring rules (every port connected, every block fully wired) are checked
//! eagerly and exposed through [`CompositeFilter::is_valid()`]. Loops without
//! a delay can only be detected by running a step, which then fails with
//! [`FilterError::IncompleteGraph`](crate::FilterError::IncompleteGraph).
//!
//! # no_std Support
//!
//! This module is `no_std` compatible with `alloc`.

pub mod composite;
pub mod edge;
pub mod node;
mod propagation;

pub use composite::{CompositeFilter, GraphError};
pub use edge::Connection;
pub use node::NodeId;
