//! Ondula Core - composite filter graphs with feedback
//!
//! This crate provides a small set of sample-at-a-time DSP primitives and an
//! engine that wires them into arbitrary directed graphs, feedback loops
//! included, which then behave as a single filter.
//!
//! # Core Abstractions
//!
//! ## Filter Contract
//!
//! - [`Filter`] - Object-safe trait: input/output counts, one step, reset
//! - [`FilterError`] - Wrong-length input or a graph that cannot be evaluated
//!
//! ## Primitives
//!
//! - [`Gain`] - Multiply by a constant
//! - [`Addition`] - Sum two inputs
//! - [`Delay`] - Fixed-length FIFO; the element that makes feedback computable
//!
//! ## Graphs
//!
//! - [`Block`] - Tagged variant of everything that can sit in a node
//! - [`CompositeFilter`] - Port-level graph evaluated by recursive push propagation
//! - [`CascadeBuilder`] - Series chains in one call
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ondula-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature to log wiring and step failures.
//!
//! # Example
//!
//! ```rust
//! use ondula_core::{CascadeBuilder, CompositeFilter, Delay, Filter, Gain};
//!
//! // Half-level copy of the input, three samples late.
//! let mut filter: CompositeFilter = CascadeBuilder::new()
//!     .push(Delay::new(3))
//!     .push(Gain::new(0.5))
//!     .build()?;
//!
//! let out: Vec<f32> = [1.0, 0.0, 0.0, 0.0]
//!     .iter()
//!     .map(|&x| filter.compute_one_step(&[x]).unwrap()[0])
//!     .collect();
//! assert_eq!(out, vec![0.0, 0.0, 0.0, 0.5]);
//! # Ok::<(), ondula_core::GraphError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod addition;
pub mod block;
pub mod cascade;
pub mod delay;
pub mod filter;
pub mod gain;
pub mod graph;

// Re-export main types at crate root
pub use addition::Addition;
pub use block::Block;
pub use cascade::{CascadeBuilder, chain};
pub use delay::Delay;
pub use filter::{Filter, FilterError, check_input_len};
pub use gain::Gain;
pub use graph::{CompositeFilter, Connection, GraphError, NodeId};
