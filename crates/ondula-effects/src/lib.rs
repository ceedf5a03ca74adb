//! Ondula Effects - named composite filters
//!
//! Every filter in this crate is a one-input, one-output
//! [`CompositeFilter`](ondula_core::CompositeFilter) wired from the core
//! primitives through the public graph API:
//!
//! - [`echo`] - Recirculating echo
//! - [`alt_echo`] - Single-repeat feed-forward echo
//! - [`all_pass`] - Schroeder all-pass section
//! - [`low_pass`] - Recursive low-pass
//! - [`nested_all_pass`] - All-pass with another filter inside its delay
//! - [`reverberator`] - Room reverb built from all of the above
//! - [`AllPassCascadeBuilder`] - Series of all-pass sections
//!
//! Constructors return `Result` because they go through the same checked
//! wiring calls as user code.
//!
//! ## Example
//!
//! ```rust
//! use ondula_core::{CascadeBuilder, Filter};
//! use ondula_effects::{echo, low_pass};
//!
//! let mut chain = CascadeBuilder::new()
//!     .push(echo(0.5, 4410)?)
//!     .push(low_pass(0.3, 1)?)
//!     .build()?;
//! let out = chain.compute_one_step(&[1.0]).unwrap();
//! assert_eq!(out.len(), 1);
//! # Ok::<(), ondula_core::GraphError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod all_pass;
pub mod echo;
pub mod low_pass;
pub mod nested;
pub mod reverb;

// Re-export main types at crate root
pub use all_pass::{AllPassCascadeBuilder, all_pass};
pub use echo::{alt_echo, echo};
pub use low_pass::low_pass;
pub use nested::nested_all_pass;
pub use reverb::reverberator;
