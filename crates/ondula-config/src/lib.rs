//! Patch files for ondula filter graphs.
//!
//! A patch describes a [`CompositeFilter`](ondula_core::CompositeFilter) in
//! TOML: named blocks (primitives, the effects from `ondula-effects`, or a
//! nested patch) and the connections between them.
//!
//! # Features
//!
//! - **Patch format**: [`Patch`] loads and saves TOML, see its docs for the layout
//! - **Endpoints**: `"<block>[:<port>]"` strings, with the reserved names
//!   [`INPUT`] and [`OUTPUT`] for the composite's own ports
//! - **Building**: [`Patch::build()`] resolves ids and wires the graph,
//!   reporting unknown or reserved ids and bad parameters as [`ConfigError`]
//!
//! # Example
//!
//! ```rust
//! use ondula_config::{BlockKind, Endpoint, Patch};
//! use ondula_core::Filter;
//!
//! let patch = Patch::new("double", 1, 1)
//!     .with_block("g", BlockKind::Gain { gain: 2.0 })
//!     .with_connection(Endpoint::input(0), Endpoint::block("g", 0))
//!     .with_connection(Endpoint::block("g", 0), Endpoint::output(0));
//!
//! let mut filter = patch.build()?;
//! assert_eq!(filter.compute_one_step(&[0.25])?, vec![0.5]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod endpoint;
mod error;
mod patch;

pub use endpoint::{Endpoint, INPUT, OUTPUT, is_reserved};
pub use error::ConfigError;
pub use patch::{BlockConfig, BlockKind, ConnectionConfig, Patch};
