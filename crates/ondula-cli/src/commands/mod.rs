//! CLI command implementations.

pub mod impulse;
pub mod info;
pub mod process;
pub mod validate;
