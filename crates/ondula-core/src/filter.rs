//! Core [`Filter`] trait and the evaluation error type.
//!
//! Every unit that can be placed in a filter graph implements [`Filter`]:
//! the primitives ([`Gain`](crate::Gain), [`Addition`](crate::Addition),
//! [`Delay`](crate::Delay)), the [`CompositeFilter`](crate::CompositeFilter)
//! that wires them together, and any user type boxed into
//! [`Block::Custom`](crate::Block::Custom).
//!
//! ## Design Decisions
//!
//! - **One frame per call**: a step consumes exactly one sample per input
//!   slot and produces exactly one sample per output slot.
//!
//! - **Object-safe**: composites store heterogeneous filters, so the trait
//!   must be usable as `dyn Filter`.
//!
//! - **No partial results**: a failed step returns an error and never a
//!   half-filled vector.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

/// Errors raised while evaluating a filter step.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The input vector length disagrees with the filter's input count.
    InvalidInput {
        /// Number of samples the filter declares.
        expected: usize,
        /// Number of samples actually supplied.
        got: usize,
    },
    /// The graph is not fully wired, or a step left an output unfilled.
    IncompleteGraph(String),
}

impl core::fmt::Display for FilterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidInput { expected, got } => {
                write!(f, "invalid input: expected {expected} samples, got {got}")
            }
            Self::IncompleteGraph(reason) => write!(f, "incomplete graph: {reason}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FilterError {}

/// Core trait for every filter that can be evaluated or placed in a graph.
///
/// # Example
///
/// ```rust
/// use ondula_core::{Filter, FilterError, check_input_len};
///
/// struct Invert;
///
/// impl Filter for Invert {
///     fn input_count(&self) -> usize {
///         1
///     }
///
///     fn output_count(&self) -> usize {
///         1
///     }
///
///     fn compute_one_step(&mut self, input: &[f32]) -> Result<Vec<f32>, FilterError> {
///         check_input_len(input, self.input_count())?;
///         Ok(vec![-input[0]])
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// assert_eq!(Invert.compute_one_step(&[0.25]).unwrap(), vec![-0.25]);
/// ```
pub trait Filter {
    /// Number of input slots.
    fn input_count(&self) -> usize;

    /// Number of output slots.
    fn output_count(&self) -> usize;

    /// Process one sample frame.
    ///
    /// `input` must hold exactly [`input_count()`](Self::input_count) samples;
    /// the returned vector holds exactly [`output_count()`](Self::output_count).
    ///
    /// # Errors
    ///
    /// [`FilterError::InvalidInput`] on a length mismatch,
    /// [`FilterError::IncompleteGraph`] when internal wiring cannot produce
    /// every output.
    fn compute_one_step(&mut self, input: &[f32]) -> Result<Vec<f32>, FilterError>;

    /// Restore construction-time state (delay lines back to silence).
    fn reset(&mut self);
}

/// Fails with [`FilterError::InvalidInput`] unless `input.len() == expected`.
#[inline]
pub fn check_input_len(input: &[f32], expected: usize) -> Result<(), FilterError> {
    if input.len() == expected {
        Ok(())
    } else {
        Err(FilterError::InvalidInput {
            expected,
            got: input.len(),
        })
    }
}
