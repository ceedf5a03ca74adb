//! Series topology builder.
//!
//! [`CascadeBuilder`] collects blocks and wires them in series into a
//! one-input, one-output [`CompositeFilter`]: composite input 0 feeds the
//! first block, output 0 of each block feeds input 0 of the next, and the
//! last block drives composite output 0.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::block::Block;
use crate::graph::{CompositeFilter, GraphError};

/// Builds a series chain of blocks.
///
/// ```rust
/// use ondula_core::{CascadeBuilder, Filter, Gain};
///
/// let mut chain = CascadeBuilder::new()
///     .push(Gain::new(2.0))
///     .push(Gain::new(0.25))
///     .build()?;
/// assert_eq!(chain.compute_one_step(&[4.0]).unwrap(), vec![2.0]);
/// # Ok::<(), ondula_core::GraphError>(())
/// ```
#[derive(Debug, Default)]
pub struct CascadeBuilder {
    blocks: Vec<Block>,
}

impl CascadeBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a block to the end of the chain.
    #[must_use]
    pub fn push(mut self, block: impl Into<Block>) -> Self {
        self.blocks.push(block.into());
        self
    }

    /// Number of blocks pushed so far.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Wires the chain into a composite.
    ///
    /// Fails with [`GraphError::EmptyCascade`] when no block was pushed. A
    /// block with more than one input or output leaves the extra ports
    /// unwired, so the result reports [`is_valid()`](CompositeFilter::is_valid)
    /// as `false`.
    pub fn build(self) -> Result<CompositeFilter, GraphError> {
        if self.blocks.is_empty() {
            return Err(GraphError::EmptyCascade);
        }

        let mut composite = CompositeFilter::new(1, 1);
        let mut previous = None;
        for block in self.blocks {
            let id = composite.add_block(block);
            match previous {
                None => composite.connect_input_to_block(0, id, 0)?,
                Some(prev) => composite.connect_block_to_block(prev, 0, id, 0)?,
            }
            previous = Some(id);
        }
        if let Some(last) = previous {
            composite.connect_block_to_output(last, 0, 0)?;
        }
        Ok(composite)
    }
}

/// Wires `blocks` in series; shorthand for pushing each into a
/// [`CascadeBuilder`].
pub fn chain<I, B>(blocks: I) -> Result<CompositeFilter, GraphError>
where
    I: IntoIterator<Item = B>,
    B: Into<Block>,
{
    blocks
        .into_iter()
        .fold(CascadeBuilder::new(), |builder, block| builder.push(block))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Addition, Delay, Filter, Gain};

    #[test]
    fn empty_cascade_is_an_error() {
        assert!(CascadeBuilder::new().is_empty());
        assert_eq!(
            CascadeBuilder::new().build().unwrap_err(),
            GraphError::EmptyCascade
        );
    }

    #[test]
    fn single_block_cascade() {
        let mut c = CascadeBuilder::new().push(Gain::new(-1.0)).build().unwrap();
        assert!(c.is_valid());
        assert_eq!(c.node_count(), 1);
        assert_eq!(c.compute_one_step(&[0.5]).unwrap(), vec![-0.5]);
    }

    #[test]
    fn delays_in_series_add_up() {
        let mut c = chain([Delay::new(2), Delay::new(3)]).unwrap();
        assert_eq!(c.connection_count(), 3);
        let out: Vec<f32> = (0..7)
            .map(|n| {
                let x = if n == 0 { 1.0 } else { 0.0 };
                c.compute_one_step(&[x]).unwrap()[0]
            })
            .collect();
        assert_eq!(out, vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn multi_input_block_leaves_cascade_invalid() {
        let builder = CascadeBuilder::new()
            .push(Gain::new(1.0))
            .push(Addition::new());
        assert_eq!(builder.len(), 2);
        let c = builder.build().unwrap();
        assert!(!c.is_valid());
    }
}
