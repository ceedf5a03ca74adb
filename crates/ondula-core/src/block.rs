//! Tagged variant over everything that can sit in a graph node.
//!
//! A [`Block`] dispatches [`Filter`] calls to its inner value with a `match`,
//! and answers the one question the propagation algorithm needs to ask about
//! a node: is it a delay, and is that delay awaiting refill?

#[cfg(not(feature = "std"))]
use alloc::{boxed::Box, vec::Vec};

use crate::addition::Addition;
use crate::delay::Delay;
use crate::filter::{Filter, FilterError};
use crate::gain::Gain;
use crate::graph::CompositeFilter;

/// A filter placed in a [`CompositeFilter`].
pub enum Block {
    /// Constant gain stage.
    Gain(Gain),
    /// Two-input summing junction.
    Addition(Addition),
    /// Fixed-length delay; the only variant that may sit in a feedback loop
    /// without breaking evaluation.
    Delay(Delay),
    /// A nested composite, evaluated as an opaque filter.
    Composite(Box<CompositeFilter>),
    /// Any other [`Filter`] implementation.
    Custom(Box<dyn Filter + Send>),
}

impl Block {
    /// Wraps a user-defined filter.
    pub fn custom(filter: impl Filter + Send + 'static) -> Self {
        Self::Custom(Box::new(filter))
    }

    /// Short human-readable name of the variant.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Gain(_) => "gain",
            Self::Addition(_) => "addition",
            Self::Delay(_) => "delay",
            Self::Composite(_) => "composite",
            Self::Custom(_) => "custom",
        }
    }

    /// Returns `true` for [`Block::Delay`].
    pub fn is_delay(&self) -> bool {
        matches!(self, Self::Delay(_))
    }

    /// Returns `true` for a [`Block::Delay`] that has popped this step and
    /// not yet been refilled. Always `false` for other variants.
    pub fn is_delay_awaiting_refill(&self) -> bool {
        match self {
            Self::Delay(delay) => delay.is_awaiting_refill(),
            _ => false,
        }
    }

    /// Returns the inner composite, if this is a [`Block::Composite`].
    pub fn as_composite(&self) -> Option<&CompositeFilter> {
        match self {
            Self::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    fn as_filter(&self) -> &dyn Filter {
        match self {
            Self::Gain(f) => f,
            Self::Addition(f) => f,
            Self::Delay(f) => f,
            Self::Composite(f) => &**f,
            Self::Custom(f) => &**f,
        }
    }

    fn as_filter_mut(&mut self) -> &mut dyn Filter {
        match self {
            Self::Gain(f) => f,
            Self::Addition(f) => f,
            Self::Delay(f) => f,
            Self::Composite(f) => &mut **f,
            Self::Custom(f) => &mut **f,
        }
    }
}

impl Filter for Block {
    fn input_count(&self) -> usize {
        self.as_filter().input_count()
    }

    fn output_count(&self) -> usize {
        self.as_filter().output_count()
    }

    fn compute_one_step(&mut self, input: &[f32]) -> Result<Vec<f32>, FilterError> {
        self.as_filter_mut().compute_one_step(input)
    }

    fn reset(&mut self) {
        self.as_filter_mut().reset();
    }
}

impl core::fmt::Debug for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Gain(g) => f.debug_tuple("Gain").field(&g.gain()).finish(),
            Self::Addition(_) => f.write_str("Addition"),
            Self::Delay(d) => f.debug_tuple("Delay").field(&d.capacity()).finish(),
            Self::Composite(c) => f.debug_tuple("Composite").field(c).finish(),
            Self::Custom(c) => f
                .debug_struct("Custom")
                .field("inputs", &c.input_count())
                .field("outputs", &c.output_count())
                .finish(),
        }
    }
}

impl From<Gain> for Block {
    fn from(gain: Gain) -> Self {
        Self::Gain(gain)
    }
}

impl From<Addition> for Block {
    fn from(addition: Addition) -> Self {
        Self::Addition(addition)
    }
}

impl From<Delay> for Block {
    fn from(delay: Delay) -> Self {
        Self::Delay(delay)
    }
}

impl From<CompositeFilter> for Block {
    fn from(composite: CompositeFilter) -> Self {
        Self::Composite(Box::new(composite))
    }
}

impl From<Box<dyn Filter + Send>> for Block {
    fn from(filter: Box<dyn Filter + Send>) -> Self {
        Self::Custom(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Swap;

    impl Filter for Swap {
        fn input_count(&self) -> usize {
            2
        }
        fn output_count(&self) -> usize {
            2
        }
        fn compute_one_step(&mut self, input: &[f32]) -> Result<Vec<f32>, FilterError> {
            crate::check_input_len(input, 2)?;
            Ok(vec![input[1], input[0]])
        }
        fn reset(&mut self) {}
    }

    #[test]
    fn dispatches_to_inner_filter() {
        let mut block = Block::from(Gain::new(3.0));
        assert_eq!(block.input_count(), 1);
        assert_eq!(block.compute_one_step(&[2.0]).unwrap(), vec![6.0]);

        let mut block = Block::from(Addition::new());
        assert_eq!(block.input_count(), 2);
        assert_eq!(block.compute_one_step(&[2.0, 1.0]).unwrap(), vec![3.0]);
    }

    #[test]
    fn custom_filters_keep_their_arity() {
        let mut block = Block::custom(Swap);
        assert_eq!(block.kind_name(), "custom");
        assert_eq!(block.output_count(), 2);
        assert_eq!(block.compute_one_step(&[1.0, 2.0]).unwrap(), vec![2.0, 1.0]);
        assert!(!block.is_delay());
    }

    #[test]
    fn refill_query_only_true_for_popped_delay() {
        let mut block = Block::from(Delay::new(2));
        assert!(block.is_delay());
        assert!(!block.is_delay_awaiting_refill());

        if let Block::Delay(delay) = &mut block {
            delay.pop();
        }
        assert!(block.is_delay_awaiting_refill());

        block.reset();
        assert!(!block.is_delay_awaiting_refill());
        assert!(!Block::from(Gain::new(1.0)).is_delay_awaiting_refill());
    }

    #[test]
    fn debug_names_variant() {
        let text = format!("{:?}", Block::from(Delay::new(7)));
        assert_eq!(text, "Delay(7)");
    }
}
