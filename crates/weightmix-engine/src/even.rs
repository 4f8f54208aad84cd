//! Even distribution strategy
//!
//! Equal shares for every unlocked item. Works alongside locked items.

use crate::repair::even_split;
use crate::strategy::{DistributionStrategy, StrategyKind};
use rand::Rng;

/// Even strategy: `floor(available / n)` each, remainder to the first items
#[derive(Debug, Clone, Copy, Default)]
pub struct EvenStrategy;

impl EvenStrategy {
    /// Create new even strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DistributionStrategy for EvenStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Even
    }

    fn weights<R: Rng + ?Sized>(&self, count: usize, available: u32, _rng: &mut R) -> Vec<u32> {
        even_split(available, count)
    }
}
