//! Random distribution strategy
//!
//! The random source is supplied by the caller, so a seeded generator gives
//! reproducible results.

use crate::repair::scale_to_available;
use crate::strategy::{DistributionStrategy, StrategyKind};
use rand::Rng;

/// Random strategy: uniform `[0, 1)` raw value per unlocked item
///
/// Allowed alongside locked items.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStrategy;

impl RandomStrategy {
    /// Create new random strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DistributionStrategy for RandomStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Random
    }

    fn weights<R: Rng + ?Sized>(&self, count: usize, available: u32, rng: &mut R) -> Vec<u32> {
        let raw: Vec<f64> = (0..count).map(|_| rng.random::<f64>()).collect();
        scale_to_available(&raw, available)
    }
}
