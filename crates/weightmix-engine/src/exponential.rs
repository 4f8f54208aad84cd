//! Exponential-decay distribution strategy

use crate::repair::scale_to_available;
use crate::strategy::{DistributionStrategy, StrategyKind};
use rand::Rng;

/// Ratio between the last and first raw value
pub const DECAY_FLOOR: f64 = 0.1;

/// Exponential strategy: each item gets a fixed fraction of the previous one
///
/// Needs every item unlocked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialStrategy;

impl ExponentialStrategy {
    /// Create new exponential strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decay base `0.1^(1 / (n - 1))`, with `n - 1` floored at 1
    #[must_use]
    pub fn base(count: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let steps = count.saturating_sub(1).max(1) as f64;
        DECAY_FLOOR.powf(1.0 / steps)
    }

    /// Unscaled curve values `base^i`
    #[must_use]
    pub fn curve(count: usize) -> Vec<f64> {
        let base = Self::base(count);
        (0..count)
            .map(|i| base.powi(i32::try_from(i).unwrap_or(i32::MAX)))
            .collect()
    }
}

impl DistributionStrategy for ExponentialStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Exponential
    }

    fn weights<R: Rng + ?Sized>(&self, count: usize, available: u32, _rng: &mut R) -> Vec<u32> {
        scale_to_available(&Self::curve(count), available)
    }
}
