//! Bell-curve distribution strategy
//!
//! Shapes weights as a Gaussian centred on the middle of the list. Needs
//! every item unlocked.

use crate::repair::scale_to_available;
use crate::strategy::{DistributionStrategy, StrategyKind};
use rand::Rng;

/// Divisor applied to the item count to get the curve's standard deviation
pub const STD_DEV_DIVISOR: f64 = 2.5;

/// Bell-curve strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct BellCurveStrategy;

impl BellCurveStrategy {
    /// Create new bell-curve strategy
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Unscaled curve values for `count` positions
    ///
    /// `exp(-0.5 * ((i - center) / std_dev)^2)` with `center = (n - 1) / 2`
    /// and `std_dev = n / 2.5`.
    #[must_use]
    pub fn curve(count: usize) -> Vec<f64> {
        #[allow(clippy::cast_precision_loss)]
        let n = count as f64;
        let center = (n - 1.0) / 2.0;
        let std_dev = n / STD_DEV_DIVISOR;

        (0..count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let z = (i as f64 - center) / std_dev;
                (-0.5 * z * z).exp()
            })
            .collect()
    }
}

impl DistributionStrategy for BellCurveStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::BellCurve
    }

    fn weights<R: Rng + ?Sized>(&self, count: usize, available: u32, _rng: &mut R) -> Vec<u32> {
        scale_to_available(&Self::curve(count), available)
    }
}
