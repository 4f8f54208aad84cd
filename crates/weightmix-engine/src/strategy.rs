//! Distribution strategy trait and core types
//!
//! Provides the [`DistributionStrategy`] trait for replacing the weights of
//! every unlocked item at once, and [`StrategyKind`] for selecting a
//! built-in strategy by name.

use crate::bell_curve::BellCurveStrategy;
use crate::even::EvenStrategy;
use crate::exponential::ExponentialStrategy;
use crate::item::{assign_unlocked, available_weight, has_locked, unlocked_count, Item};
use crate::random::RandomStrategy;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Strategy producing a full weight assignment for unlocked items
///
/// Implementors only describe the curve through [`weights`]; the provided
/// [`distribute`] handles admission checks and keeps locked items intact.
///
/// [`weights`]: DistributionStrategy::weights
/// [`distribute`]: DistributionStrategy::distribute
pub trait DistributionStrategy: Send + Sync + std::fmt::Debug {
    /// Which built-in strategy this is
    fn kind(&self) -> StrategyKind;

    /// Whether the strategy may run while some items are locked
    fn allows_locked(&self) -> bool {
        self.kind().allows_locked()
    }

    /// Produce `count` weights summing exactly to `available`
    ///
    /// Position `i` of the result belongs to the `i`-th unlocked item.
    fn weights<R: Rng + ?Sized>(&self, count: usize, available: u32, rng: &mut R) -> Vec<u32>;

    /// Check whether the strategy can run on `items`
    ///
    /// # Errors
    /// - `DistributionError::NoItems` for an empty list
    /// - `DistributionError::NoUnlockedItems` when every item is locked
    /// - `DistributionError::LockedItemsPresent` when the strategy needs
    ///   full availability and some item is locked
    fn check(&self, items: &[Item]) -> Result<(), DistributionError> {
        if items.is_empty() {
            return Err(DistributionError::NoItems);
        }
        if unlocked_count(items) == 0 {
            return Err(DistributionError::NoUnlockedItems);
        }
        if !self.allows_locked() && has_locked(items) {
            return Err(DistributionError::LockedItemsPresent {
                strategy: self.kind(),
            });
        }
        Ok(())
    }

    /// Replace unlocked weights with this strategy's assignment
    ///
    /// # Errors
    /// Same as [`DistributionStrategy::check`]; the input is never modified.
    fn distribute<R: Rng + ?Sized>(
        &self,
        items: &[Item],
        rng: &mut R,
    ) -> Result<Vec<Item>, DistributionError> {
        if let Err(e) = self.check(items) {
            tracing::trace!(strategy = %self.kind(), error = %e, "distribution rejected");
            return Err(e);
        }

        let available = available_weight(items);
        let weights = self.weights(unlocked_count(items), available, rng);
        Ok(assign_unlocked(items, &weights))
    }
}

/// Built-in strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Equal shares, remainder to the first items
    Even,

    /// Gaussian bump centred on the middle of the list
    #[serde(rename = "bell")]
    BellCurve,

    /// Geometric decay from first to last item
    Exponential,

    /// Uniform random shares
    Random,
}

impl StrategyKind {
    /// All built-in strategies
    pub const ALL: [StrategyKind; 4] = [
        Self::Even,
        Self::BellCurve,
        Self::Exponential,
        Self::Random,
    ];

    /// Strategy name (for display/serialization)
    #[inline]
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Even => "even",
            Self::BellCurve => "bell",
            Self::Exponential => "exponential",
            Self::Random => "random",
        }
    }

    /// Curve shapes need every item available; even and random do not
    #[inline]
    #[must_use]
    pub fn allows_locked(self) -> bool {
        matches!(self, Self::Even | Self::Random)
    }
}

impl std::fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for StrategyKind {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "even" => Ok(Self::Even),
            "bell" | "bell-curve" | "bell_curve" | "bellcurve" => Ok(Self::BellCurve),
            "exponential" | "exp" => Ok(Self::Exponential),
            "random" => Ok(Self::Random),
            other => Err(DistributionError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Distribution error
///
/// Every variant means the input was left as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DistributionError {
    /// Nothing to distribute over
    #[error("no items to distribute")]
    NoItems,

    /// Every item is locked
    #[error("all items are locked")]
    NoUnlockedItems,

    /// Strategy requires every item to be unlocked
    #[error("{strategy} distribution requires all items unlocked")]
    LockedItemsPresent {
        /// Rejected strategy
        strategy: StrategyKind,
    },

    /// Unrecognised strategy name
    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),
}

/// Run the built-in strategy `kind` over `items`
///
/// # Errors
/// See [`DistributionStrategy::check`].
pub fn distribute<R: Rng + ?Sized>(
    kind: StrategyKind,
    items: &[Item],
    rng: &mut R,
) -> Result<Vec<Item>, DistributionError> {
    match kind {
        StrategyKind::Even => EvenStrategy.distribute(items, rng),
        StrategyKind::BellCurve => BellCurveStrategy.distribute(items, rng),
        StrategyKind::Exponential => ExponentialStrategy.distribute(items, rng),
        StrategyKind::Random => RandomStrategy.distribute(items, rng),
    }
}

/// Whether `kind` would be accepted for `items`
#[must_use]
pub fn can_apply(kind: StrategyKind, items: &[Item]) -> bool {
    let result = match kind {
        StrategyKind::Even => EvenStrategy.check(items),
        StrategyKind::BellCurve => BellCurveStrategy.check(items),
        StrategyKind::Exponential => ExponentialStrategy.check(items),
        StrategyKind::Random => RandomStrategy.check(items),
    };
    result.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unlocked(n: usize) -> Vec<Item> {
        (0..n).map(|i| Item::new(format!("item {i}"), 10)).collect()
    }

    #[test]
    fn kind_from_str_aliases() {
        assert_eq!("bell-curve".parse::<StrategyKind>(), Ok(StrategyKind::BellCurve));
        assert_eq!(" EVEN ".parse::<StrategyKind>(), Ok(StrategyKind::Even));
        assert_eq!("exp".parse::<StrategyKind>(), Ok(StrategyKind::Exponential));
        assert!(matches!(
            "zigzag".parse::<StrategyKind>(),
            Err(DistributionError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn kind_display_matches_name() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.to_string(), kind.name());
            assert_eq!(kind.name().parse::<StrategyKind>(), Ok(kind));
        }
    }

    #[test]
    fn kind_serde_names() {
        let json = serde_json::to_string(&StrategyKind::BellCurve).unwrap();
        assert_eq!(json, "\"bell\"");
        let kind: StrategyKind = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(kind, StrategyKind::Random);
    }

    #[test]
    fn allows_locked_table() {
        assert!(StrategyKind::Even.allows_locked());
        assert!(StrategyKind::Random.allows_locked());
        assert!(!StrategyKind::BellCurve.allows_locked());
        assert!(!StrategyKind::Exponential.allows_locked());
    }

    #[test]
    fn empty_list_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        for kind in StrategyKind::ALL {
            assert_eq!(distribute(kind, &[], &mut rng), Err(DistributionError::NoItems));
        }
    }

    #[test]
    fn all_locked_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let items: Vec<Item> = unlocked(3).into_iter().map(|i| i.with_locked(true)).collect();
        assert_eq!(
            distribute(StrategyKind::Even, &items, &mut rng),
            Err(DistributionError::NoUnlockedItems)
        );
        assert!(!can_apply(StrategyKind::Random, &items));
    }

    #[test]
    fn curve_rejected_with_lock() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut items = unlocked(3);
        items[1].locked = true;

        let err = distribute(StrategyKind::Exponential, &items, &mut rng).unwrap_err();
        assert_eq!(
            err,
            DistributionError::LockedItemsPresent {
                strategy: StrategyKind::Exponential
            }
        );
        assert_eq!(
            err.to_string(),
            "exponential distribution requires all items unlocked"
        );
        assert!(can_apply(StrategyKind::Even, &items));
        assert!(!can_apply(StrategyKind::BellCurve, &items));
    }

    #[test]
    fn every_kind_sums_to_total_when_unlocked() {
        let mut rng = StdRng::seed_from_u64(7);
        for kind in StrategyKind::ALL {
            let out = distribute(kind, &unlocked(6), &mut rng).unwrap();
            assert_eq!(crate::item::total_weight(&out), 100, "{kind}");
        }
    }
}
