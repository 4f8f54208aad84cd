//! weightmix Engine
//!
//! Lock-aware weight normalization for ordered item lists whose integer
//! percentage weights must sum to 100.
//!
//! # Core Concepts
//!
//! - [`Item`]: named item with a weight in `0..=100` and a lock flag
//! - [`normalize`]: rescale unlocked items after any weight change
//! - [`normalize_around`]: same, while holding one just-edited item
//! - [`DistributionStrategy`]: replace every unlocked weight at once
//! - [`EvenStrategy`], [`BellCurveStrategy`], [`ExponentialStrategy`],
//!   [`RandomStrategy`]: built-in strategies selected by [`StrategyKind`]
//! - [`repair_remainder`]: force rounded values to an exact sum
//!
//! Locked weights are never changed by any operation in this crate.
//!
//! # Example
//!
//! ```rust
//! use weightmix_engine::{distribute, normalize, Item, StrategyKind};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let items = vec![Item::new("A", 80), Item::new("B", 25), Item::new("C", 25)];
//! let normalized = normalize(&items);
//! assert_eq!(normalized.iter().map(|i| i.weight).sum::<u32>(), 100);
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let even = distribute(StrategyKind::Even, &normalized, &mut rng).unwrap();
//! assert_eq!(even.iter().map(|i| i.weight).collect::<Vec<_>>(), vec![34, 33, 33]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod bell_curve;
mod even;
mod exponential;
mod item;
mod normalize;
mod random;
mod repair;
mod strategy;

// Re-exports
pub use bell_curve::{BellCurveStrategy, STD_DEV_DIVISOR};
pub use even::EvenStrategy;
pub use exponential::{ExponentialStrategy, DECAY_FLOOR};
pub use item::{
    available_weight, clamp_weight, has_locked, locked_weight, total_weight, unlocked_count,
    unlocked_weight, Item, ItemId, MAX_WEIGHT, WEIGHT_TOTAL,
};
pub use normalize::{normalize, normalize_around, normalize_unrepaired};
pub use random::RandomStrategy;
pub use repair::{even_split, repair_remainder, round_shares, scale_to_available};
pub use strategy::{can_apply, distribute, DistributionError, DistributionStrategy, StrategyKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
