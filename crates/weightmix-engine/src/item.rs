//! Weighted item model
//!
//! Defines [`Item`], its stable [`ItemId`], and the aggregate helpers the
//! engine uses to reason about locked and unlocked weight.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Total every item list is normalized towards
pub const WEIGHT_TOTAL: u32 = 100;

/// Upper bound of a single item weight
pub const MAX_WEIGHT: u32 = WEIGHT_TOTAL;

/// Stable item identifier
///
/// Identity never depends on position, so locks and renames survive reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub Uuid);

impl ItemId {
    /// Generate new item ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// A named item carrying an integer percentage weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity, generated when absent from the input
    #[serde(default)]
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Percentage weight in `0..=100`, clamped on input
    #[serde(deserialize_with = "deserialize_weight")]
    pub weight: u32,
    /// Locked items are never touched by redistribution
    #[serde(default)]
    pub locked: bool,
}

impl Item {
    /// Create an unlocked item with a fresh id
    #[must_use]
    pub fn new(name: impl Into<String>, weight: u32) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            weight: clamp_weight(i64::from(weight)),
            locked: false,
        }
    }

    /// Set locked flag
    #[inline]
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Copy with the weight clamped into `0..=100`
    #[inline]
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.weight = clamp_weight(i64::from(self.weight));
        self
    }

    /// Set explicit id
    #[inline]
    #[must_use]
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }
}

/// Clamp any integer into the valid weight range
#[inline]
#[must_use]
pub fn clamp_weight(value: i64) -> u32 {
    // Clamped into 0..=100, the cast cannot truncate.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let weight = value.clamp(0, i64::from(MAX_WEIGHT)) as u32;
    weight
}

fn deserialize_weight<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    i64::deserialize(deserializer).map(clamp_weight)
}

fn sum_weights<'a>(items: impl Iterator<Item = &'a Item>) -> u32 {
    items.fold(0, |sum, item| sum.saturating_add(item.weight))
}

/// Sum of all weights
#[must_use]
pub fn total_weight(items: &[Item]) -> u32 {
    sum_weights(items.iter())
}

/// Sum of locked weights
#[must_use]
pub fn locked_weight(items: &[Item]) -> u32 {
    sum_weights(items.iter().filter(|item| item.locked))
}

/// Sum of unlocked weights
#[must_use]
pub fn unlocked_weight(items: &[Item]) -> u32 {
    sum_weights(items.iter().filter(|item| !item.locked))
}

/// Number of unlocked items
#[must_use]
pub fn unlocked_count(items: &[Item]) -> usize {
    items.iter().filter(|item| !item.locked).count()
}

/// Whether any item is locked
#[must_use]
pub fn has_locked(items: &[Item]) -> bool {
    items.iter().any(|item| item.locked)
}

/// Weight left for unlocked items, saturating at zero
#[must_use]
pub fn available_weight(items: &[Item]) -> u32 {
    WEIGHT_TOTAL.saturating_sub(locked_weight(items))
}

/// Write `weights` into the unlocked items, in sequence order
///
/// Locked items are copied as-is. `weights` must hold one value per
/// unlocked item.
#[must_use]
pub(crate) fn assign_unlocked(items: &[Item], weights: &[u32]) -> Vec<Item> {
    debug_assert_eq!(weights.len(), unlocked_count(items));

    let mut next = weights.iter().copied();
    items
        .iter()
        .map(|item| {
            if item.locked {
                item.clone()
            } else {
                Item {
                    weight: next.next().unwrap_or(item.weight),
                    ..item.clone()
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Item> {
        vec![
            Item::new("a", 40),
            Item::new("b", 30).with_locked(true),
            Item::new("c", 20),
            Item::new("d", 10).with_locked(true),
        ]
    }

    #[test]
    fn aggregates() {
        let items = sample();
        assert_eq!(total_weight(&items), 100);
        assert_eq!(locked_weight(&items), 40);
        assert_eq!(unlocked_weight(&items), 60);
        assert_eq!(unlocked_count(&items), 2);
        assert_eq!(available_weight(&items), 60);
        assert!(has_locked(&items));
    }

    #[test]
    fn available_saturates() {
        let items = vec![
            Item::new("a", 80).with_locked(true),
            Item::new("b", 70).with_locked(true),
        ];
        assert_eq!(available_weight(&items), 0);
    }

    #[test]
    fn new_clamps_weight() {
        assert_eq!(Item::new("x", 250).weight, 100);
    }

    #[test]
    fn deserialize_clamps_out_of_range_weights() {
        let items: Vec<Item> = serde_json::from_str(
            r#"[{"name":"a","weight":250,"locked":true},{"name":"b","weight":-7}]"#,
        )
        .unwrap();
        assert_eq!(items[0].weight, 100);
        assert_eq!(items[1].weight, 0);
    }

    #[test]
    fn huge_weights_do_not_overflow_sums() {
        let items: Vec<Item> = serde_json::from_str(
            r#"[{"name":"a","weight":4000000000},{"name":"b","weight":4000000000}]"#,
        )
        .unwrap();
        assert_eq!(total_weight(&items), 200);

        let mut raw = vec![Item::new("a", 1), Item::new("b", 1)];
        raw[0].weight = u32::MAX;
        raw[1].weight = u32::MAX;
        assert_eq!(total_weight(&raw), u32::MAX);
        assert_eq!(raw[0].clone().clamped().weight, 100);
    }

    #[test]
    fn clamp_weight_bounds() {
        assert_eq!(clamp_weight(-5), 0);
        assert_eq!(clamp_weight(42), 42);
        assert_eq!(clamp_weight(101), 100);
    }

    #[test]
    fn assign_unlocked_skips_locked() {
        let items = sample();
        let out = assign_unlocked(&items, &[1, 2]);
        let weights: Vec<u32> = out.iter().map(|i| i.weight).collect();
        assert_eq!(weights, vec![1, 30, 2, 10]);
        assert_eq!(out[0].id, items[0].id);
    }

    #[test]
    fn item_id_roundtrips_through_string() {
        let id = ItemId::new();
        let parsed: ItemId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn item_deserializes_without_id() {
        let item: Item = serde_json::from_str(r#"{"name":"x","weight":5,"locked":true}"#).unwrap();
        assert!(item.locked);
        assert_ne!(item.id, ItemId::new());
    }

    #[test]
    fn item_deserializes_without_locked_field() {
        let id = ItemId::new();
        let json = format!(r#"{{"id":"{id}","name":"x","weight":5}}"#);
        let item: Item = serde_json::from_str(&json).unwrap();
        assert!(!item.locked);
        assert_eq!(item.weight, 5);
    }
}
