//! Sum-to-100 normalization
//!
//! [`normalize`] is called after every weight-affecting mutation. It
//! rescales unlocked items so the whole list sums to [`WEIGHT_TOTAL`],
//! leaving locked items untouched.

use crate::item::{
    assign_unlocked, locked_weight, total_weight, unlocked_count, Item, ItemId, WEIGHT_TOTAL,
};
use crate::repair::{even_split, repair_remainder, round_shares};

/// Normalize `items` so unlocked weights fill `100 - locked weight` exactly
///
/// # Pass-through cases
/// - total weight is zero (nothing to scale against)
/// - every item is locked, or locked weight is already `>= 100`
///
/// In both cases the input is returned unchanged and the caller surfaces
/// the deviation as a warning.
///
/// # Rules
/// - one unlocked item takes the whole available weight
/// - unlocked items with zero combined weight split it evenly
/// - otherwise weights are rescaled proportionally and rounding drift is
///   repaired so the sum is exact
#[must_use]
pub fn normalize(items: &[Item]) -> Vec<Item> {
    normalize_with(items, true)
}

/// Same as [`normalize`], but without the remainder repair on the
/// proportional path
///
/// Independent rounding can leave the total a few points away from 100.
#[must_use]
pub fn normalize_unrepaired(items: &[Item]) -> Vec<Item> {
    normalize_with(items, false)
}

/// Normalize after a direct edit of `pinned`, keeping the edited value
///
/// The pinned item acts as locked while the other unlocked items absorb the
/// difference. Its weight is capped at the weight left by real locks, so
/// the list still sums to 100.
///
/// Falls back to [`normalize`] when `pinned` is missing, locked, or the
/// only unlocked item. An all-zero list passes through like it does for
/// [`normalize`].
#[must_use]
pub fn normalize_around(items: &[Item], pinned: ItemId) -> Vec<Item> {
    if total_weight(items) == 0 {
        return items.to_vec();
    }
    let Some(index) = items.iter().position(|item| item.id == pinned) else {
        return normalize(items);
    };
    if items[index].locked || unlocked_count(items) < 2 {
        return normalize(items);
    }

    let locked = locked_weight(items);
    if locked >= WEIGHT_TOTAL {
        return items.to_vec();
    }
    let available = WEIGHT_TOTAL - locked;
    let held = items[index].weight.min(available);
    let remaining = available - held;

    let others: Vec<u32> = items
        .iter()
        .enumerate()
        .filter(|(i, item)| !item.locked && *i != index)
        .map(|(_, item)| item.weight)
        .collect();
    let others_sum = others.iter().fold(0u32, |sum, w| sum.saturating_add(*w));

    let mut shares = if others_sum == 0 {
        even_split(remaining, others.len())
    } else {
        let raw: Vec<f64> = others.iter().map(|w| f64::from(*w)).collect();
        let mut rounded = round_shares(&raw, remaining);
        repair_remainder(&mut rounded, remaining);
        rounded
    }
    .into_iter();

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if item.locked {
                item.clone()
            } else if i == index {
                Item {
                    weight: held,
                    ..item.clone()
                }
            } else {
                Item {
                    weight: shares.next().unwrap_or(item.weight),
                    ..item.clone()
                }
            }
        })
        .collect()
}

fn normalize_with(items: &[Item], repair: bool) -> Vec<Item> {
    if total_weight(items) == 0 {
        return items.to_vec();
    }

    let locked = locked_weight(items);
    let unlocked = unlocked_count(items);
    if unlocked == 0 || locked >= WEIGHT_TOTAL {
        return items.to_vec();
    }

    let available = WEIGHT_TOTAL - locked;

    if unlocked == 1 {
        return assign_unlocked(items, &[available]);
    }

    let current: Vec<u32> = items
        .iter()
        .filter(|item| !item.locked)
        .map(|item| item.weight)
        .collect();
    let unlocked_sum = current.iter().fold(0u32, |sum, w| sum.saturating_add(*w));

    let weights = if unlocked_sum == 0 {
        even_split(available, unlocked)
    } else {
        let raw: Vec<f64> = current.iter().map(|w| f64::from(*w)).collect();
        let mut rounded = round_shares(&raw, available);
        if repair {
            repair_remainder(&mut rounded, available);
        }
        rounded
    };

    assign_unlocked(items, &weights)
}
