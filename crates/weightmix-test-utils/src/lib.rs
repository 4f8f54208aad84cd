//! Testing utilities for weightmix workspace
//!
//! Shared test helpers, fixtures, and assertions.

#![allow(missing_docs)]

use rand::rngs::StdRng;
use rand::SeedableRng;
use weightmix_editor::{EditorConfig, WeightEditor};
use weightmix_engine::{Item, ItemId};

/// Build items from `(weight, locked)` pairs, named `A`, `B`, ...
pub fn items_from(layout: &[(u32, bool)]) -> Vec<Item> {
    layout
        .iter()
        .enumerate()
        .map(|(i, (weight, locked))| Item::new(item_name(i), *weight).with_locked(*locked))
        .collect()
}

/// Build unlocked items from weights
pub fn unlocked_items(weights: &[u32]) -> Vec<Item> {
    weights
        .iter()
        .enumerate()
        .map(|(i, w)| Item::new(item_name(i), *w))
        .collect()
}

pub fn weights_of(items: &[Item]) -> Vec<u32> {
    items.iter().map(|item| item.weight).collect()
}

pub fn names_of(items: &[Item]) -> Vec<String> {
    items.iter().map(|item| item.name.clone()).collect()
}

pub fn ids_of(items: &[Item]) -> Vec<ItemId> {
    items.iter().map(|item| item.id).collect()
}

/// Editor over `items` with a seeded random source
pub fn seeded_editor(items: Vec<Item>, seed: u64) -> WeightEditor {
    WeightEditor::from_items(
        items,
        EditorConfig::new().with_seed(seed),
        StdRng::seed_from_u64(seed),
    )
    .expect("fixture items must not be empty")
}

/// Editor with named items split evenly
pub fn named_editor(names: &[&str], seed: u64) -> WeightEditor {
    WeightEditor::new(
        EditorConfig::new()
            .with_initial_items(names.iter().copied())
            .with_seed(seed),
    )
}

/// Assert every locked item in `before` kept its weight in `after`
pub fn assert_locked_preserved(before: &[Item], after: &[Item]) {
    for old in before.iter().filter(|item| item.locked) {
        if let Some(new) = after.iter().find(|item| item.id == old.id) {
            assert_eq!(
                old.weight, new.weight,
                "locked item {} changed from {} to {}",
                old.name, old.weight, new.weight
            );
        }
    }
}

fn item_name(index: usize) -> String {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or_else(|| format!("item {index}"), |i| char::from(b'A' + i).to_string())
}
