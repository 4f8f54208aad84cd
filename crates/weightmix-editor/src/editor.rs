//! Weight editor state cell
//!
//! [`WeightEditor`] owns the current item snapshot and applies the command
//! interface on top of the engine. Every command either replaces the whole
//! snapshot or returns an [`EditorError`] and leaves it untouched.

use crate::config::EditorConfig;
use crate::error::EditorError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use weightmix_engine::{
    available_weight, can_apply, clamp_weight, distribute, even_split, has_locked, locked_weight,
    normalize, normalize_around, total_weight, Item, ItemId, StrategyKind, WEIGHT_TOTAL,
};

/// Editor command, as sent by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorCommand {
    /// Append a new item with weight 0
    AddItem,
    /// Delete an item
    RemoveItem {
        /// Target
        id: ItemId,
    },
    /// Change an item's name
    RenameItem {
        /// Target
        id: ItemId,
        /// New name
        name: String,
    },
    /// Set an item's weight; out-of-range values are clamped
    SetWeight {
        /// Target
        id: ItemId,
        /// Requested weight
        value: i64,
    },
    /// Set an item's weight from raw text input
    SetWeightInput {
        /// Target
        id: ItemId,
        /// Unparsed input
        input: String,
    },
    /// Flip an item's lock flag
    ToggleLock {
        /// Target
        id: ItemId,
    },
    /// Move `source` to the position currently held by `target`
    Reorder {
        /// Item being dragged
        source: ItemId,
        /// Item dropped onto
        target: ItemId,
    },
    /// Replace all unlocked weights using a strategy
    ApplyStrategy {
        /// Strategy to run
        kind: StrategyKind,
    },
}

/// Snapshot summary for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightSummary {
    /// Sum of all weights
    pub total: u32,
    /// Number of items
    pub item_count: usize,
    /// Number of locked items
    pub locked_count: usize,
    /// Sum of locked weights
    pub locked_weight: u32,
    /// Weight left for unlocked items
    pub available: u32,
    /// Whether any item is locked
    pub has_locked_items: bool,
    /// Whether the total is outside the tolerance around 100
    pub has_significant_deviation: bool,
    /// Strategies that would currently be accepted
    pub applicable_strategies: Vec<StrategyKind>,
}

/// Single-owner weight editor
///
/// Generic over the random source used by [`StrategyKind::Random`] so tests
/// can inject a seeded generator.
#[derive(Debug)]
pub struct WeightEditor<R = StdRng> {
    /// Current snapshot
    items: Vec<Item>,
    /// Configuration
    config: EditorConfig,
    /// Random source for the random strategy
    rng: R,
    /// Suffix for the next default item name
    next_name_index: usize,
}

impl WeightEditor<StdRng> {
    /// Create editor from configuration
    ///
    /// Initial items split 100 evenly. The random source is seeded from
    /// `config.seed`, or from the OS when unset.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> WeightEditor<R> {
    /// Create editor from configuration with an explicit random source
    #[must_use]
    pub fn with_rng(config: EditorConfig, rng: R) -> Self {
        let mut names = config.initial_items.clone();
        if names.is_empty() {
            names.push(format!("{} 1", config.name_prefix));
        }

        let weights = even_split(WEIGHT_TOTAL, names.len());
        let items = names
            .into_iter()
            .zip(weights)
            .map(|(name, weight)| Item::new(name, weight))
            .collect::<Vec<_>>();

        Self {
            next_name_index: items.len() + 1,
            items,
            config,
            rng,
        }
    }

    /// Create editor over existing items
    ///
    /// Weights are clamped into `0..=100`; nothing is normalized until the
    /// first weight-affecting command.
    ///
    /// # Errors
    /// `EditorError::NoItems` for an empty list.
    pub fn from_items(items: Vec<Item>, config: EditorConfig, rng: R) -> Result<Self, EditorError> {
        if items.is_empty() {
            return Err(EditorError::NoItems);
        }
        Ok(Self {
            next_name_index: items.len() + 1,
            items: items.into_iter().map(Item::clamped).collect(),
            config,
            rng,
        })
    }

    // ----- queries -----

    /// Current snapshot
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Item by id
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Number of items
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; the editor keeps at least one item
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all weights
    #[must_use]
    pub fn total(&self) -> u32 {
        total_weight(&self.items)
    }

    /// Whether any item is locked
    #[must_use]
    pub fn has_locked_items(&self) -> bool {
        has_locked(&self.items)
    }

    /// Whether the total differs from 100 by more than the tolerance
    #[must_use]
    pub fn has_significant_deviation(&self) -> bool {
        self.total().abs_diff(WEIGHT_TOTAL) > self.config.deviation_tolerance
    }

    /// Whether `kind` would currently be accepted
    #[must_use]
    pub fn can_apply(&self, kind: StrategyKind) -> bool {
        can_apply(kind, &self.items)
    }

    /// Configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Summary of the current snapshot
    #[must_use]
    pub fn summary(&self) -> WeightSummary {
        WeightSummary {
            total: self.total(),
            item_count: self.items.len(),
            locked_count: self.items.iter().filter(|item| item.locked).count(),
            locked_weight: locked_weight(&self.items),
            available: available_weight(&self.items),
            has_locked_items: self.has_locked_items(),
            has_significant_deviation: self.has_significant_deviation(),
            applicable_strategies: StrategyKind::ALL
                .into_iter()
                .filter(|kind| self.can_apply(*kind))
                .collect(),
        }
    }

    // ----- commands -----

    /// Run one command
    ///
    /// # Errors
    /// Whatever the matching command method returns.
    pub fn execute(&mut self, command: EditorCommand) -> Result<&[Item], EditorError> {
        match command {
            EditorCommand::AddItem => Ok(self.add_item()),
            EditorCommand::RemoveItem { id } => self.remove_item(id),
            EditorCommand::RenameItem { id, name } => self.rename_item(id, name),
            EditorCommand::SetWeight { id, value } => self.set_weight(id, value),
            EditorCommand::SetWeightInput { id, input } => self.set_weight_input(id, &input),
            EditorCommand::ToggleLock { id } => self.toggle_lock(id),
            EditorCommand::Reorder { source, target } => self.reorder(source, target),
            EditorCommand::ApplyStrategy { kind } => self.apply_strategy(kind),
        }
    }

    /// Append an item named after the configured prefix
    pub fn add_item(&mut self) -> &[Item] {
        let name = format!("{} {}", self.config.name_prefix, self.next_name_index);
        self.add_named_item(name)
    }

    /// Append an item with weight 0, then renormalize
    pub fn add_named_item(&mut self, name: impl Into<String>) -> &[Item] {
        let item = Item::new(name, 0);
        tracing::debug!("Adding item {} ({})", item.name, item.id);

        self.next_name_index += 1;
        let mut next = self.items.clone();
        next.push(item);
        self.replace(normalize(&next))
    }

    /// Delete an item, then renormalize
    ///
    /// # Errors
    /// `ItemNotFound`, or `LastItem` when only one item is left.
    pub fn remove_item(&mut self, id: ItemId) -> Result<&[Item], EditorError> {
        let index = self.index_of(id)?;
        if self.items.len() == 1 {
            tracing::debug!("Refusing to remove last item {}", id);
            return Err(EditorError::LastItem);
        }

        let mut next = self.items.clone();
        let removed = next.remove(index);
        tracing::debug!("Removed item {} ({})", removed.name, id);
        Ok(self.replace(normalize(&next)))
    }

    /// Rename an item in place
    ///
    /// # Errors
    /// `ItemNotFound`.
    pub fn rename_item(
        &mut self,
        id: ItemId,
        name: impl Into<String>,
    ) -> Result<&[Item], EditorError> {
        let index = self.index_of(id)?;
        let mut next = self.items.clone();
        next[index].name = name.into();
        Ok(self.replace(next))
    }

    /// Set an item's weight and renormalize the others around it
    ///
    /// The value is clamped to `0..=100`, then capped at what locked items
    /// leave over.
    ///
    /// # Errors
    /// `ItemNotFound`, or `ItemLocked` for a locked item.
    pub fn set_weight(&mut self, id: ItemId, value: i64) -> Result<&[Item], EditorError> {
        let index = self.index_of(id)?;
        if self.items[index].locked {
            tracing::debug!("Refusing to edit locked item {}", id);
            return Err(EditorError::ItemLocked(id));
        }

        let mut next = self.items.clone();
        next[index].weight = clamp_weight(value);
        Ok(self.replace(normalize_around(&next, id)))
    }

    /// Set an item's weight from text input
    ///
    /// Decimal input is rounded to the nearest integer.
    ///
    /// # Errors
    /// `InvalidWeight` for non-numeric input, otherwise as
    /// [`WeightEditor::set_weight`].
    pub fn set_weight_input(&mut self, id: ItemId, input: &str) -> Result<&[Item], EditorError> {
        let value = parse_weight(input)?;
        self.set_weight(id, value)
    }

    /// Flip an item's lock flag, then renormalize
    ///
    /// # Errors
    /// `ItemNotFound`.
    pub fn toggle_lock(&mut self, id: ItemId) -> Result<&[Item], EditorError> {
        let index = self.index_of(id)?;
        let mut next = self.items.clone();
        next[index].locked = !next[index].locked;
        tracing::debug!(
            "Item {} {}",
            id,
            if next[index].locked { "locked" } else { "unlocked" }
        );
        Ok(self.replace(normalize(&next)))
    }

    /// Move `source` to the position of `target`
    ///
    /// Weights are untouched. Dropping an item onto itself is a no-op.
    ///
    /// # Errors
    /// `ItemNotFound` for either id.
    pub fn reorder(&mut self, source: ItemId, target: ItemId) -> Result<&[Item], EditorError> {
        let from = self.index_of(source)?;
        let to = self.index_of(target)?;
        if from == to {
            return Ok(self.items.as_slice());
        }

        let mut next = self.items.clone();
        let item = next.remove(from);
        next.insert(to, item);
        Ok(self.replace(next))
    }

    /// Replace all unlocked weights using `kind`
    ///
    /// # Errors
    /// `Distribution` when the strategy refuses the current items, e.g. a
    /// bell curve while something is locked.
    pub fn apply_strategy(&mut self, kind: StrategyKind) -> Result<&[Item], EditorError> {
        match distribute(kind, &self.items, &mut self.rng) {
            Ok(next) => {
                tracing::info!("Applied {} distribution over {} items", kind, next.len());
                Ok(self.replace(next))
            }
            Err(e) => {
                tracing::debug!("Strategy {} rejected: {}", kind, e);
                Err(e.into())
            }
        }
    }

    /// Consume the editor, returning its snapshot
    #[must_use]
    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    fn index_of(&self, id: ItemId) -> Result<usize, EditorError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(EditorError::ItemNotFound(id))
    }

    fn replace(&mut self, next: Vec<Item>) -> &[Item] {
        self.items = next;
        if self.has_significant_deviation() {
            tracing::warn!("Total weight is {}, expected {}", self.total(), WEIGHT_TOTAL);
        }
        &self.items
    }
}

/// Parse raw weight text
///
/// # Errors
/// `EditorError::InvalidWeight` when the trimmed text is not a finite number.
#[allow(clippy::cast_possible_truncation)]
pub fn parse_weight(input: &str) -> Result<i64, EditorError> {
    match input.trim().parse::<f64>() {
        // clamped first, so the cast is exact
        Ok(value) if value.is_finite() => Ok(value.clamp(-1.0e6, 1.0e6).round() as i64),
        _ => Err(EditorError::InvalidWeight(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor(names: &[&str]) -> WeightEditor {
        WeightEditor::new(
            EditorConfig::new()
                .with_initial_items(names.iter().copied())
                .with_seed(11),
        )
    }

    fn weights(editor: &WeightEditor) -> Vec<u32> {
        editor.items().iter().map(|i| i.weight).collect()
    }

    fn id(editor: &WeightEditor, index: usize) -> ItemId {
        editor.items()[index].id
    }

    #[test]
    fn starts_evenly_split() {
        let editor = editor(&["A", "B", "C"]);
        assert_eq!(weights(&editor), vec![34, 33, 33]);
        assert_eq!(editor.total(), 100);
        assert!(!editor.has_significant_deviation());
    }

    #[test]
    fn empty_initial_items_get_one_default() {
        let editor = WeightEditor::new(EditorConfig {
            initial_items: vec![],
            ..EditorConfig::default()
        });
        assert_eq!(editor.len(), 1);
        assert_eq!(editor.items()[0].name, "Creative 1");
        assert_eq!(weights(&editor), vec![100]);
    }

    #[test]
    fn from_items_rejects_empty() {
        let result = WeightEditor::from_items(
            vec![],
            EditorConfig::default(),
            StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(EditorError::NoItems)));
    }

    #[test]
    fn from_items_clamps_weights() {
        let mut items = vec![Item::new("a", 10), Item::new("b", 10).with_locked(true)];
        items[0].weight = 4_000_000_000;
        items[1].weight = 250;
        let mut editor =
            WeightEditor::from_items(items, EditorConfig::default(), StdRng::seed_from_u64(0))
                .unwrap();
        assert_eq!(weights(&editor), vec![100, 100]);

        let id = editor.items()[0].id;
        editor.set_weight(id, 30).unwrap();
        assert!(editor.items().iter().all(|item| item.weight <= 100));
    }

    #[test]
    fn add_item_starts_at_zero() {
        let mut editor = editor(&["A", "B"]);
        editor.add_item();
        assert_eq!(editor.len(), 3);
        assert_eq!(editor.items()[2].name, "Creative 3");
        assert_eq!(weights(&editor), vec![50, 50, 0]);
    }

    #[test]
    fn add_item_names_keep_counting_after_removal() {
        let mut editor = editor(&["A", "B"]);
        editor.add_item();
        let third = id(&editor, 2);
        editor.remove_item(third).unwrap();
        editor.add_item();
        assert_eq!(editor.items()[2].name, "Creative 4");
    }

    #[test]
    fn remove_renormalizes() {
        let mut editor = editor(&["A", "B", "C", "D"]);
        let b = id(&editor, 1);
        editor.remove_item(b).unwrap();
        assert_eq!(weights(&editor), vec![34, 33, 33]);
    }

    #[test]
    fn remove_last_item_rejected() {
        let mut editor = editor(&["only"]);
        let only = id(&editor, 0);
        assert_eq!(editor.remove_item(only), Err(EditorError::LastItem));
        assert_eq!(editor.len(), 1);
    }

    #[test]
    fn remove_unknown_rejected() {
        let mut editor = editor(&["A", "B"]);
        let ghost = ItemId::new();
        assert_eq!(editor.remove_item(ghost), Err(EditorError::ItemNotFound(ghost)));
    }

    #[test]
    fn rename_in_place() {
        let mut editor = editor(&["A", "B"]);
        let before = weights(&editor);
        let b = id(&editor, 1);
        editor.rename_item(b, "Banner").unwrap();
        assert_eq!(editor.get(b).unwrap().name, "Banner");
        assert_eq!(weights(&editor), before);
    }

    #[test]
    fn set_weight_redistributes_rest() {
        let mut editor = editor(&["A", "B", "C", "D"]);
        let a = id(&editor, 0);
        editor.set_weight(a, 80).unwrap();
        assert_eq!(weights(&editor), vec![80, 6, 7, 7]);
    }

    #[test]
    fn set_weight_clamps() {
        let mut editor = editor(&["A", "B"]);
        let a = id(&editor, 0);
        editor.set_weight(a, 250).unwrap();
        assert_eq!(weights(&editor), vec![100, 0]);
        editor.set_weight(a, -3).unwrap();
        assert_eq!(weights(&editor), vec![0, 100]);
    }

    #[test]
    fn set_weight_on_locked_rejected() {
        let mut editor = editor(&["A", "B", "C"]);
        let b = id(&editor, 1);
        editor.toggle_lock(b).unwrap();
        let before = editor.items().to_vec();
        assert_eq!(editor.set_weight(b, 10), Err(EditorError::ItemLocked(b)));
        assert_eq!(editor.items(), before.as_slice());
    }

    #[test]
    fn set_weight_input_parses_and_rounds() {
        let mut editor = editor(&["A", "B"]);
        let a = id(&editor, 0);
        editor.set_weight_input(a, " 30.6 ").unwrap();
        assert_eq!(weights(&editor), vec![31, 69]);
    }

    #[test]
    fn set_weight_input_ignores_garbage() {
        let mut editor = editor(&["A", "B"]);
        let a = id(&editor, 0);
        let before = weights(&editor);
        assert!(matches!(
            editor.set_weight_input(a, "lots"),
            Err(EditorError::InvalidWeight(_))
        ));
        assert!(matches!(
            editor.set_weight_input(a, "NaN"),
            Err(EditorError::InvalidWeight(_))
        ));
        assert_eq!(weights(&editor), before);
    }

    #[test]
    fn toggle_lock_keeps_weights_when_balanced() {
        let mut editor = editor(&["A", "B", "C"]);
        let b = id(&editor, 1);
        editor.toggle_lock(b).unwrap();
        assert!(editor.get(b).unwrap().locked);
        assert!(editor.has_locked_items());
        assert_eq!(weights(&editor), vec![34, 33, 33]);

        editor.toggle_lock(b).unwrap();
        assert!(!editor.has_locked_items());
    }

    #[test]
    fn reorder_moves_without_reweighting() {
        let mut editor = editor(&["A", "B", "C"]);
        let (a, c) = (id(&editor, 0), id(&editor, 2));
        editor.reorder(a, c).unwrap();
        let names: Vec<&str> = editor.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        assert_eq!(weights(&editor), vec![33, 33, 34]);
    }

    #[test]
    fn reorder_onto_self_is_noop() {
        let mut editor = editor(&["A", "B"]);
        let a = id(&editor, 0);
        let before = editor.items().to_vec();
        editor.reorder(a, a).unwrap();
        assert_eq!(editor.items(), before.as_slice());
    }

    #[test]
    fn bell_rejected_with_lock() {
        let mut editor = editor(&["A", "B", "C", "D"]);
        let b = id(&editor, 1);
        editor.set_weight(b, 30).unwrap();
        editor.toggle_lock(b).unwrap();
        let before = editor.items().to_vec();

        let err = editor.apply_strategy(StrategyKind::BellCurve).unwrap_err();
        assert!(err.is_state_rejection());
        assert_eq!(editor.items(), before.as_slice());
        assert!(!editor.can_apply(StrategyKind::BellCurve));
        assert!(editor.can_apply(StrategyKind::Random));
    }

    #[test]
    fn random_is_reproducible_with_seed() {
        let mut a = editor(&["A", "B", "C", "D"]);
        let mut b = editor(&["A", "B", "C", "D"]);
        a.apply_strategy(StrategyKind::Random).unwrap();
        b.apply_strategy(StrategyKind::Random).unwrap();
        assert_eq!(weights(&a), weights(&b));
        assert_eq!(a.total(), 100);
    }

    #[test]
    fn all_locked_over_total_warns() {
        let mut editor = editor(&["A", "B"]);
        let (a, b) = (id(&editor, 0), id(&editor, 1));
        editor.set_weight(a, 70).unwrap();
        editor.toggle_lock(a).unwrap();
        editor.toggle_lock(b).unwrap();
        editor.remove_item(a).unwrap();

        assert_eq!(editor.total(), 30);
        assert!(editor.has_significant_deviation());
        assert_eq!(
            editor.apply_strategy(StrategyKind::Even),
            Err(EditorError::Distribution(
                weightmix_engine::DistributionError::NoUnlockedItems
            ))
        );
    }

    #[test]
    fn summary_reports_state() {
        let mut editor = editor(&["A", "B", "C"]);
        let a = id(&editor, 0);
        editor.toggle_lock(a).unwrap();

        let summary = editor.summary();
        assert_eq!(summary.total, 100);
        assert_eq!(summary.locked_count, 1);
        assert_eq!(summary.locked_weight, 34);
        assert_eq!(summary.available, 66);
        assert!(summary.has_locked_items);
        assert!(!summary.has_significant_deviation);
        assert_eq!(
            summary.applicable_strategies,
            vec![StrategyKind::Even, StrategyKind::Random]
        );
    }

    #[test]
    fn execute_dispatches() {
        let mut editor = editor(&["A", "B"]);
        let a = id(&editor, 0);
        editor
            .execute(EditorCommand::SetWeightInput {
                id: a,
                input: "10".to_string(),
            })
            .unwrap();
        assert_eq!(weights(&editor), vec![10, 90]);
        editor
            .execute(EditorCommand::ApplyStrategy {
                kind: StrategyKind::Even,
            })
            .unwrap();
        assert_eq!(weights(&editor), vec![50, 50]);
    }

    #[test]
    fn command_serde_shape() {
        let json = serde_json::to_value(EditorCommand::ApplyStrategy {
            kind: StrategyKind::BellCurve,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"op": "apply_strategy", "kind": "bell"}));
    }

    #[test]
    fn parse_weight_cases() {
        assert_eq!(parse_weight("42"), Ok(42));
        assert_eq!(parse_weight("-4.5"), Ok(-5));
        assert_eq!(parse_weight("1e9"), Ok(1_000_000));
        assert!(parse_weight("").is_err());
        assert!(parse_weight("inf").is_err());
    }
}
