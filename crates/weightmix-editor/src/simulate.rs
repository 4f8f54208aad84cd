//! Seeded command simulator
//!
//! Drives a [`WeightEditor`] with a reproducible stream of random commands
//! and checks the snapshot invariants after each one:
//! - the list is never empty
//! - every weight stays in `0..=100`
//! - locked weights never change
//! - a rejected command leaves the snapshot untouched
//! - the total is exactly 100 unless normalization had to pass through
//!   (zero total, nothing unlocked, or locked weight `>= 100`)

use crate::config::EditorConfig;
use crate::editor::{EditorCommand, WeightEditor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use weightmix_engine::{
    locked_weight, total_weight, unlocked_count, Item, ItemId, StrategyKind, MAX_WEIGHT,
    WEIGHT_TOTAL,
};

/// Simulator configuration
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Number of commands to issue
    pub operations: u64,
    /// Stop at the first violation
    pub stop_on_first_violation: bool,
    /// Editor the simulation starts from
    pub editor: EditorConfig,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            operations: 10_000,
            stop_on_first_violation: true,
            editor: EditorConfig::default(),
        }
    }
}

/// Invariant violation found during simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// The list became empty
    EmptyList {
        /// Step index
        step: u64,
    },
    /// A weight left `0..=100`
    WeightOutOfRange {
        /// Step index
        step: u64,
        /// Offending item
        id: ItemId,
        /// Offending weight
        weight: u32,
    },
    /// A locked weight changed
    LockedWeightChanged {
        /// Step index
        step: u64,
        /// Offending item
        id: ItemId,
        /// Weight before the command
        before: u32,
        /// Weight after the command
        after: u32,
    },
    /// A rejected command still changed the snapshot
    RejectedCommandMutated {
        /// Step index
        step: u64,
    },
    /// Total drifted away from 100 outside the pass-through cases
    TotalDrift {
        /// Step index
        step: u64,
        /// Observed total
        total: u32,
    },
}

/// Simulation outcome
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationReport {
    /// Commands issued
    pub operations: u64,
    /// Commands that changed or kept the snapshot successfully
    pub applied: u64,
    /// Commands rejected by the editor
    pub rejected: u64,
    /// Invariant violations
    pub violations: Vec<Violation>,
}

impl SimulationReport {
    /// Whether no invariant was violated
    #[inline]
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    /// Plain-text report
    #[must_use]
    pub fn generate_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Simulation Report\n");
        out.push_str("=================\n");
        out.push_str(&format!("Operations: {}\n", self.operations));
        out.push_str(&format!("Applied:    {}\n", self.applied));
        out.push_str(&format!("Rejected:   {}\n", self.rejected));
        out.push_str(&format!("Violations: {}\n", self.violations.len()));
        for violation in &self.violations {
            out.push_str(&format!("  - {violation:?}\n"));
        }
        out.push_str(&format!(
            "Status: {}\n",
            if self.passed() { "PASSED" } else { "FAILED" }
        ));
        out
    }
}

/// Run a simulation
#[must_use]
pub fn run_simulation(config: &SimulatorConfig) -> SimulationReport {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let editor_rng = StdRng::seed_from_u64(config.seed.wrapping_add(1));
    let mut editor = WeightEditor::with_rng(config.editor.clone(), editor_rng);
    let mut report = SimulationReport::default();

    tracing::info!(
        "Simulating {} operations with seed {}",
        config.operations,
        config.seed
    );

    for step in 0..config.operations {
        let command = random_command(&mut rng, editor.items());
        let before = editor.items().to_vec();

        let rejected = editor.execute(command.clone()).is_err();
        report.operations += 1;
        if rejected {
            report.rejected += 1;
        } else {
            report.applied += 1;
        }

        let found = check_step(step, &command, &before, editor.items(), rejected);
        if !found.is_empty() {
            tracing::warn!("Step {} ({:?}) violated {} invariants", step, command, found.len());
            report.violations.extend(found);
            if config.stop_on_first_violation {
                break;
            }
        }
    }

    report
}

/// Whether normalization is allowed to leave the total away from 100
#[must_use]
pub fn is_pass_through(items: &[Item]) -> bool {
    total_weight(items) == 0 || unlocked_count(items) == 0 || locked_weight(items) >= WEIGHT_TOTAL
}

fn check_step(
    step: u64,
    command: &EditorCommand,
    before: &[Item],
    after: &[Item],
    rejected: bool,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if after.is_empty() {
        violations.push(Violation::EmptyList { step });
        return violations;
    }

    if rejected && before != after {
        violations.push(Violation::RejectedCommandMutated { step });
    }

    for item in after {
        if item.weight > MAX_WEIGHT {
            violations.push(Violation::WeightOutOfRange {
                step,
                id: item.id,
                weight: item.weight,
            });
        }
    }

    let previous: HashMap<ItemId, &Item> = before.iter().map(|item| (item.id, item)).collect();
    for item in after.iter().filter(|item| item.locked) {
        if let Some(old) = previous.get(&item.id) {
            if old.locked && old.weight != item.weight {
                violations.push(Violation::LockedWeightChanged {
                    step,
                    id: item.id,
                    before: old.weight,
                    after: item.weight,
                });
            }
        }
    }

    // renames and reorders never renormalize, so they inherit the prior state
    let renormalizes = !matches!(
        command,
        EditorCommand::RenameItem { .. } | EditorCommand::Reorder { .. }
    );
    let total = total_weight(after);
    if !rejected && renormalizes && total != WEIGHT_TOTAL && !is_pass_through(after) {
        violations.push(Violation::TotalDrift { step, total });
    }

    violations
}

fn random_command<R: Rng>(rng: &mut R, items: &[Item]) -> EditorCommand {
    let pick = |rng: &mut R| {
        if items.is_empty() || rng.random_bool(0.02) {
            ItemId::new()
        } else {
            items[rng.random_range(0..items.len())].id
        }
    };

    match rng.random_range(0..100u32) {
        0..=11 => EditorCommand::AddItem,
        12..=21 => EditorCommand::RemoveItem { id: pick(rng) },
        22..=26 => EditorCommand::RenameItem {
            id: pick(rng),
            name: format!("renamed {}", rng.random_range(0..1000u32)),
        },
        27..=49 => EditorCommand::SetWeight {
            id: pick(rng),
            value: rng.random_range(-20..=120i64),
        },
        50..=56 => EditorCommand::SetWeightInput {
            id: pick(rng),
            input: if rng.random_bool(0.3) {
                "not a number".to_string()
            } else {
                format!("{:.1}", rng.random_range(0.0..100.0f64))
            },
        },
        57..=74 => EditorCommand::ToggleLock { id: pick(rng) },
        75..=82 => EditorCommand::Reorder {
            source: pick(rng),
            target: pick(rng),
        },
        _ => EditorCommand::ApplyStrategy {
            kind: StrategyKind::ALL[rng.random_range(0..StrategyKind::ALL.len())],
        },
    }
}
