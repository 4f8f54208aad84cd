//! weightmix Editor
//!
//! Stateful weight editor built on [`weightmix_engine`]:
//! - Owns the single item-list state cell
//! - Exposes the command interface (add, remove, rename, set weight, lock,
//!   reorder, apply strategy) and the query interface (snapshot, total,
//!   lock and deviation flags)
//! - Serializes concurrent callers through a single-writer mailbox
//! - Loads TOML configuration
//!
//! # Example
//!
//! ```rust
//! use weightmix_editor::{EditorConfig, WeightEditor};
//! use weightmix_engine::StrategyKind;
//!
//! let config = EditorConfig::new()
//!     .with_initial_items(["A", "B", "C", "D"])
//!     .with_seed(1);
//! let mut editor = WeightEditor::new(config);
//!
//! let a = editor.items()[0].id;
//! editor.set_weight(a, 80).unwrap();
//! assert_eq!(editor.total(), 100);
//!
//! editor.toggle_lock(a).unwrap();
//! assert!(editor.apply_strategy(StrategyKind::BellCurve).is_err());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod config;
pub mod editor;
pub mod error;
pub mod handle;
pub mod simulate;

// Re-exports for convenience
pub use config::EditorConfig;
pub use editor::{parse_weight, EditorCommand, WeightEditor, WeightSummary};
pub use error::{ConfigError, EditorError};
pub use handle::EditorHandle;
pub use simulate::{run_simulation, SimulationReport, SimulatorConfig, Violation};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the editor
    pub use crate::{EditorCommand, EditorConfig, EditorError, EditorHandle, WeightEditor};
    pub use weightmix_engine::{Item, ItemId, StrategyKind};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
