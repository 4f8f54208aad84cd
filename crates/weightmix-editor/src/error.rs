//! Error types for the weight editor
//!
//! Every [`EditorError`] returned by a command means the snapshot was left
//! exactly as it was. Nothing here is fatal; the presentation layer can
//! keep going after any of them.

use std::path::PathBuf;
use weightmix_engine::{DistributionError, ItemId};

/// Rejected editor command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    /// No item with this id
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// The last remaining item cannot be removed
    #[error("cannot remove the last item")]
    LastItem,

    /// Locked items cannot be edited directly
    #[error("item is locked: {0}")]
    ItemLocked(ItemId),

    /// Weight text did not parse as a number
    #[error("invalid weight input: {0:?}")]
    InvalidWeight(String),

    /// An editor needs at least one item
    #[error("editor requires at least one item")]
    NoItems,

    /// Strategy could not run on the current items
    #[error("distribution rejected: {0}")]
    Distribution(#[from] DistributionError),

    /// The owning task has stopped
    #[error("editor mailbox closed")]
    MailboxClosed,
}

impl EditorError {
    /// Whether the command was refused because of the current item state
    /// rather than a bad argument or a dead mailbox
    #[inline]
    #[must_use]
    pub fn is_state_rejection(&self) -> bool {
        matches!(
            self,
            Self::LastItem | Self::ItemLocked(_) | Self::Distribution(_)
        )
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`crate::EditorConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but holds unusable values
    #[error("invalid config value: {0}")]
    Invalid(String),
}
