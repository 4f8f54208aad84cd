//! Editor configuration
//!
//! [`EditorConfig`] is plain serde data. Missing TOML keys fall back to
//! [`EditorConfig::default`].

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Weight editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Names of the items the editor starts with, split evenly
    pub initial_items: Vec<String>,
    /// Prefix for names of newly added items
    pub name_prefix: String,
    /// Allowed `|total - 100|` before the deviation warning fires
    pub deviation_tolerance: u32,
    /// Bounded mailbox size for [`crate::EditorHandle`]
    pub mailbox_capacity: usize,
    /// Seed for the random strategy; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With initial item names
    #[must_use]
    pub fn with_initial_items<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_items = names.into_iter().map(Into::into).collect();
        self
    }

    /// With fixed random seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// With deviation tolerance
    #[inline]
    #[must_use]
    pub fn with_deviation_tolerance(mut self, tolerance: u32) -> Self {
        self.deviation_tolerance = tolerance;
        self
    }

    /// With mailbox capacity
    #[inline]
    #[must_use]
    pub fn with_mailbox_capacity(mut self, capacity: usize) -> Self {
        self.mailbox_capacity = capacity;
        self
    }

    /// Parse and validate TOML text
    ///
    /// # Errors
    /// `ConfigError::Parse` on malformed TOML, `ConfigError::Invalid` when
    /// [`EditorConfig::validate`] fails.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    ///
    /// # Errors
    /// `ConfigError::Io` when the file cannot be read, otherwise as
    /// [`EditorConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Loading editor config from {}", path.display());
        Self::from_toml_str(&text)
    }

    /// Check value constraints
    ///
    /// # Errors
    /// `ConfigError::Invalid` for an empty item list or a zero mailbox.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_items.is_empty() {
            return Err(ConfigError::Invalid(
                "initial_items must name at least one item".to_string(),
            ));
        }
        if self.mailbox_capacity == 0 {
            return Err(ConfigError::Invalid(
                "mailbox_capacity must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            initial_items: vec![
                "Creative 1".to_string(),
                "Creative 2".to_string(),
                "Creative 3".to_string(),
            ],
            name_prefix: "Creative".to_string(),
            deviation_tolerance: 1,
            mailbox_capacity: 64,
            seed: None,
        }
    }
}
