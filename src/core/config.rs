//! Partitioning configuration
//!
//! A [`PartitionConfig`] bundles the three knobs of a partitioning run: the
//! record delimiter, the block granularity and the number of parts. It can be
//! built in code with the `with_*` setters or loaded from a JSON document, in
//! which case missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::{ensure_delimiter, ensure_granularity, ensure_parts, Result};

/// Default record delimiter (one entry per line)
pub const DEFAULT_DELIMITER: &str = "\n";

/// Default number of entries per block
pub const DEFAULT_GRANULARITY: usize = 1;

/// Default number of parts
pub const DEFAULT_PARTS: usize = 10;

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

fn default_granularity() -> usize {
    DEFAULT_GRANULARITY
}

fn default_parts() -> usize {
    DEFAULT_PARTS
}

/// Configuration for a partitioning run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionConfig {
    /// Literal string separating records
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    /// Entries per block
    #[serde(default = "default_granularity")]
    pub granularity: usize,
    /// Number of parts to produce
    #[serde(default = "default_parts")]
    pub parts: usize,
}

impl PartitionConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self {
            delimiter: default_delimiter(),
            granularity: DEFAULT_GRANULARITY,
            parts: DEFAULT_PARTS,
        }
    }

    /// Set the record delimiter
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set the block granularity
    pub fn with_granularity(mut self, granularity: usize) -> Self {
        self.granularity = granularity;
        self
    }

    /// Set the number of parts
    pub fn with_parts(mut self, parts: usize) -> Self {
        self.parts = parts;
        self
    }

    /// Check that every field is usable
    pub fn validate(&self) -> Result<()> {
        ensure_delimiter(&self.delimiter)?;
        ensure_granularity(self.granularity)?;
        ensure_parts(self.parts)?;
        Ok(())
    }

    /// Parse and validate a JSON configuration document
    ///
    /// # Examples
    /// ```
    /// use kfold::core::config::PartitionConfig;
    ///
    /// let config = PartitionConfig::from_json_str(r#"{"delimiter": "\n\n", "parts": 5}"#).unwrap();
    /// assert_eq!(config.delimiter, "\n\n");
    /// assert_eq!(config.granularity, 1);
    /// assert_eq!(config.parts, 5);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PartitionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self::new()
    }
}
