//! Core types shared by every partitioning component
//!
//! This module defines the error taxonomy, the run configuration and the
//! metrics collection used by the partitioner.

pub mod config;
pub mod error;
pub mod metrics;

pub use config::{PartitionConfig, DEFAULT_DELIMITER, DEFAULT_GRANULARITY, DEFAULT_PARTS};
pub use error::{PartitionError, Result};
pub use metrics::{AggregationType, MetricsCollector};

/// 1-based index of an output part
pub type PartNumber = usize;

/// One record of a corpus, as the raw bytes between delimiters
pub type Entry = Vec<u8>;
