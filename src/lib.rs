//! kfold - Block-granular partitioning of delimited corpora
//!
//! This crate splits a delimited text corpus (one training example per
//! record) into roughly equal parts for k-fold cross-validation. Entries are
//! grouped into fixed-size blocks and whole blocks are distributed over the
//! requested parts, with leftover blocks going to the last part.
//!
//! ```no_run
//! use kfold::Partitioner;
//!
//! let corpus = Partitioner::with_options("train.conll", "\n\n", 1)?;
//! println!("{}", corpus.breakdown(10)?);
//! for item in corpus.each_entry_in_parts(10)? {
//!     let (part, entry) = item?;
//!     println!("{}: {}", part, String::from_utf8_lossy(&entry));
//! }
//! # Ok::<(), kfold::PartitionError>(())
//! ```

pub mod core;
pub mod partitioning;
mod tests;

// Re-export commonly used types
pub use crate::core::{Entry, PartNumber, PartitionConfig, PartitionError, Result};
pub use partitioning::{Breakdown, FoldRole, PartPlan, PartitionedEntries, Partitioner};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
