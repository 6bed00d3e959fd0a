//! Partitioning of delimited corpora
//!
//! Reads a corpus as delimiter-separated entries, groups entries into blocks
//! and assigns whole blocks to parts.

pub mod data_file;
pub mod delimited;
pub mod folds;
pub mod plan;

pub use data_file::{PartitionedEntries, Partitioner};
pub use delimited::{count_entries, DelimitedReader, Entries};
pub use folds::{FoldEntries, FoldRole};
pub use plan::{Breakdown, PartPlan};
