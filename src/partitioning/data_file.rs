//! Delimited corpus file and its partitioned stream
//!
//! A [`Partitioner`] wraps one corpus file. It counts the file's entries once
//! and caches the result, reports how the entries will be split, and streams
//! the entries tagged with their part number.
//!
//! ## Assignment
//!
//! Entries are grouped into blocks of `granularity` consecutive entries and
//! whole blocks are assigned to parts. While streaming, every entry is tagged
//! with the part that is current *when it is read*; only afterwards is the
//! block bookkeeping updated. When a block fills up and it was the
//! `blocks_per_part`-th block of a part that is not the last one, the stream
//! moves on to the next part. The last part never advances, so it collects
//! every remaining block.
//!
//! ## Metrics tracked
//!
//! | Metric | Type | Description |
//! |--------|------|-------------|
//! | `file_scans` | Counter | Full reads of the source file |
//! | `scan_ms` | Sample | Duration of each counting scan |
//! | `entries_emitted` | Counter | Entries yielded by partitioned streams |
//! | `part_entries:N` | Counter | Entries yielded into part N |

use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, trace, warn};

use super::delimited::{count_entries, Entries};
use super::folds::{FoldEntries, FoldRole};
use super::plan::{ceil_div, Breakdown, PartPlan};
use crate::core::config::{PartitionConfig, DEFAULT_DELIMITER, DEFAULT_GRANULARITY, DEFAULT_PARTS};
use crate::core::error::{ensure_delimiter, ensure_fold, ensure_granularity, ensure_parts, Result};
use crate::core::metrics::{
    part_entries_metric, MetricsCollector, ENTRIES_EMITTED, FILE_SCANS, SCAN_MS,
};
use crate::core::{Entry, PartNumber};

// ---------------------------------------------------------------------------
// Partitioner
// ---------------------------------------------------------------------------

/// A delimited corpus file to be split into parts
///
/// Construction never touches the file. Each counting or streaming operation
/// opens the file itself and closes it when done; no handle is kept between
/// calls.
#[derive(Debug)]
pub struct Partitioner {
    source_path: PathBuf,
    delimiter: String,
    granularity: usize,

    // Memoized counts
    entry_count: Mutex<Option<u64>>,
    block_count: Mutex<Option<u64>>,

    metrics: MetricsCollector,
}

impl Partitioner {
    /// Partitioner with one entry per line and one entry per block
    pub fn new(source_path: impl Into<PathBuf>) -> Self {
        Self::build(
            source_path.into(),
            DEFAULT_DELIMITER.to_string(),
            DEFAULT_GRANULARITY,
        )
    }

    /// Partitioner with an explicit delimiter and granularity
    ///
    /// Fails with `InvalidArgument` for an empty delimiter or a zero granularity.
    pub fn with_options(
        source_path: impl Into<PathBuf>,
        delimiter: impl Into<String>,
        granularity: usize,
    ) -> Result<Self> {
        let delimiter = delimiter.into();
        ensure_delimiter(&delimiter)?;
        ensure_granularity(granularity)?;
        Ok(Self::build(source_path.into(), delimiter, granularity))
    }

    /// Partitioner configured from a [`PartitionConfig`]
    ///
    /// The config's `parts` is not stored; pass it to the streaming calls.
    pub fn from_config(source_path: impl Into<PathBuf>, config: &PartitionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(
            source_path.into(),
            config.delimiter.clone(),
            config.granularity,
        ))
    }

    fn build(source_path: PathBuf, delimiter: String, granularity: usize) -> Self {
        Self {
            source_path,
            delimiter,
            granularity,
            entry_count: Mutex::new(None),
            block_count: Mutex::new(None),
            metrics: MetricsCollector::new(),
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn granularity(&self) -> usize {
        self.granularity
    }

    /// Instrumentation shared with every stream this partitioner creates
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    fn open(&self) -> Result<BufReader<File>> {
        let file = File::open(&self.source_path)?;
        self.metrics.increment(FILE_SCANS);
        Ok(BufReader::new(file))
    }

    // -- Counting -------------------------------------------------------------

    /// Number of entries in the file
    ///
    /// The first call scans the file; later calls return the cached count.
    pub fn num_entries(&self) -> Result<u64> {
        let mut cached = self.entry_count.lock();
        if let Some(count) = *cached {
            return Ok(count);
        }

        let started = Instant::now();
        let count = count_entries(self.open()?, &self.delimiter)?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.metrics.record(SCAN_MS, elapsed_ms);
        debug!(
            path = %self.source_path.display(),
            entries = count,
            elapsed_ms,
            "counted entries"
        );

        *cached = Some(count);
        Ok(count)
    }

    /// Number of blocks, `ceil(num_entries / granularity)`
    pub fn num_blocks(&self) -> Result<u64> {
        let mut cached = self.block_count.lock();
        if let Some(count) = *cached {
            return Ok(count);
        }
        let count = ceil_div(self.num_entries()?, self.granularity as u64);
        *cached = Some(count);
        Ok(count)
    }

    // -- Planning -------------------------------------------------------------

    /// Distribution of this file's blocks over `parts` parts
    pub fn plan(&self, parts: usize) -> Result<PartPlan> {
        ensure_parts(parts)?;
        PartPlan::new(self.num_blocks()?, parts)
    }

    /// Report of how the file splits into `parts` parts
    pub fn breakdown(&self, parts: usize) -> Result<Breakdown> {
        let plan = self.plan(parts)?;
        Ok(Breakdown::new(self.num_entries()?, self.granularity, &plan))
    }

    /// [`breakdown`](Self::breakdown) with the default 10 parts
    pub fn breakdown_default(&self) -> Result<Breakdown> {
        self.breakdown(DEFAULT_PARTS)
    }

    // -- Streaming ------------------------------------------------------------

    /// Stream `(part_number, entry)` pairs in file order
    ///
    /// Every call reads the file afresh. Dropping the iterator early closes
    /// the file.
    pub fn each_entry_in_parts(&self, parts: usize) -> Result<PartitionedEntries> {
        let plan = self.plan(parts)?;
        if plan.num_blocks < parts as u64 {
            warn!(
                path = %self.source_path.display(),
                blocks = plan.num_blocks,
                parts,
                "fewer blocks than parts, some parts will be empty"
            );
        }
        debug!(
            path = %self.source_path.display(),
            parts,
            blocks_per_part = plan.blocks_per_part,
            remainder = plan.remainder,
            "streaming entries in parts"
        );

        let entries = Entries::new(self.open()?, &self.delimiter)?;
        Ok(PartitionedEntries::new(entries, plan, self.granularity).with_metrics(self.metrics.clone()))
    }

    /// [`each_entry_in_parts`](Self::each_entry_in_parts) with the default 10 parts
    pub fn each_entry_in_parts_default(&self) -> Result<PartitionedEntries> {
        self.each_entry_in_parts(DEFAULT_PARTS)
    }

    /// Stream entries labelled for fold `fold` of a `parts`-fold split
    ///
    /// Entries of part `fold` are [`FoldRole::Test`], the rest [`FoldRole::Train`].
    pub fn each_entry_in_fold(&self, parts: usize, fold: PartNumber) -> Result<FoldEntries> {
        ensure_parts(parts)?;
        ensure_fold(parts, fold)?;
        Ok(FoldEntries::new(self.each_entry_in_parts(parts)?, fold))
    }

    /// Entries of one fold's test part, collected in file order
    pub fn test_entries(&self, parts: usize, fold: PartNumber) -> Result<Vec<Entry>> {
        self.each_entry_in_fold(parts, fold)?
            .filter_map(|item| match item {
                Ok((FoldRole::Test, entry)) => Some(Ok(entry)),
                Ok((FoldRole::Train, _)) => None,
                Err(e) => Some(Err(e)),
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// PartitionedEntries
// ---------------------------------------------------------------------------

/// Lazy stream of `(part_number, entry)` pairs
///
/// Produced by [`Partitioner::each_entry_in_parts`], or built over any
/// [`BufRead`] with [`PartitionedEntries::from_reader`]. Entries are the raw
/// bytes between delimiters. A read error is yielded once and ends the stream.
pub struct PartitionedEntries<R = BufReader<File>> {
    entries: Entries<R>,
    parts: usize,
    granularity: u64,
    blocks_per_part: u64,

    // Assignment state
    current_part: PartNumber,
    current_block: u64,
    entries_in_block: u64,

    emitted_in_part: u64,
    metrics: MetricsCollector,
    finished: bool,
}

impl<R: BufRead> PartitionedEntries<R> {
    fn new(entries: Entries<R>, plan: PartPlan, granularity: usize) -> Self {
        Self {
            entries,
            parts: plan.parts,
            granularity: granularity as u64,
            blocks_per_part: plan.blocks_per_part,
            current_part: 1,
            current_block: 1,
            entries_in_block: 0,
            emitted_in_part: 0,
            metrics: MetricsCollector::new(),
            finished: false,
        }
    }

    /// Partition an in-memory or already-open reader
    ///
    /// `num_blocks` must be the reader's block count for `granularity`, as
    /// [`Partitioner::num_blocks`] would report it.
    ///
    /// # Examples
    /// ```
    /// use std::io::Cursor;
    /// use kfold::partitioning::PartitionedEntries;
    ///
    /// let corpus = Cursor::new("a\nb\nc\nd\ne\n");
    /// let tagged: Vec<_> = PartitionedEntries::from_reader(corpus, "\n", 1, 5, 2)
    ///     .unwrap()
    ///     .map(|item| item.unwrap().0)
    ///     .collect();
    /// assert_eq!(tagged, vec![1, 1, 2, 2, 2]);
    /// ```
    pub fn from_reader(
        reader: R,
        delimiter: &str,
        granularity: usize,
        num_blocks: u64,
        parts: usize,
    ) -> Result<Self> {
        ensure_granularity(granularity)?;
        let plan = PartPlan::new(num_blocks, parts)?;
        Ok(Self::new(Entries::new(reader, delimiter)?, plan, granularity))
    }

    /// Report emitted-entry counts into `metrics`
    pub fn with_metrics(mut self, metrics: MetricsCollector) -> Self {
        self.metrics = metrics;
        self
    }

    /// Number of parts requested
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// Part the next entry will be tagged with
    pub fn current_part(&self) -> PartNumber {
        self.current_part
    }

    /// Block bookkeeping after an entry has been emitted.
    fn advance(&mut self) {
        self.entries_in_block += 1;
        if self.entries_in_block != self.granularity {
            return;
        }

        if self.current_block == self.blocks_per_part && self.current_part != self.parts {
            self.flush_part_count();
            self.current_part += 1;
            self.current_block = 1;
            trace!(part = self.current_part, "advanced to next part");
        } else {
            self.current_block += 1;
        }
        self.entries_in_block = 0;
    }
}

impl<R> PartitionedEntries<R> {
    /// Move the running count of the current part into the metrics.
    fn flush_part_count(&mut self) {
        if self.emitted_in_part == 0 {
            return;
        }
        self.metrics
            .add(&part_entries_metric(self.current_part), self.emitted_in_part);
        self.metrics.add(ENTRIES_EMITTED, self.emitted_in_part);
        self.emitted_in_part = 0;
    }
}

impl<R: BufRead> Iterator for PartitionedEntries<R> {
    type Item = Result<(PartNumber, Entry)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.entries.next() {
            Some(Ok(entry)) => {
                let part = self.current_part;
                self.emitted_in_part += 1;
                self.advance();
                Some(Ok((part, entry)))
            }
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(e.into()))
            }
            None => {
                self.finished = true;
                self.flush_part_count();
                None
            }
        }
    }
}

impl<R> Drop for PartitionedEntries<R> {
    fn drop(&mut self) {
        self.flush_part_count();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
