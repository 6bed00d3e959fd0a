//! Train/test view of a partitioned stream
//!
//! In a k-fold experiment with `parts` parts, fold `k` holds out part `k` for
//! testing and trains on every other part.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};

use super::data_file::PartitionedEntries;
use crate::core::error::Result;
use crate::core::{Entry, PartNumber};

/// Which side of a fold an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldRole {
    Train,
    Test,
}

impl FoldRole {
    /// Role of an entry tagged with `part` in fold `fold`
    pub fn for_part(part: PartNumber, fold: PartNumber) -> Self {
        if part == fold {
            FoldRole::Test
        } else {
            FoldRole::Train
        }
    }
}

impl fmt::Display for FoldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldRole::Train => write!(f, "train"),
            FoldRole::Test => write!(f, "test"),
        }
    }
}

/// Lazy stream of `(role, entry)` pairs for one fold
pub struct FoldEntries<R = BufReader<File>> {
    inner: PartitionedEntries<R>,
    fold: PartNumber,
}

impl<R: BufRead> FoldEntries<R> {
    /// Label the entries of `inner` for fold `fold`
    ///
    /// `fold` is expected to lie in `1..=inner.parts()`; a fold outside that
    /// range simply labels every entry as training data.
    pub fn new(inner: PartitionedEntries<R>, fold: PartNumber) -> Self {
        Self { inner, fold }
    }

    pub fn fold(&self) -> PartNumber {
        self.fold
    }
}

impl<R: BufRead> Iterator for FoldEntries<R> {
    type Item = Result<(FoldRole, Entry)>;

    fn next(&mut self) -> Option<Self::Item> {
        let fold = self.fold;
        self.inner
            .next()
            .map(|item| item.map(|(part, entry)| (FoldRole::for_part(part, fold), entry)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn roles(text: &str, num_blocks: u64, parts: usize, fold: PartNumber) -> Vec<FoldRole> {
        let inner = PartitionedEntries::from_reader(Cursor::new(text), "\n", 1, num_blocks, parts)
            .unwrap();
        FoldEntries::new(inner, fold)
            .map(|item| item.unwrap().0)
            .collect()
    }

    #[test]
    fn test_role_for_part() {
        assert_eq!(FoldRole::for_part(2, 2), FoldRole::Test);
        assert_eq!(FoldRole::for_part(1, 2), FoldRole::Train);
    }

    #[test]
    fn test_last_fold_holds_out_remainder() {
        use FoldRole::*;
        assert_eq!(
            roles("a\nb\nc\nd\ne\n", 5, 2, 2),
            vec![Train, Train, Test, Test, Test]
        );
    }

    #[test]
    fn test_every_entry_is_test_exactly_once_across_folds() {
        let text = "1\n2\n3\n4\n5\n6\n7\n";
        let parts = 3;
        let mut test_counts = vec![0; 7];
        for fold in 1..=parts {
            for (i, role) in roles(text, 7, parts, fold).into_iter().enumerate() {
                if role == FoldRole::Test {
                    test_counts[i] += 1;
                }
            }
        }
        assert!(test_counts.iter().all(|&c| c == 1));
    }

    #[test]
    fn test_display_and_serde() {
        assert_eq!(FoldRole::Test.to_string(), "test");
        assert_eq!(serde_json::to_string(&FoldRole::Train).unwrap(), "\"train\"");
    }
}
