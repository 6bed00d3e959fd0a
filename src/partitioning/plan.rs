//! Block-to-part assignment plan
//!
//! `num_blocks` blocks are spread over `parts` parts with
//! `blocks_per_part, remainder = divmod(num_blocks, parts)`. Parts `1..parts`
//! each receive `blocks_per_part` blocks and the last part absorbs the rest.
//!
//! When there are fewer blocks than parts (`blocks_per_part == 0`) no part
//! boundary is ever reached, so every block stays in part 1. [`PartPlan`]
//! reports exactly what the streaming assignment in
//! [`PartitionedEntries`](super::data_file::PartitionedEntries) produces.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{ensure_parts, Result};
use crate::core::PartNumber;

/// Integer ceiling division for a positive divisor
pub fn ceil_div(numerator: u64, denominator: u64) -> u64 {
    numerator / denominator + u64::from(numerator % denominator != 0)
}

/// How the blocks of a corpus are distributed over parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartPlan {
    pub num_blocks: u64,
    pub parts: usize,
    pub blocks_per_part: u64,
    pub remainder: u64,
}

impl PartPlan {
    /// Plan `num_blocks` blocks over `parts` parts
    pub fn new(num_blocks: u64, parts: usize) -> Result<Self> {
        ensure_parts(parts)?;
        let divisor = parts as u64;
        Ok(Self {
            num_blocks,
            parts,
            blocks_per_part: num_blocks / divisor,
            remainder: num_blocks % divisor,
        })
    }

    /// Part assigned to the 1-based block `block`
    ///
    /// # Examples
    /// ```
    /// use kfold::partitioning::PartPlan;
    ///
    /// // 11 blocks over 3 parts: 3 + 3 + 5
    /// let plan = PartPlan::new(11, 3).unwrap();
    /// assert_eq!(plan.part_for_block(3), 1);
    /// assert_eq!(plan.part_for_block(4), 2);
    /// assert_eq!(plan.part_for_block(7), 3);
    /// assert_eq!(plan.part_for_block(11), 3);
    /// ```
    pub fn part_for_block(&self, block: u64) -> PartNumber {
        if self.blocks_per_part == 0 || block == 0 {
            return 1;
        }
        let part = (block - 1) / self.blocks_per_part + 1;
        part.min(self.parts as u64) as PartNumber
    }

    /// Number of blocks part `part` receives (0 for parts outside `1..=parts`)
    pub fn blocks_in_part(&self, part: PartNumber) -> u64 {
        if part == 0 || part > self.parts {
            return 0;
        }
        if self.blocks_per_part == 0 {
            return if part == 1 { self.num_blocks } else { 0 };
        }
        if part < self.parts {
            self.blocks_per_part
        } else {
            self.blocks_per_part + self.remainder
        }
    }

    /// Blocks per part, indexed from part 1
    pub fn part_sizes(&self) -> Vec<u64> {
        (1..=self.parts).map(|part| self.blocks_in_part(part)).collect()
    }

    /// Number of parts that receive at least one block
    pub fn parts_used(&self) -> usize {
        self.part_sizes().iter().filter(|&&blocks| blocks > 0).count()
    }
}

/// Summary of how a corpus will be partitioned
///
/// The `Display` form is the human-readable report, e.g.
/// `11 entries into 3 parts, 3 blocks of 1 entries per part (plus 2 extra blocks in last part)`.
///
/// The numbers are the plain divmod of blocks by parts. With fewer blocks than
/// parts that reads "0 blocks ... per part (plus N extra blocks in last part)",
/// yet a stream never reaches the last part in that case: all N blocks land in
/// part 1, as [`PartPlan::blocks_in_part`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    pub entries: u64,
    pub parts: usize,
    pub blocks_per_part: u64,
    pub granularity: usize,
    pub extra_blocks: u64,
}

impl Breakdown {
    pub fn new(entries: u64, granularity: usize, plan: &PartPlan) -> Self {
        Self {
            entries,
            parts: plan.parts,
            blocks_per_part: plan.blocks_per_part,
            granularity,
            extra_blocks: plan.remainder,
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries into {} parts, {} blocks of {} entries per part",
            self.entries, self.parts, self.blocks_per_part, self.granularity
        )?;
        if self.extra_blocks > 0 {
            write!(f, " (plus {} extra blocks in last part)", self.extra_blocks)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::PartitionError;

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(0, 3), 0);
        assert_eq!(ceil_div(9, 3), 3);
        assert_eq!(ceil_div(10, 3), 4);
        assert_eq!(ceil_div(1, 1), 1);
        assert_eq!(ceil_div(u64::MAX, 2), u64::MAX / 2 + 1);
    }

    #[test]
    fn test_divmod() {
        let plan = PartPlan::new(11, 3).unwrap();
        assert_eq!(plan.blocks_per_part, 3);
        assert_eq!(plan.remainder, 2);
    }

    #[test]
    fn test_zero_parts_rejected() {
        assert!(matches!(
            PartPlan::new(10, 0),
            Err(PartitionError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_remainder_lands_in_last_part() {
        let plan = PartPlan::new(11, 3).unwrap();
        assert_eq!(plan.part_sizes(), vec![3, 3, 5]);
        let assigned: Vec<_> = (1..=11).map(|b| plan.part_for_block(b)).collect();
        assert_eq!(assigned, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn test_exact_division() {
        let plan = PartPlan::new(9, 3).unwrap();
        assert_eq!(plan.part_sizes(), vec![3, 3, 3]);
        assert_eq!(plan.parts_used(), 3);
    }

    #[test]
    fn test_fewer_blocks_than_parts_stay_in_first_part() {
        let plan = PartPlan::new(2, 5).unwrap();
        assert_eq!(plan.blocks_per_part, 0);
        assert_eq!(plan.part_sizes(), vec![2, 0, 0, 0, 0]);
        assert_eq!(plan.part_for_block(2), 1);
        assert_eq!(plan.parts_used(), 1);
    }

    #[test]
    fn test_empty_corpus() {
        let plan = PartPlan::new(0, 4).unwrap();
        assert_eq!(plan.part_sizes(), vec![0, 0, 0, 0]);
        assert_eq!(plan.parts_used(), 0);
    }

    #[test]
    fn test_blocks_in_part_out_of_range() {
        let plan = PartPlan::new(10, 2).unwrap();
        assert_eq!(plan.blocks_in_part(0), 0);
        assert_eq!(plan.blocks_in_part(3), 0);
    }

    #[test]
    fn test_breakdown_message() {
        let plan = PartPlan::new(11, 3).unwrap();
        let breakdown = Breakdown::new(11, 1, &plan);
        assert_eq!(
            breakdown.to_string(),
            "11 entries into 3 parts, 3 blocks of 1 entries per part (plus 2 extra blocks in last part)"
        );

        let even = Breakdown::new(12, 2, &PartPlan::new(6, 3).unwrap());
        assert_eq!(
            even.to_string(),
            "12 entries into 3 parts, 2 blocks of 2 entries per part"
        );
    }

    #[test]
    fn test_breakdown_with_fewer_blocks_than_parts() {
        let plan = PartPlan::new(3, 5).unwrap();
        let breakdown = Breakdown::new(3, 1, &plan);
        assert_eq!(
            breakdown.to_string(),
            "3 entries into 5 parts, 0 blocks of 1 entries per part (plus 3 extra blocks in last part)"
        );
        // the blocks actually stay in the first part
        assert_eq!(plan.blocks_in_part(1), 3);
        assert_eq!(plan.blocks_in_part(5), 0);
    }

    #[test]
    fn test_breakdown_serializes() {
        let breakdown = Breakdown::new(11, 1, &PartPlan::new(11, 3).unwrap());
        let json = serde_json::to_value(breakdown).unwrap();
        assert_eq!(json["entries"], 11);
        assert_eq!(json["extra_blocks"], 2);
    }
}
