//! Consistency checks over a set of partition filters.

use std::collections::HashSet;

use crate::{engine::PartitionFilter, error::ValidationError};

/// Reject filter sets that would back up a partition twice.
///
/// - Single-partition filters (`count == 1`) must have distinct `begin`s.
/// - Range filters (`count > 1`) cover `[begin, begin + count - 1]`; after
///   sorting by `begin`, a range must start strictly after the previous one
///   ends (touching counts as overlap).
/// - `count <= 0` is rejected outright.
///
/// Range ends saturate at `i32::MAX`.
pub fn validate_partition_filters(filters: &[PartitionFilter]) -> Result<(), ValidationError> {
    let mut points = HashSet::new();
    let mut intervals: Vec<(i32, i32)> = Vec::new();

    for filter in filters {
        match filter.count {
            1 => {
                if !points.insert(filter.begin) {
                    return Err(ValidationError::DuplicatePartition(filter.begin));
                }
            },
            count if count > 1 => {
                intervals.push((filter.begin, filter.begin.saturating_add(count - 1)));
            },
            count => return Err(ValidationError::PartitionCount(count)),
        }
    }

    intervals.sort_by_key(|&(begin, _)| begin);

    for pair in intervals.windows(2) {
        let (prev_begin, prev_end) = pair[0];
        let (curr_begin, curr_end) = pair[1];

        if curr_begin <= prev_end {
            return Err(ValidationError::OverlappingPartitions(
                prev_begin, prev_end, curr_begin, curr_end,
            ));
        }
    }

    Ok(())
}
