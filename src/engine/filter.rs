//! Partition filter constructors.
//!
//! A partition filter selects a contiguous run of partitions `[begin,
//! begin + count)`, optionally resuming after a specific record digest.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;

use crate::error::ParseError;

/// Number of partitions in a namespace.
pub const MAX_PARTITIONS: i32 = 4096;

/// Length of a record digest in bytes.
const DIGEST_LEN: usize = 20;

/// Resume point inside the first partition of a filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigestCursor {
    pub namespace: String,
    pub digest: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionFilter {
    pub begin: i32,
    pub count: i32,
    pub digest: Option<DigestCursor>,
}

impl PartitionFilter {
    pub const fn range(begin: i32, count: i32) -> Self {
        Self {
            begin,
            count,
            digest: None,
        }
    }
}

/// Every partition of the namespace.
pub const fn filter_all() -> PartitionFilter {
    PartitionFilter::range(0, MAX_PARTITIONS)
}

/// All records after `digest` (base64): from the digest's partition to the
/// last partition, skipping records up to the digest itself.
pub fn filter_after_digest(namespace: &str, digest: &str) -> Result<PartitionFilter, ParseError> {
    let cursor = decode_digest(namespace, digest)?;
    let begin = partition_id(&cursor.digest);

    Ok(PartitionFilter {
        begin,
        count: MAX_PARTITIONS - begin,
        digest: Some(cursor),
    })
}

/// Parse a comma-separated list of partition selectors.
///
/// Each entry is one of:
/// - `N`: the single partition `N`
/// - `N-COUNT`: `COUNT` partitions starting at `N`
/// - a base64 digest: the single partition holding that digest
pub fn parse_partition_range_list(
    namespace: &str,
    list: &str,
) -> Result<Vec<PartitionFilter>, ParseError> {
    list.split(',')
        .map(|entry| parse_entry(namespace, entry))
        .collect()
}

fn parse_entry(namespace: &str, entry: &str) -> Result<PartitionFilter, ParseError> {
    let range_err = |reason: &str| ParseError::PartitionRange {
        input: entry.to_string(),
        reason: reason.to_string(),
    };

    if entry.is_empty() {
        return Err(range_err("empty entry"));
    }

    let is_numeric = entry.bytes().all(|b| b.is_ascii_digit() || b == b'-');
    if !is_numeric {
        let cursor = decode_digest(namespace, entry)?;
        let begin = partition_id(&cursor.digest);
        return Ok(PartitionFilter {
            begin,
            count: 1,
            digest: Some(cursor),
        });
    }

    let (begin, count) = match entry.split_once('-') {
        Some((begin, count)) => (begin, count),
        None => (entry, "1"),
    };

    let begin: i32 = begin
        .parse()
        .map_err(|_| range_err("partition id is not a number"))?;
    let count: i32 = count
        .parse()
        .map_err(|_| range_err("partition count is not a number"))?;

    if !(0..MAX_PARTITIONS).contains(&begin) {
        return Err(range_err("partition id must be between 0 and 4095"));
    }
    if count < 1 {
        return Err(range_err("partition count must be at least 1"));
    }
    if count > MAX_PARTITIONS - begin {
        return Err(range_err("range exceeds the last partition"));
    }

    Ok(PartitionFilter::range(begin, count))
}

fn decode_digest(namespace: &str, digest: &str) -> Result<DigestCursor, ParseError> {
    let bytes = STANDARD.decode(digest).map_err(|e| ParseError::Digest {
        input: digest.to_string(),
        reason: e.to_string(),
    })?;

    if bytes.len() != DIGEST_LEN {
        return Err(ParseError::Digest {
            input: digest.to_string(),
            reason: format!("expected {DIGEST_LEN} bytes, got {}", bytes.len()),
        });
    }

    Ok(DigestCursor {
        namespace: namespace.to_string(),
        digest: bytes,
    })
}

/// Low 12 bits of the little-endian first two digest bytes.
fn partition_id(digest: &[u8]) -> i32 {
    i32::from(u16::from_le_bytes([digest[0], digest[1]]) & 0x0FFF)
}
