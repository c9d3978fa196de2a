//! Error types for option validation and literal parsing.
//!
//! Two families live here:
//!
//! - [`ValidationError`]: a constraint between options was violated.  The
//!   `Display` text is what the operator sees, so the wording is part of the
//!   contract and is asserted verbatim by the tests.
//! - [`ParseError`]: a literal (time string, rack list, digest, partition
//!   range, filter expression, file prefix) could not be parsed.
//!
//! Anything above the model layer (file loading, secret resolution, engine
//! hand-off, assembly) uses `anyhow` with context instead.

use thiserror::Error;

/// A violated constraint.  Validation is fail-fast: the first violation found
/// is returned and the remaining checks are not run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("must specify either estimate, output-file or directory")]
    MissingOutputTarget,

    #[error("only one of output-file and directory may be configured at the same time")]
    OutputFileWithDirectory,

    #[error("invalid output-file-prefix: {0}")]
    FilePrefix(#[source] ParseError),

    #[error("using output-file-prefix is not allowed with output-file")]
    FilePrefixWithOutputFile,

    /// Names of every filter that was set, in declaration order.
    #[error("only one of {} can be configured", .0.join(" or "))]
    MultipleFilters(Vec<&'static str>),

    #[error("continue and state-file-dst are mutually exclusive")]
    ContinueWithStateFileDst,

    #[error(
        "continue and remove-files are mutually exclusive, as remove-files will delete the backup files"
    )]
    ContinueWithRemoveFiles,

    #[error("max-records must be used with parallel = 1")]
    MaxRecordsWithParallel,

    #[error("estimate with any filter is not allowed")]
    EstimateWithFilter,

    #[error("estimate with output-file or directory is not allowed")]
    EstimateWithOutput,

    #[error("estimate with estimate-samples < 0 is not allowed")]
    NegativeEstimateSamples,

    #[error("invalid restore mode: {0}")]
    RestoreMode(String),

    #[error("input file or directory required")]
    MissingRestoreInput,

    #[error("only one of directory and input-file may be configured at the same time")]
    DirectoryWithInputFile,

    #[error(
        "only one of directory, input-file and directory-list may be configured at the same time"
    )]
    DirectoryListConflict,

    #[error("must specify directory-list list")]
    ParentWithoutDirectoryList,

    #[error("invalid namespace: {0}")]
    Namespace(String),

    #[error("{0} is required")]
    Required(&'static str),

    #[error("{0} must be non-negative")]
    Negative(&'static str),

    #[error("{field} can't be less than {min}")]
    TooSmall { field: &'static str, min: i64 },

    #[error("{0} and {1} are mutually exclusive")]
    Exclusive(&'static str, &'static str),

    #[error("{0} and {1} must be configured together")]
    Paired(&'static str, &'static str),

    #[error("{option} is not supported for xdr backup")]
    UnsupportedForXdr { option: &'static str },

    #[error("unsupported {kind}: {value}")]
    Unsupported { kind: &'static str, value: String },

    #[error("encryption key location not specified")]
    MissingEncryptionKey,

    #[error("only one encryption key source may be configured")]
    MultipleEncryptionKeys,

    #[error("failed to validate {provider}: {source}")]
    Storage {
        provider: &'static str,
        #[source]
        source: Box<ValidationError>,
    },

    #[error("only one cloud provider can be configured")]
    MultipleCloudProviders,

    #[error("exactly one of backup or xdr backup must be configured")]
    BackupMode,

    #[error("duplicate begin value {0} for count = 1")]
    DuplicatePartition(i32),

    #[error("invalid partition filter count: {0}")]
    PartitionCount(i32),

    #[error("overlapping intervals: [{0}, {1}] and [{2}, {3}]")]
    OverlappingPartitions(i32, i32, i32, i32),
}

impl ValidationError {
    /// Wrap a storage backend's own validation failure with the provider name.
    pub fn storage(provider: &'static str, source: Self) -> Self {
        Self::Storage {
            provider,
            source: Box::new(source),
        }
    }
}

/// A literal that could not be parsed into its typed form.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("unknown time format: {0}")]
    UnknownTimeFormat(String),

    #[error("failed to parse time {input}: {reason}")]
    Time { input: String, reason: String },

    #[error("failed to parse racks: {0}")]
    Rack(String),

    #[error("rack id {0} invalid, should be non-negative number")]
    NegativeRack(i64),

    #[error("rack id {id} invalid, should not exceed {max}")]
    RackTooLarge { id: i64, max: i64 },

    #[error("invalid digest {input}: {reason}")]
    Digest { input: String, reason: String },

    #[error("invalid partition range {input}: {reason}")]
    PartitionRange { input: String, reason: String },

    #[error("failed to parse filter expression: {0}")]
    FilterExpression(String),

    #[error("file prefix contains invalid character '{ch}' at position {pos}: {prefix:?}")]
    PrefixChar { ch: char, pos: usize, prefix: String },

    #[error("file prefix contains control character (0x{code:02X}) at position {pos}: {prefix:?}")]
    PrefixControl { code: u32, pos: usize, prefix: String },

    #[error("file prefix contains DEL character at position {pos}: {prefix:?}")]
    PrefixDel { pos: usize, prefix: String },

    #[error("file prefix cannot start or end with whitespace: {0:?}")]
    PrefixWhitespace(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiple_filters_join_with_or() {
        let err = ValidationError::MultipleFilters(vec!["after-digest", "partition-list"]);
        assert_eq!(
            err.to_string(),
            "only one of after-digest or partition-list can be configured"
        );
    }

    #[test]
    fn storage_error_names_the_provider() {
        let err = ValidationError::storage("aws s3", ValidationError::Required("bucket name"));
        assert_eq!(
            err.to_string(),
            "failed to validate aws s3: bucket name is required"
        );
    }

    #[test]
    fn file_prefix_error_is_wrapped() {
        let err = ValidationError::FilePrefix(ParseError::PrefixWhitespace(" a".into()));
        assert_eq!(
            err.to_string(),
            "invalid output-file-prefix: file prefix cannot start or end with whitespace: \" a\""
        );
    }

    #[test]
    fn control_character_is_printed_as_hex() {
        let err = ParseError::PrefixControl {
            code: 9,
            pos: 6,
            prefix: "backup\ttest".into(),
        };
        assert!(err.to_string().contains("(0x09) at position 6"));
    }
}
