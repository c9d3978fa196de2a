//! Scan backup options.

use std::time::Duration;

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};

use super::{
    Common,
    MAX_RACK,
    Validate,
    partition::validate_partition_filters,
    split_by_comma,
    time::parse_local_time_to_utc,
};
use crate::{
    engine::{
        PartitionFilter,
        ReplicaPolicy,
        ScanPolicy,
        filter_after_digest,
        filter_all,
        parse_partition_range_list,
    },
    error::{ParseError, ValidationError},
};

/// Characters that may not appear in an output file prefix.
const PREFIX_FORBIDDEN: &str = r#"\/:*?"<>|"#;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Backup {
    pub common: Common,

    /// Single output file, or [`super::STDOUT_PLACEHOLDER`] for stdout.
    pub output_file: String,
    pub output_file_prefix: String,
    pub remove_files: bool,
    pub remove_artifacts: bool,
    /// MiB per output file.
    pub file_limit: u64,
    pub compact: bool,
    pub no_bins: bool,
    pub no_ttl_only: bool,

    pub modified_before: String,
    pub modified_after: String,
    pub after_digest: String,
    pub partition_list: String,
    pub node_list: String,
    pub rack_list: String,
    pub prefer_racks: String,
    /// Base64-encoded filter expression.
    pub filter_expression: String,

    pub max_records: i64,
    pub max_retries: u32,
    /// Milliseconds.
    pub sleep_between_retries: u64,
    pub scan_page_size: i64,

    pub estimate: bool,
    pub estimate_samples: i64,

    /// State file name (inside the directory) to resume from.
    pub continue_from: String,
    /// State file name (inside the directory) to save progress to.
    pub state_file_dst: String,
}

impl Backup {
    /// The target directory should be emptied before writing.
    pub fn should_clear_target(&self) -> bool {
        (self.remove_files || self.remove_artifacts) && self.continue_from.is_empty()
    }

    pub fn should_save_state(&self) -> bool {
        !self.state_file_dst.is_empty() || !self.continue_from.is_empty()
    }

    pub fn sets(&self) -> Vec<String> {
        self.common.sets()
    }

    pub fn bins(&self) -> Vec<String> {
        self.common.bins()
    }

    pub fn nodes(&self) -> Vec<String> {
        split_by_comma(&self.node_list)
    }

    /// Rack ids from the rack list; empty when no list is set.
    pub fn racks(&self) -> Result<Vec<u32>, ParseError> {
        split_by_comma(&self.rack_list)
            .iter()
            .map(|token| {
                let id: i64 = token
                    .parse()
                    .map_err(|e| ParseError::Rack(format!("{token:?}: {e}")))?;

                if id < 0 {
                    return Err(ParseError::NegativeRack(id));
                }
                if id > MAX_RACK {
                    return Err(ParseError::RackTooLarge { id, max: MAX_RACK });
                }

                u32::try_from(id).map_err(|e| ParseError::Rack(e.to_string()))
            })
            .collect()
    }

    pub fn modified_before_time(&self) -> Result<Option<DateTime<Utc>>, ParseError> {
        optional_time(&self.modified_before)
    }

    pub fn modified_after_time(&self) -> Result<Option<DateTime<Utc>>, ParseError> {
        optional_time(&self.modified_after)
    }

    pub fn scan_policy(&self) -> Result<ScanPolicy, ParseError> {
        let mut policy = ScanPolicy {
            max_records: self.max_records,
            max_retries: self.max_retries,
            sleep_between_retries: Duration::from_millis(self.sleep_between_retries),
            total_timeout: Duration::from_millis(self.common.total_timeout),
            socket_timeout: Duration::from_millis(self.common.socket_timeout),
            ..ScanPolicy::default()
        };

        if !self.prefer_racks.is_empty() {
            policy.replica_policy = ReplicaPolicy::PreferRack;
        }

        // Rack and node lists pin reads to the master copy, even when
        // prefer-racks is also set.
        if !self.rack_list.is_empty() || !self.node_list.is_empty() {
            policy.replica_policy = ReplicaPolicy::Master;
        }

        if self.no_bins {
            policy.include_bin_data = false;
        }

        if !self.filter_expression.is_empty() {
            let expression = STANDARD
                .decode(&self.filter_expression)
                .map_err(|e| ParseError::FilterExpression(e.to_string()))?;
            policy.filter_expression = Some(expression);
        }

        Ok(policy)
    }

    /// Resolve and sanity-check the partition filters for this backup.
    pub fn partition_filters(&self) -> Result<Vec<PartitionFilter>> {
        let filters = self.resolve_filters()?;

        validate_partition_filters(&filters).context("failed to validate partition filters")?;

        Ok(filters)
    }

    /// After-digest wins over a partition list; with neither, every
    /// partition is selected.
    fn resolve_filters(&self) -> Result<Vec<PartitionFilter>> {
        let namespace = &self.common.namespace;

        if !self.after_digest.is_empty() {
            let filter = filter_after_digest(namespace, &self.after_digest)
                .context("failed to parse after digest filter")?;
            return Ok(vec![filter]);
        }

        if !self.partition_list.is_empty() {
            return parse_partition_range_list(namespace, &self.partition_list)
                .context("failed to parse partition filter list");
        }

        Ok(vec![filter_all()])
    }

    fn validate_single_filter(&self) -> Result<(), ValidationError> {
        let set: Vec<&'static str> = [
            ("after-digest", &self.after_digest),
            ("partition-list", &self.partition_list),
            ("node-list", &self.node_list),
            ("rack-list", &self.rack_list),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, _)| name)
        .collect();

        if set.len() > 1 {
            return Err(ValidationError::MultipleFilters(set));
        }

        Ok(())
    }

    fn has_estimate_incompatible_filter(&self) -> bool {
        [
            &self.partition_list,
            &self.node_list,
            &self.after_digest,
            &self.rack_list,
            &self.filter_expression,
            &self.modified_after,
            &self.modified_before,
        ]
        .iter()
        .any(|value| !value.is_empty())
            || self.no_ttl_only
    }
}

impl Validate for Backup {
    fn validate(&self) -> Result<(), ValidationError> {
        let directory = &self.common.directory;

        if !self.estimate && self.output_file.is_empty() && directory.is_empty() {
            return Err(ValidationError::MissingOutputTarget);
        }

        if !directory.is_empty() && !self.output_file.is_empty() {
            return Err(ValidationError::OutputFileWithDirectory);
        }

        validate_file_prefix(&self.output_file_prefix).map_err(ValidationError::FilePrefix)?;

        if !self.output_file.is_empty() && !self.output_file_prefix.is_empty() {
            return Err(ValidationError::FilePrefixWithOutputFile);
        }

        self.validate_single_filter()?;

        if !self.continue_from.is_empty() && !self.state_file_dst.is_empty() {
            return Err(ValidationError::ContinueWithStateFileDst);
        }

        if !self.continue_from.is_empty() && self.remove_files {
            return Err(ValidationError::ContinueWithRemoveFiles);
        }

        if self.max_records != 0 && self.common.parallel != 1 {
            return Err(ValidationError::MaxRecordsWithParallel);
        }

        if self.estimate {
            if self.has_estimate_incompatible_filter() {
                return Err(ValidationError::EstimateWithFilter);
            }

            if !self.output_file.is_empty() || !directory.is_empty() {
                return Err(ValidationError::EstimateWithOutput);
            }

            if self.estimate_samples < 0 {
                return Err(ValidationError::NegativeEstimateSamples);
            }
        }

        self.common.validate()
    }
}

/// Check that `prefix` can be used at the start of a file name on any
/// platform.  Empty prefixes are fine.
pub fn validate_file_prefix(prefix: &str) -> Result<(), ParseError> {
    for (pos, ch) in prefix.char_indices() {
        if PREFIX_FORBIDDEN.contains(ch) {
            return Err(ParseError::PrefixChar {
                ch,
                pos,
                prefix: prefix.to_string(),
            });
        }

        if (ch as u32) < 32 {
            return Err(ParseError::PrefixControl {
                code: ch as u32,
                pos,
                prefix: prefix.to_string(),
            });
        }

        if ch as u32 == 127 {
            return Err(ParseError::PrefixDel {
                pos,
                prefix: prefix.to_string(),
            });
        }
    }

    if prefix.trim() != prefix {
        return Err(ParseError::PrefixWhitespace(prefix.to_string()));
    }

    Ok(())
}

fn optional_time(value: &str) -> Result<Option<DateTime<Utc>>, ParseError> {
    if value.is_empty() {
        return Ok(None);
    }

    parse_local_time_to_utc(value).map(Some)
}
