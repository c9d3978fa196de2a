//! `backup:` and `xdr:` sections.

use crate::models::{Backup, BackupXdr};

partial_group! {
    /// Scan backup options, including the shared `Common` ones.
    pub struct PartialBackup => Backup {
        directory: String => common.directory,
        namespace: String => common.namespace,
        #[serde(default, deserialize_with = "crate::partial::comma_list")]
        set_list: String => common.set_list,
        #[serde(default, deserialize_with = "crate::partial::comma_list")]
        bin_list: String => common.bin_list,
        parallel: usize => common.parallel,
        no_records: bool => common.no_records,
        no_indexes: bool => common.no_indexes,
        no_udfs: bool => common.no_udfs,
        records_per_second: u32 => common.records_per_second,
        bandwidth: u64 => common.bandwidth,
        total_timeout: u64 => common.total_timeout,
        socket_timeout: u64 => common.socket_timeout,
        info_timeout: u64 => common.info_timeout,
        info_max_retries: u32 => common.info_max_retries,
        info_retries_multiplier: f64 => common.info_retries_multiplier,
        info_retry_interval: u64 => common.info_retry_interval,
        std_buffer_size: usize => common.std_buffer_size,

        output_file: String => output_file,
        output_file_prefix: String => output_file_prefix,
        remove_files: bool => remove_files,
        remove_artifacts: bool => remove_artifacts,
        file_limit: u64 => file_limit,
        compact: bool => compact,
        no_bins: bool => no_bins,
        no_ttl_only: bool => no_ttl_only,
        modified_before: String => modified_before,
        modified_after: String => modified_after,
        after_digest: String => after_digest,
        partition_list: String => partition_list,
        #[serde(default, deserialize_with = "crate::partial::comma_list")]
        node_list: String => node_list,
        #[serde(default, deserialize_with = "crate::partial::comma_list")]
        rack_list: String => rack_list,
        #[serde(default, deserialize_with = "crate::partial::comma_list")]
        prefer_racks: String => prefer_racks,
        filter_expression: String => filter_expression,
        max_records: i64 => max_records,
        max_retries: u32 => max_retries,
        sleep_between_retries: u64 => sleep_between_retries,
        scan_page_size: i64 => scan_page_size,
        estimate: bool => estimate,
        estimate_samples: i64 => estimate_samples,
        #[serde(rename = "continue")]
        continue_from: String => continue_from,
        state_file_dst: String => state_file_dst,
    }
}

impl PartialBackup {
    /// Names of the scan-only options that are set, in declaration order.
    /// None of them mean anything to a change-feed backup.
    pub fn scan_only_options(&self) -> Vec<&'static str> {
        [
            ("output-file", self.output_file.is_some()),
            ("output-file-prefix", self.output_file_prefix.is_some()),
            ("after-digest", self.after_digest.is_some()),
            ("partition-list", self.partition_list.is_some()),
            ("node-list", self.node_list.is_some()),
            ("rack-list", self.rack_list.is_some()),
            ("prefer-racks", self.prefer_racks.is_some()),
            ("filter-exp", self.filter_expression.is_some()),
            ("modified-before", self.modified_before.is_some()),
            ("modified-after", self.modified_after.is_some()),
            ("no-ttl-only", self.no_ttl_only.is_some()),
            ("max-records", self.max_records.is_some()),
            ("estimate", self.estimate == Some(true)),
            ("continue", self.continue_from.is_some()),
            ("state-file-dst", self.state_file_dst.is_some()),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| name)
        .collect()
    }
}

partial_group! {
    /// Change-feed backup options.
    pub struct PartialXdr => BackupXdr {
        namespace: String => namespace,
        directory: String => directory,
        file_limit: u64 => file_limit,
        remove_files: bool => remove_files,
        parallel_write: usize => parallel_write,
        dc: String => dc,
        local_address: String => local_address,
        local_port: u16 => local_port,
        rewind: String => rewind,
        max_throughput: u32 => max_throughput,
        forward: bool => forward,
        read_timeout: u64 => read_timeout,
        write_timeout: u64 => write_timeout,
        info_polling_period: u64 => info_polling_period,
        start_timeout: u64 => start_timeout,
        results_queue_size: usize => results_queue_size,
        ack_queue_size: usize => ack_queue_size,
        max_connections: usize => max_connections,
        info_timeout: u64 => info_timeout,
        info_max_retries: u32 => info_max_retries,
        info_retries_multiplier: f64 => info_retries_multiplier,
        info_retry_interval: u64 => info_retry_interval,
        stop_xdr: bool => stop_xdr,
        unblock_mrt: bool => unblock_mrt,
    }
}

impl PartialXdr {
    /// Take the options a change-feed backup shares with a scan backup from
    /// `backup` wherever this group leaves them unset.
    pub fn inherit(self, backup: &PartialBackup) -> Self {
        Self {
            namespace: self.namespace.or_else(|| backup.namespace.clone()),
            directory: self.directory.or_else(|| backup.directory.clone()),
            file_limit: self.file_limit.or(backup.file_limit),
            remove_files: self.remove_files.or(backup.remove_files),
            info_timeout: self.info_timeout.or(backup.info_timeout),
            info_max_retries: self.info_max_retries.or(backup.info_max_retries),
            info_retries_multiplier: self
                .info_retries_multiplier
                .or(backup.info_retries_multiplier),
            info_retry_interval: self.info_retry_interval.or(backup.info_retry_interval),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{defaults::Defaults, partial::parse_str};

    #[test]
    fn merge_prefers_the_overlay() {
        let file = PartialBackup {
            namespace: Some("file-ns".into()),
            parallel: Some(4),
            ..PartialBackup::default()
        };
        let flags = PartialBackup {
            namespace: Some("flag-ns".into()),
            ..PartialBackup::default()
        };

        let merged = file.merge(flags);
        assert_eq!(merged.namespace.as_deref(), Some("flag-ns"));
        assert_eq!(merged.parallel, Some(4));
    }

    #[test]
    fn resolve_fills_from_defaults() {
        let defaults = Defaults::new();
        let backup = PartialBackup {
            namespace: Some("test".into()),
            file_limit: Some(50),
            ..PartialBackup::default()
        }
        .resolve(&defaults.backup);

        assert_eq!(backup.common.namespace, "test");
        assert_eq!(backup.file_limit, 50);
        assert_eq!(backup.common.parallel, defaults.backup.common.parallel);
        assert_eq!(backup.scan_page_size, defaults.backup.scan_page_size);
    }

    #[test]
    fn explicit_zero_overrides_default() {
        let defaults = Defaults::new();
        let backup = PartialBackup {
            file_limit: Some(0),
            ..PartialBackup::default()
        }
        .resolve(&defaults.backup);
        assert_eq!(backup.file_limit, 0);
    }

    #[test]
    fn yaml_keys_are_kebab_case() {
        let cfg = parse_str(
            "backup:\n  namespace: test\n  output-file: out.asb\n  continue: state\n  no-ttl-only: true\n",
        )
        .unwrap();
        let backup = cfg.backup.unwrap();
        assert_eq!(backup.output_file.as_deref(), Some("out.asb"));
        assert_eq!(backup.continue_from.as_deref(), Some("state"));
        assert_eq!(backup.no_ttl_only, Some(true));
    }

    #[test]
    fn scan_only_options_are_listed() {
        let backup = PartialBackup {
            namespace: Some("test".into()),
            partition_list: Some("0-10".into()),
            estimate: Some(true),
            ..PartialBackup::default()
        };
        insta::assert_debug_snapshot!(backup.scan_only_options(), @r#"
        [
            "partition-list",
            "estimate",
        ]
        "#);
    }

    #[test]
    fn estimate_false_is_not_scan_only() {
        let backup = PartialBackup {
            estimate: Some(false),
            ..PartialBackup::default()
        };
        assert!(backup.scan_only_options().is_empty());
    }

    #[test]
    fn xdr_inherits_shared_options() {
        let backup = PartialBackup {
            namespace: Some("test".into()),
            directory: Some("dir".into()),
            file_limit: Some(10),
            ..PartialBackup::default()
        };
        let xdr = PartialXdr {
            directory: Some("xdr-dir".into()),
            ..PartialXdr::default()
        }
        .inherit(&backup);

        assert_eq!(xdr.namespace.as_deref(), Some("test"));
        assert_eq!(xdr.directory.as_deref(), Some("xdr-dir"));
        assert_eq!(xdr.file_limit, Some(10));
    }
}
