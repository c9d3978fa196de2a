//! `restore:` section.

use crate::models::Restore;

partial_group! {
    pub struct PartialRestore => Restore {
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

        input_file: String => input_file,
        #[serde(default, deserialize_with = "crate::partial::comma_list")]
        directory_list: String => directory_list,
        parent_directory: String => parent_directory,
        mode: String => mode,
        disable_batch_writes: bool => disable_batch_writes,
        batch_size: usize => batch_size,
        max_async_batches: usize => max_async_batches,
        warm_up: i64 => warm_up,
        extra_ttl: i64 => extra_ttl,
        ignore_record_error: bool => ignore_record_error,
        unique: bool => unique,
        replace: bool => replace,
        no_generation: bool => no_generation,
        retry_base_interval: u64 => retry_base_interval,
        retry_multiplier: f64 => retry_multiplier,
        retry_max_attempts: u32 => retry_max_attempts,
        validate_only: bool => validate_only,
        apply_metadata_last: bool => apply_metadata_last,
    }
}
