//! `backupctl restore` flags.

use clap::Args;

use super::{
    cluster::ClusterArgs,
    policy::{CompressionArgs, EncryptionArgs, SecretAgentArgs},
    storage::{DownloadArgs, StorageArgs},
};
use crate::partial::{PartialConfig, PartialRestore};

#[derive(Args, Debug, Default)]
pub struct RestoreArgs {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(flatten)]
    pub restore: RestoreOptionArgs,

    #[command(flatten)]
    pub compression: CompressionArgs,

    #[command(flatten)]
    pub encryption: EncryptionArgs,

    #[command(flatten)]
    pub secret_agent: SecretAgentArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub download: DownloadArgs,
}

impl RestoreArgs {
    pub fn to_partial(&self) -> PartialConfig {
        let mut cfg = PartialConfig {
            cluster: Some(self.cluster.to_partial()),
            restore: Some(self.restore.to_partial()),
            compression: Some(self.compression.to_partial()),
            encryption: Some(self.encryption.to_partial()),
            secret_agent: Some(self.secret_agent.to_partial()),
            ..PartialConfig::default()
        };
        self.storage.apply(&mut cfg);
        self.download.apply(&mut cfg);
        cfg
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Restore")]
pub struct RestoreOptionArgs {
    /// Directory holding the backup files.
    #[arg(short, long)]
    pub directory: Option<String>,

    /// `ns` or `source,destination`.
    #[arg(short, long)]
    pub namespace: Option<String>,

    #[arg(short, long)]
    pub set_list: Option<String>,

    #[arg(short = 'B', long)]
    pub bin_list: Option<String>,

    /// Restore workers.
    #[arg(short = 'w', long)]
    pub parallel: Option<usize>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub no_records: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub no_indexes: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub no_udfs: Option<bool>,

    #[arg(short = 'L', long)]
    pub records_per_second: Option<u32>,

    /// Bandwidth cap in MiB/s; 0 is unlimited.
    #[arg(short = 'N', long = "nice")]
    pub bandwidth: Option<u64>,

    /// Milliseconds.
    #[arg(short = 'T', long)]
    pub total_timeout: Option<u64>,

    /// Milliseconds.
    #[arg(long)]
    pub socket_timeout: Option<u64>,

    /// Milliseconds.
    #[arg(long)]
    pub info_timeout: Option<u64>,

    #[arg(long)]
    pub info_max_retries: Option<u32>,

    #[arg(long)]
    pub info_retries_multiplier: Option<f64>,

    /// Milliseconds.
    #[arg(long)]
    pub info_retry_interval: Option<u64>,

    /// Buffer in MiB when reading from stdin.
    #[arg(long)]
    pub std_buffer_size: Option<usize>,

    /// Single backup file; `-` is stdin.
    #[arg(short, long)]
    pub input_file: Option<String>,

    /// Comma-separated backup directories, restored in order.
    #[arg(long)]
    pub directory_list: Option<String>,

    /// Directory the `--directory-list` entries are relative to.
    #[arg(long)]
    pub parent_directory: Option<String>,

    /// auto, asb or asbx.
    #[arg(short, long)]
    pub mode: Option<String>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub disable_batch_writes: Option<bool>,

    #[arg(long)]
    pub batch_size: Option<usize>,

    #[arg(long)]
    pub max_async_batches: Option<usize>,

    /// Records written one at a time before batching starts.
    #[arg(long)]
    pub warm_up: Option<i64>,

    /// Seconds added to every record's TTL.
    #[arg(long)]
    pub extra_ttl: Option<i64>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub ignore_record_error: Option<bool>,

    /// Never overwrite existing records.
    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub unique: Option<bool>,

    /// Replace existing records instead of updating them.
    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub replace: Option<bool>,

    /// Overwrite regardless of generation.
    #[arg(
        short = 'g',
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub no_generation: Option<bool>,

    /// Milliseconds.
    #[arg(long)]
    pub retry_base_interval: Option<u64>,

    #[arg(long)]
    pub retry_multiplier: Option<f64>,

    #[arg(long)]
    pub retry_max_attempts: Option<u32>,

    /// Read and check the backup files without writing anything.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub validate_only: Option<bool>,

    /// Restore indexes and UDFs after the records.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub apply_metadata_last: Option<bool>,
}

impl RestoreOptionArgs {
    pub fn to_partial(&self) -> PartialRestore {
        PartialRestore {
            directory: self.directory.clone(),
            namespace: self.namespace.clone(),
            set_list: self.set_list.clone(),
            bin_list: self.bin_list.clone(),
            parallel: self.parallel,
            no_records: self.no_records,
            no_indexes: self.no_indexes,
            no_udfs: self.no_udfs,
            records_per_second: self.records_per_second,
            bandwidth: self.bandwidth,
            total_timeout: self.total_timeout,
            socket_timeout: self.socket_timeout,
            info_timeout: self.info_timeout,
            info_max_retries: self.info_max_retries,
            info_retries_multiplier: self.info_retries_multiplier,
            info_retry_interval: self.info_retry_interval,
            std_buffer_size: self.std_buffer_size,
            input_file: self.input_file.clone(),
            directory_list: self.directory_list.clone(),
            parent_directory: self.parent_directory.clone(),
            mode: self.mode.clone(),
            disable_batch_writes: self.disable_batch_writes,
            batch_size: self.batch_size,
            max_async_batches: self.max_async_batches,
            warm_up: self.warm_up,
            extra_ttl: self.extra_ttl,
            ignore_record_error: self.ignore_record_error,
            unique: self.unique,
            replace: self.replace,
            no_generation: self.no_generation,
            retry_base_interval: self.retry_base_interval,
            retry_multiplier: self.retry_multiplier,
            retry_max_attempts: self.retry_max_attempts,
            validate_only: self.validate_only,
            apply_metadata_last: self.apply_metadata_last,
        }
    }
}
