//! `backupctl backup` flags.

use clap::Args;

use super::{
    cluster::ClusterArgs,
    policy::{CompressionArgs, EncryptionArgs, SecretAgentArgs},
    storage::{StorageArgs, UploadArgs},
};
use crate::partial::{PartialBackup, PartialConfig, PartialXdr};

#[derive(Args, Debug, Default)]
pub struct BackupArgs {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    #[command(flatten)]
    pub scan: ScanArgs,

    #[command(flatten)]
    pub xdr: XdrArgs,

    #[command(flatten)]
    pub compression: CompressionArgs,

    #[command(flatten)]
    pub encryption: EncryptionArgs,

    #[command(flatten)]
    pub secret_agent: SecretAgentArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub upload: UploadArgs,
}

impl BackupArgs {
    /// Everything passed on the command line, shaped like the config file.
    pub fn to_partial(&self) -> PartialConfig {
        let mut cfg = PartialConfig {
            cluster: Some(self.cluster.to_partial()),
            backup: Some(self.scan.to_partial()),
            xdr: self.xdr.to_partial(),
            compression: Some(self.compression.to_partial()),
            encryption: Some(self.encryption.to_partial()),
            secret_agent: Some(self.secret_agent.to_partial()),
            ..PartialConfig::default()
        };
        self.storage.apply(&mut cfg);
        self.upload.apply(&mut cfg);
        cfg
    }
}

/// Options of a scan backup.  The namespace, directory, file limit,
/// remove-files and info options also apply to change-feed backups.
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Backup")]
pub struct ScanArgs {
    /// Target directory; one or more files are written into it.
    #[arg(short, long)]
    pub directory: Option<String>,

    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Comma-separated set names.
    #[arg(short, long)]
    pub set_list: Option<String>,

    /// Comma-separated bin names.
    #[arg(short = 'B', long)]
    pub bin_list: Option<String>,

    /// Read and write workers.
    #[arg(short = 'w', long)]
    pub parallel: Option<usize>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub no_records: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub no_indexes: Option<bool>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub no_udfs: Option<bool>,

    /// Records per second cap; 0 is unlimited.
    #[arg(short = 'L', long)]
    pub records_per_second: Option<u32>,

    /// Bandwidth cap in MiB/s; 0 is unlimited.
    #[arg(short = 'N', long = "nice")]
    pub bandwidth: Option<u64>,

    /// Milliseconds; 0 is no timeout.
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

    /// Buffer in MiB when writing to stdout.
    #[arg(long)]
    pub std_buffer_size: Option<usize>,

    /// Single output file; `-` is stdout.
    #[arg(short, long)]
    pub output_file: Option<String>,

    /// Prefix for file names written into the directory.
    #[arg(long)]
    pub output_file_prefix: Option<String>,

    /// Empty the directory before writing.
    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub remove_files: Option<bool>,

    /// Remove backup artifacts from the directory and exit.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub remove_artifacts: Option<bool>,

    /// MiB per output file; 0 is unlimited.
    #[arg(short = 'F', long)]
    pub file_limit: Option<u64>,

    #[arg(
        short = 'C',
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub compact: Option<bool>,

    /// Back up keys and metadata only.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub no_bins: Option<bool>,

    /// Only records without a TTL.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub no_ttl_only: Option<bool>,

    /// `YYYY-MM-DD_HH:MM:SS`, `YYYY-MM-DD` or `HH:MM:SS`, local time.
    #[arg(short = 'b', long)]
    pub modified_before: Option<String>,

    /// `YYYY-MM-DD_HH:MM:SS`, `YYYY-MM-DD` or `HH:MM:SS`, local time.
    #[arg(short = 'a', long)]
    pub modified_after: Option<String>,

    /// Resume after this base64 digest.
    #[arg(short = 'D', long)]
    pub after_digest: Option<String>,

    /// Comma-separated `N`, `N-COUNT` or base64 digests.
    #[arg(short = 'X', long)]
    pub partition_list: Option<String>,

    /// Comma-separated `host:port` entries.
    #[arg(short = 'l', long)]
    pub node_list: Option<String>,

    /// Comma-separated rack ids.
    #[arg(long)]
    pub rack_list: Option<String>,

    /// Comma-separated rack ids to read from first.
    #[arg(long)]
    pub prefer_racks: Option<String>,

    /// Base64-encoded filter expression.
    #[arg(short = 'f', long = "filter-exp")]
    pub filter_expression: Option<String>,

    /// Approximate record cap.  Requires `--parallel 1`.
    #[arg(short = 'M', long)]
    pub max_records: Option<i64>,

    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Milliseconds.
    #[arg(long)]
    pub sleep_between_retries: Option<u64>,

    #[arg(long)]
    pub scan_page_size: Option<i64>,

    /// Estimate the backup size instead of writing it.
    #[arg(
        short,
        long,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub estimate: Option<bool>,

    #[arg(long)]
    pub estimate_samples: Option<i64>,

    /// Resume from this state file in the directory.
    #[arg(long = "continue")]
    pub continue_from: Option<String>,

    /// Save progress to this state file in the directory.
    #[arg(long)]
    pub state_file_dst: Option<String>,
}

impl ScanArgs {
    pub fn to_partial(&self) -> PartialBackup {
        PartialBackup {
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
            output_file: self.output_file.clone(),
            output_file_prefix: self.output_file_prefix.clone(),
            remove_files: self.remove_files,
            remove_artifacts: self.remove_artifacts,
            file_limit: self.file_limit,
            compact: self.compact,
            no_bins: self.no_bins,
            no_ttl_only: self.no_ttl_only,
            modified_before: self.modified_before.clone(),
            modified_after: self.modified_after.clone(),
            after_digest: self.after_digest.clone(),
            partition_list: self.partition_list.clone(),
            node_list: self.node_list.clone(),
            rack_list: self.rack_list.clone(),
            prefer_racks: self.prefer_racks.clone(),
            filter_expression: self.filter_expression.clone(),
            max_records: self.max_records,
            max_retries: self.max_retries,
            sleep_between_retries: self.sleep_between_retries,
            scan_page_size: self.scan_page_size,
            estimate: self.estimate,
            estimate_samples: self.estimate_samples,
            continue_from: self.continue_from.clone(),
            state_file_dst: self.state_file_dst.clone(),
        }
    }
}

/// Change-feed backup options.
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "XDR backup")]
pub struct XdrArgs {
    /// Back up from the change feed instead of scanning.  Implied by any
    /// other flag in this group.
    #[arg(long)]
    pub xdr: bool,

    /// Data center name registered with the cluster.
    #[arg(long)]
    pub dc: Option<String>,

    /// Address the change feed connects back to.
    #[arg(long)]
    pub local_address: Option<String>,

    #[arg(long)]
    pub local_port: Option<u16>,

    /// `all`, or seconds to rewind.
    #[arg(long)]
    pub rewind: Option<String>,

    /// Records per second shipped by the cluster.
    #[arg(long)]
    pub max_throughput: Option<u32>,

    /// File writers; 0 uses one per CPU.
    #[arg(long)]
    pub parallel_write: Option<usize>,

    /// Milliseconds.
    #[arg(long)]
    pub read_timeout: Option<u64>,

    /// Milliseconds.
    #[arg(long)]
    pub write_timeout: Option<u64>,

    #[arg(long)]
    pub results_queue_size: Option<usize>,

    #[arg(long)]
    pub ack_queue_size: Option<usize>,

    #[arg(long)]
    pub max_connections: Option<usize>,

    /// Milliseconds between change feed status polls.
    #[arg(long = "info-poling-period")]
    pub info_polling_period: Option<u64>,

    /// Milliseconds to wait for the change feed to start.
    #[arg(long)]
    pub start_timeout: Option<u64>,

    /// Stop the change feed and exit.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub stop_xdr: Option<bool>,

    /// Unblock transaction writes and exit.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub unblock_mrt: Option<bool>,

    /// Forward changes to other data centers as well.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub forward: Option<bool>,
}

impl XdrArgs {
    /// `None` unless a change-feed backup was asked for.
    pub fn to_partial(&self) -> Option<PartialXdr> {
        let partial = PartialXdr {
            dc: self.dc.clone(),
            local_address: self.local_address.clone(),
            local_port: self.local_port,
            rewind: self.rewind.clone(),
            max_throughput: self.max_throughput,
            parallel_write: self.parallel_write,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
            results_queue_size: self.results_queue_size,
            ack_queue_size: self.ack_queue_size,
            max_connections: self.max_connections,
            info_polling_period: self.info_polling_period,
            start_timeout: self.start_timeout,
            stop_xdr: self.stop_xdr,
            unblock_mrt: self.unblock_mrt,
            forward: self.forward,
            ..PartialXdr::default()
        };

        (self.xdr || partial != PartialXdr::default()).then_some(partial)
    }
}
