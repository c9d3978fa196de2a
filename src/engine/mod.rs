//! Configuration types understood by the backup engine.
//!
//! The engine is an external program (see [`process`]); these structs are the
//! contract between this front-end and it.  They are populated field by field
//! by the assemblers in [`crate::config`] and serialised as JSON on hand-off,
//! so every type here derives `Serialize`.
//!
//! Units follow the engine, not the command line: sizes are bytes, rates are
//! bytes per second and timeouts are [`Duration`]s.

pub mod filter;
pub mod process;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use filter::{
    MAX_PARTITIONS,
    PartitionFilter,
    filter_after_digest,
    filter_all,
    parse_partition_range_list,
};

// ─── Cluster ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlsConfig {
    pub name: Option<String>,
    pub ca_file: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub key_file_password: Option<String>,
    pub protocols: Option<String>,
}

/// How the engine connects to the database cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub auth_mode: Option<String>,
    pub tls: Option<TlsConfig>,
    pub timeout: Duration,
    pub idle_timeout: Duration,
    pub login_timeout: Duration,
}

// ─── Policies ─────────────────────────────────────────────────────────────────

/// Timeout applied to cluster info requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InfoPolicy {
    pub timeout: Duration,
}

/// Exponential back-off the engine applies to failed info requests or writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetryPolicy {
    pub base_timeout: Duration,
    pub multiplier: f64,
    pub max_retries: u32,
}

/// Which replica a scan reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReplicaPolicy {
    #[default]
    Sequence,
    PreferRack,
    Master,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanPolicy {
    pub max_records: i64,
    pub max_retries: u32,
    pub sleep_between_retries: Duration,
    pub total_timeout: Duration,
    pub socket_timeout: Duration,
    pub replica_policy: ReplicaPolicy,
    pub include_bin_data: bool,
    /// Decoded filter expression bytes.
    pub filter_expression: Option<Vec<u8>>,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self {
            max_records: 0,
            max_retries: 5,
            sleep_between_retries: Duration::from_millis(500),
            total_timeout: Duration::ZERO,
            socket_timeout: Duration::from_secs(30),
            replica_policy: ReplicaPolicy::Sequence,
            include_bin_data: true,
            filter_expression: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordExistsAction {
    Update,
    Replace,
    CreateOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationPolicy {
    None,
    ExpectGenGt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WritePolicy {
    pub send_key: bool,
    pub total_timeout: Duration,
    pub socket_timeout: Duration,
    pub record_exists_action: RecordExistsAction,
    pub generation_policy: GenerationPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionPolicy {
    pub mode: String,
    pub level: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncryptionPolicy {
    pub mode: String,
    pub key_file: Option<String>,
    pub key_env: Option<String>,
    pub key_secret: Option<String>,
}

/// Connection details for the secret agent.  Only fields that were set are
/// forwarded; the engine applies its own defaults to the rest.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SecretAgentConfig {
    pub connection_type: Option<String>,
    pub address: String,
    pub port: Option<u16>,
    pub timeout_ms: Option<u64>,
    pub ca_file: Option<String>,
    pub tls_name: Option<String>,
    pub cert_file: Option<String>,
    pub key_file: Option<String>,
    pub is_base64: bool,
}

// ─── Scan backup ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupConfig {
    pub namespace: String,
    pub set_list: Vec<String>,
    pub bin_list: Vec<String>,
    pub node_list: Vec<String>,
    pub rack_list: Vec<u32>,
    pub partition_filters: Vec<PartitionFilter>,
    pub scan_policy: ScanPolicy,
    pub info_policy: InfoPolicy,
    pub info_retry_policy: RetryPolicy,
    pub compression_policy: Option<CompressionPolicy>,
    pub encryption_policy: Option<EncryptionPolicy>,
    pub secret_agent_config: Option<SecretAgentConfig>,
    pub mod_before: Option<DateTime<Utc>>,
    pub mod_after: Option<DateTime<Utc>>,
    pub parallel_read: usize,
    pub parallel_write: usize,
    pub records_per_second: u32,
    /// Bytes per second; 0 means unlimited.
    pub bandwidth: u64,
    /// Bytes per output file; 0 means unlimited.
    pub file_limit: u64,
    pub no_records: bool,
    pub no_indexes: bool,
    pub no_udfs: bool,
    pub compact: bool,
    pub no_ttl_only: bool,
    pub output_file_prefix: String,
    pub state_file: Option<String>,
    #[serde(rename = "continue")]
    pub continue_: bool,
    pub page_size: i64,
    pub metrics_enabled: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            namespace: String::new(),
            set_list: Vec::new(),
            bin_list: Vec::new(),
            node_list: Vec::new(),
            rack_list: Vec::new(),
            partition_filters: vec![filter_all()],
            scan_policy: ScanPolicy::default(),
            info_policy: InfoPolicy {
                timeout: Duration::from_secs(10),
            },
            info_retry_policy: RetryPolicy {
                base_timeout: Duration::from_secs(1),
                multiplier: 1.0,
                max_retries: 3,
            },
            compression_policy: None,
            encryption_policy: None,
            secret_agent_config: None,
            mod_before: None,
            mod_after: None,
            parallel_read: 1,
            parallel_write: 1,
            records_per_second: 0,
            bandwidth: 0,
            file_limit: 0,
            no_records: false,
            no_indexes: false,
            no_udfs: false,
            compact: false,
            no_ttl_only: false,
            output_file_prefix: String::new(),
            state_file: None,
            continue_: false,
            page_size: 0,
            metrics_enabled: false,
        }
    }
}

// ─── XDR backup ───────────────────────────────────────────────────────────────

/// Record encoding written by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EncoderType {
    Asb,
    Xdr,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupXdrConfig {
    pub namespace: String,
    pub dc: String,
    pub local_address: String,
    pub local_port: u16,
    pub rewind: String,
    pub encoder: EncoderType,
    pub compression_policy: Option<CompressionPolicy>,
    pub encryption_policy: Option<EncryptionPolicy>,
    pub secret_agent_config: Option<SecretAgentConfig>,
    pub info_policy: InfoPolicy,
    pub info_retry_policy: RetryPolicy,
    /// Bytes per output file; 0 means unlimited.
    pub file_limit: u64,
    pub parallel_write: usize,
    pub max_throughput: u32,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub info_polling_period: Duration,
    pub start_timeout: Duration,
    pub result_queue_size: usize,
    pub ack_queue_size: usize,
    pub max_connections: usize,
    pub forward: bool,
    pub metrics_enabled: bool,
}

// ─── Restore ──────────────────────────────────────────────────────────────────

/// Source and destination namespace of a restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RestoreNamespace {
    pub source: String,
    pub destination: String,
}

/// Backup file format the engine should expect when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RestoreMode {
    Auto,
    Asb,
    Asbx,
}

impl RestoreMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Asb => "asb",
            Self::Asbx => "asbx",
        }
    }

    /// Tokens are matched exactly (lowercase).
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "auto" => Some(Self::Auto),
            "asb" => Some(Self::Asb),
            "asbx" => Some(Self::Asbx),
            _ => None,
        }
    }
}

/// Where restore reads backup files from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RestoreSource {
    File(String),
    Directory(String),
    DirectoryList(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestoreConfig {
    pub namespace: Option<RestoreNamespace>,
    pub source: Option<RestoreSource>,
    pub mode: RestoreMode,
    pub set_list: Vec<String>,
    pub bin_list: Vec<String>,
    pub write_policy: WritePolicy,
    pub info_policy: InfoPolicy,
    pub info_retry_policy: RetryPolicy,
    pub write_retry_policy: RetryPolicy,
    pub compression_policy: Option<CompressionPolicy>,
    pub encryption_policy: Option<EncryptionPolicy>,
    pub secret_agent_config: Option<SecretAgentConfig>,
    pub parallel: usize,
    pub records_per_second: u32,
    /// Bytes per second; 0 means unlimited.
    pub bandwidth: u64,
    pub extra_ttl: i64,
    pub no_records: bool,
    pub no_indexes: bool,
    pub no_udfs: bool,
    pub disable_batch_writes: bool,
    pub batch_size: usize,
    pub max_async_batches: usize,
    pub warm_up: usize,
    pub ignore_record_errors: bool,
    pub validate_only: bool,
    pub apply_metadata_last: bool,
    pub metrics_enabled: bool,
}
