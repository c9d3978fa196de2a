//! Change-feed (XDR) backup options.

use std::time::Duration;

use super::Validate;
use crate::{
    engine::{InfoPolicy, RetryPolicy},
    error::ValidationError,
};

/// Rewind value meaning "replay the whole change feed".
pub const REWIND_ALL: &str = "all";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BackupXdr {
    pub namespace: String,
    pub directory: String,
    /// MiB per output file.
    pub file_limit: u64,
    pub remove_files: bool,
    /// 0 means one writer per CPU.
    pub parallel_write: usize,

    /// Name of the datacenter the cluster ships changes to.
    pub dc: String,
    pub local_address: String,
    pub local_port: u16,
    /// `all`, or a number of seconds.
    pub rewind: String,
    pub max_throughput: u32,
    pub forward: bool,

    /// Milliseconds.
    pub read_timeout: u64,
    /// Milliseconds.
    pub write_timeout: u64,
    /// Milliseconds.
    pub info_polling_period: u64,
    /// Milliseconds.
    pub start_timeout: u64,
    pub results_queue_size: usize,
    pub ack_queue_size: usize,
    pub max_connections: usize,

    /// Milliseconds.
    pub info_timeout: u64,
    pub info_max_retries: u32,
    pub info_retries_multiplier: f64,
    /// Milliseconds.
    pub info_retry_interval: u64,

    /// Only stop a change feed left running by an earlier backup.
    pub stop_xdr: bool,
    /// Only unblock multi-record transaction writes left blocked by an earlier
    /// backup.
    pub unblock_mrt: bool,
}

impl BackupXdr {
    pub fn info_policy(&self) -> InfoPolicy {
        InfoPolicy {
            timeout: Duration::from_millis(self.info_timeout),
        }
    }

    pub fn info_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_timeout: Duration::from_millis(self.info_retry_interval),
            multiplier: self.info_retries_multiplier,
            max_retries: self.info_max_retries,
        }
    }

    /// Maintenance runs (stop-xdr, unblock-mrt) don't write any files.
    fn writes_files(&self) -> bool {
        !self.stop_xdr && !self.unblock_mrt
    }
}

impl Validate for BackupXdr {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.namespace.is_empty() {
            return Err(ValidationError::Required("namespace"));
        }

        if self.stop_xdr && self.unblock_mrt {
            return Err(ValidationError::Exclusive("stop-xdr", "unblock-mrt"));
        }

        if self.writes_files() && self.directory.is_empty() {
            return Err(ValidationError::Required("directory"));
        }

        if self.dc.is_empty() {
            return Err(ValidationError::Required("dc"));
        }

        if self.local_address.is_empty() {
            return Err(ValidationError::Required("local address"));
        }

        if !is_valid_rewind(&self.rewind) {
            return Err(ValidationError::Unsupported {
                kind: "rewind value",
                value: self.rewind.clone(),
            });
        }

        if self.max_connections < 1 {
            return Err(ValidationError::TooSmall {
                field: "max connections",
                min: 1,
            });
        }

        Ok(())
    }
}

fn is_valid_rewind(rewind: &str) -> bool {
    rewind == REWIND_ALL || rewind.parse::<u64>().is_ok_and(|seconds| seconds > 0)
}
