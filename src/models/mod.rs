//! Option model: one typed struct per configuration concern.
//!
//! These are plain data plus per-group validation.  They are produced by the
//! merge step in [`crate::partial`] and consumed by the assemblers in
//! [`crate::config`]; nothing in here touches the filesystem, the network or
//! the command line.
//!
//! | Module            | Group(s)                                        |
//! |-------------------|-------------------------------------------------|
//! | [`common`]        | `Common`, shared by backup, xdr and restore    |
//! | [`backup`]        | `Backup` (scan backup)                          |
//! | [`xdr`]           | `BackupXdr` (change-feed backup)                |
//! | [`restore`]       | `Restore`                                       |
//! | [`cluster`]       | `App`, `Cluster`                                |
//! | [`policy`]        | `Compression`, `Encryption`                     |
//! | [`secret_agent`]  | `SecretAgent`                                   |
//! | [`storage`]       | `Local`, `AwsS3`, `GcpStorage`, `AzureBlob`     |
//! | [`partition`]     | partition filter overlap checks                 |
//! | [`time`]          | modified-before/after literal parsing           |

pub mod backup;
pub mod cluster;
pub mod common;
pub mod partition;
pub mod policy;
pub mod restore;
pub mod secret_agent;
pub mod storage;
pub mod time;
pub mod xdr;

pub use backup::Backup;
pub use cluster::{App, Cluster};
pub use common::Common;
pub use policy::{Compression, Encryption};
pub use restore::{Restore, RestoreMode};
pub use secret_agent::SecretAgent;
pub use storage::{AwsS3, AzureBlob, GcpStorage, Local, StorageCommon};
pub use xdr::BackupXdr;

use crate::error::ValidationError;

/// Highest rack id a cluster can have.
pub const MAX_RACK: i64 = 1_000_000;

/// Output file name that means "write to stdout".
pub const STDOUT_PLACEHOLDER: &str = "-";

/// Per-group validation.
///
/// An absent group (`None`) is vacuously valid, so callers can validate every
/// optional group without checking presence first.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl<T: Validate> Validate for Option<T> {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Some(group) => group.validate(),
            None => Ok(()),
        }
    }
}

/// Split a comma-separated option value.  An empty input yields an empty list.
pub fn split_by_comma(s: &str) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }

    s.split(',').map(str::to_string).collect()
}
