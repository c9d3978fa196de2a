//! Merged service configuration and its assembly into engine configuration.
//!
//! | Module           | Responsibility                                       |
//! |------------------|------------------------------------------------------|
//! | [`loader`]       | File + flags + defaults → validated service config   |
//! | [`backup`]       | `BackupServiceConfig`, predicates, backup assembler  |
//! | [`restore`]      | `RestoreServiceConfig`, restore assembler            |
//! | [`validation`]   | Cross-group storage checks                           |

pub mod backup;
pub mod loader;
pub mod restore;
pub mod validation;

pub use backup::BackupServiceConfig;
pub use restore::RestoreServiceConfig;

/// Sizes and rates are given in MiB and handed to the engine in bytes.
pub const MIB: u64 = 1024 * 1024;
