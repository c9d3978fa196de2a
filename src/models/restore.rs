//! Restore options.

use std::{path::Path, time::Duration};

use super::{Common, Validate, split_by_comma};
pub use crate::engine::RestoreMode;
use crate::{
    engine::{
        GenerationPolicy,
        RecordExistsAction,
        RestoreNamespace,
        RestoreSource,
        RetryPolicy,
        WritePolicy,
    },
    error::ValidationError,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Restore {
    pub common: Common,

    pub input_file: String,
    /// Comma-separated.
    pub directory_list: String,
    /// Prepended to every `directory_list` entry.
    pub parent_directory: String,
    pub mode: String,

    pub disable_batch_writes: bool,
    pub batch_size: usize,
    pub max_async_batches: usize,
    /// Should be at least `max_async_batches` for batch writes to pay off.
    pub warm_up: i64,

    pub extra_ttl: i64,
    pub ignore_record_error: bool,
    /// Only create records that don't exist yet.
    pub unique: bool,
    /// Replace whole records instead of merging bins.
    pub replace: bool,
    /// Write regardless of record generation.
    pub no_generation: bool,

    /// Milliseconds.
    pub retry_base_interval: u64,
    pub retry_multiplier: f64,
    pub retry_max_attempts: u32,

    pub validate_only: bool,
    pub apply_metadata_last: bool,
}

impl Restore {
    /// Neither an input file nor a directory list was given, so the backup is
    /// read from `directory`.
    pub fn is_directory_restore(&self) -> bool {
        self.directory_list.is_empty() && self.input_file.is_empty()
    }

    pub fn sets(&self) -> Vec<String> {
        self.common.sets()
    }

    pub fn bins(&self) -> Vec<String> {
        self.common.bins()
    }

    /// `None` unless the namespace has one or two tokens.
    pub fn namespace_config(&self) -> Option<RestoreNamespace> {
        self.common
            .namespace_pair()
            .map(|(source, destination)| RestoreNamespace {
                source,
                destination,
            })
    }

    /// The parsed mode; [`RestoreMode::Auto`] for an unrecognised token, which
    /// validation rejects earlier.
    pub fn restore_mode(&self) -> RestoreMode {
        RestoreMode::parse(&self.mode).unwrap_or(RestoreMode::Auto)
    }

    pub fn source(&self) -> Option<RestoreSource> {
        if !self.input_file.is_empty() {
            return Some(RestoreSource::File(self.input_file.clone()));
        }

        if !self.directory_list.is_empty() {
            let parent = Path::new(&self.parent_directory);
            let dirs = split_by_comma(&self.directory_list)
                .into_iter()
                .map(|dir| parent.join(dir).to_string_lossy().into_owned())
                .collect();
            return Some(RestoreSource::DirectoryList(dirs));
        }

        if !self.common.directory.is_empty() {
            return Some(RestoreSource::Directory(self.common.directory.clone()));
        }

        None
    }

    pub fn write_policy(&self) -> WritePolicy {
        WritePolicy {
            send_key: true,
            total_timeout: Duration::from_millis(self.common.total_timeout),
            socket_timeout: Duration::from_millis(self.common.socket_timeout),
            record_exists_action: record_exists_action(self.replace, self.unique),
            generation_policy: if self.no_generation {
                GenerationPolicy::None
            } else {
                GenerationPolicy::ExpectGenGt
            },
        }
    }

    /// Back-off applied by the engine to failed writes.
    pub fn write_retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            base_timeout: Duration::from_millis(self.retry_base_interval),
            multiplier: self.retry_multiplier,
            max_retries: self.retry_max_attempts,
        }
    }
}

impl Validate for Restore {
    fn validate(&self) -> Result<(), ValidationError> {
        let directory = &self.common.directory;

        if RestoreMode::parse(&self.mode).is_none() {
            return Err(ValidationError::RestoreMode(self.mode.clone()));
        }

        if self.input_file.is_empty() && directory.is_empty() && self.directory_list.is_empty() {
            return Err(ValidationError::MissingRestoreInput);
        }

        if !directory.is_empty() && !self.input_file.is_empty() {
            return Err(ValidationError::DirectoryWithInputFile);
        }

        if !self.directory_list.is_empty() && (!directory.is_empty() || !self.input_file.is_empty())
        {
            return Err(ValidationError::DirectoryListConflict);
        }

        if !self.parent_directory.is_empty() && self.directory_list.is_empty() {
            return Err(ValidationError::ParentWithoutDirectoryList);
        }

        if self.warm_up < 0 {
            return Err(ValidationError::Negative("warm-up"));
        }

        // A validate-only run never connects, so connection-level options
        // don't matter.
        if !self.validate_only {
            self.common.validate()?;
        }

        Ok(())
    }
}

fn record_exists_action(replace: bool, unique: bool) -> RecordExistsAction {
    if replace {
        RecordExistsAction::Replace
    } else if unique {
        RecordExistsAction::CreateOnly
    } else {
        RecordExistsAction::Update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restore() -> Restore {
        Restore {
            common: Common {
                namespace: "test".into(),
                directory: "backup-dir".into(),
                parallel: 1,
                ..Common::default()
            },
            mode: "auto".into(),
            ..Restore::default()
        }
    }

    fn from_file() -> Restore {
        let mut r = restore();
        r.common.directory.clear();
        r.input_file = "backup.asb".into();
        r
    }

    fn err(r: &Restore) -> String {
        r.validate().unwrap_err().to_string()
    }

    // ── Validate ──────────────────────────────────────────────────────────────

    #[test]
    fn directory_restore_is_valid() {
        assert!(restore().validate().is_ok());
    }

    #[test]
    fn file_restore_is_valid() {
        assert!(from_file().validate().is_ok());
    }

    #[test]
    fn every_mode_token_is_accepted() {
        for mode in ["auto", "asb", "asbx"] {
            let r = Restore {
                mode: mode.into(),
                ..restore()
            };
            assert!(r.validate().is_ok(), "{mode}");
        }
    }

    #[test]
    fn invalid_mode() {
        let r = Restore {
            mode: "invalid".into(),
            ..restore()
        };
        assert_eq!(err(&r), "invalid restore mode: invalid");
    }

    #[test]
    fn input_required() {
        let mut r = restore();
        r.common.directory.clear();
        assert_eq!(err(&r), "input file or directory required");
    }

    #[test]
    fn directory_with_input_file() {
        let r = Restore {
            input_file: "backup.asb".into(),
            ..restore()
        };
        assert_eq!(
            err(&r),
            "only one of directory and input-file may be configured at the same time"
        );
    }

    #[test]
    fn directory_list_with_directory() {
        let r = Restore {
            directory_list: "dir1,dir2".into(),
            ..restore()
        };
        assert_eq!(
            err(&r),
            "only one of directory, input-file and directory-list may be configured at the same time"
        );
    }

    #[test]
    fn directory_list_with_input_file() {
        let r = Restore {
            directory_list: "dir1,dir2".into(),
            ..from_file()
        };
        assert_eq!(
            err(&r),
            "only one of directory, input-file and directory-list may be configured at the same time"
        );
    }

    #[test]
    fn parent_directory_requires_list() {
        let r = Restore {
            parent_directory: "parent".into(),
            ..restore()
        };
        assert_eq!(err(&r), "must specify directory-list list");
    }

    #[test]
    fn negative_warm_up() {
        let r = Restore {
            warm_up: -1,
            ..restore()
        };
        assert_eq!(err(&r), "warm-up must be non-negative");
    }

    #[test]
    fn validate_only_skips_common() {
        let mut r = Restore {
            validate_only: true,
            ..restore()
        };
        r.common.namespace.clear();
        assert!(r.validate().is_ok());

        r.validate_only = false;
        assert_eq!(err(&r), "namespace is required");
    }

    // ── Projections ───────────────────────────────────────────────────────────

    #[test]
    fn namespace_config_single_and_pair() {
        let r = restore();
        assert_eq!(
            r.namespace_config(),
            Some(RestoreNamespace {
                source: "test".into(),
                destination: "test".into(),
            })
        );

        let mut r = restore();
        r.common.namespace = "src,dst".into();
        let ns = r.namespace_config().unwrap();
        assert_eq!((ns.source.as_str(), ns.destination.as_str()), ("src", "dst"));

        r.common.namespace = "a,b,c".into();
        assert!(r.namespace_config().is_none());
    }

    #[test]
    fn write_policy_record_exists_priority() {
        let both = Restore {
            replace: true,
            unique: true,
            ..restore()
        };
        assert_eq!(
            both.write_policy().record_exists_action,
            RecordExistsAction::Replace
        );

        let unique = Restore {
            unique: true,
            ..restore()
        };
        assert_eq!(
            unique.write_policy().record_exists_action,
            RecordExistsAction::CreateOnly
        );

        assert_eq!(
            restore().write_policy().record_exists_action,
            RecordExistsAction::Update
        );
    }

    #[test]
    fn write_policy_generation() {
        let policy = restore().write_policy();
        assert!(policy.send_key);
        assert_eq!(policy.generation_policy, GenerationPolicy::ExpectGenGt);

        let r = Restore {
            no_generation: true,
            ..restore()
        };
        assert_eq!(r.write_policy().generation_policy, GenerationPolicy::None);
    }

    #[test]
    fn write_retry_policy_converts_milliseconds() {
        let r = Restore {
            retry_base_interval: 1000,
            retry_multiplier: 2.0,
            retry_max_attempts: 5,
            ..restore()
        };
        let policy = r.write_retry_policy();
        assert_eq!(policy.base_timeout, Duration::from_secs(1));
        assert_eq!(policy.max_retries, 5);
    }

    #[test]
    fn source_variants() {
        assert_eq!(
            restore().source(),
            Some(RestoreSource::Directory("backup-dir".into()))
        );
        assert_eq!(
            from_file().source(),
            Some(RestoreSource::File("backup.asb".into()))
        );

        let mut r = restore();
        r.common.directory.clear();
        r.directory_list = "a,b".into();
        r.parent_directory = "/backups".into();
        assert_eq!(
            r.source(),
            Some(RestoreSource::DirectoryList(vec![
                "/backups/a".into(),
                "/backups/b".into()
            ]))
        );
    }

    #[test]
    fn directory_list_without_parent_is_kept_as_is() {
        let mut r = restore();
        r.common.directory.clear();
        r.directory_list = "a,b".into();
        assert_eq!(
            r.source(),
            Some(RestoreSource::DirectoryList(vec!["a".into(), "b".into()]))
        );
    }

    #[test]
    fn is_directory_restore() {
        assert!(restore().is_directory_restore());
        assert!(!from_file().is_directory_restore());
    }

    #[test]
    fn restore_mode_parses_tokens() {
        let r = Restore {
            mode: "asbx".into(),
            ..restore()
        };
        assert_eq!(r.restore_mode(), RestoreMode::Asbx);
        assert_eq!(RestoreMode::parse("ASB"), None);
    }
}
