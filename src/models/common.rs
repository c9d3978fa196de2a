//! Options shared by every operation.

use std::time::Duration;

use super::{Validate, split_by_comma};
use crate::{
    engine::{InfoPolicy, RetryPolicy},
    error::ValidationError,
};

/// Options that backup, xdr backup and restore all accept.
///
/// Embedded by composition (`Backup::common`, `Restore::common`); the outer
/// groups delegate to the helpers here.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Common {
    pub directory: String,
    /// A single namespace, or `source,destination` for restore.
    pub namespace: String,
    /// Comma-separated.
    pub set_list: String,
    /// Comma-separated.
    pub bin_list: String,
    pub parallel: usize,
    pub no_records: bool,
    pub no_indexes: bool,
    pub no_udfs: bool,
    pub records_per_second: u32,
    /// MiB per second; 0 means unlimited.
    pub bandwidth: u64,
    /// Milliseconds.
    pub total_timeout: u64,
    /// Milliseconds.
    pub socket_timeout: u64,
    /// Milliseconds.
    pub info_timeout: u64,
    pub info_max_retries: u32,
    pub info_retries_multiplier: f64,
    /// Milliseconds.
    pub info_retry_interval: u64,
    /// MiB; buffer used when reading from stdin or writing to stdout.
    pub std_buffer_size: usize,
}

impl Common {
    pub fn sets(&self) -> Vec<String> {
        split_by_comma(&self.set_list)
    }

    pub fn bins(&self) -> Vec<String> {
        split_by_comma(&self.bin_list)
    }

    /// Namespace tokens, provided there are one or two non-empty ones.
    pub fn namespace_pair(&self) -> Option<(String, String)> {
        let tokens = split_by_comma(&self.namespace);
        if tokens.iter().any(String::is_empty) {
            return None;
        }

        match tokens.as_slice() {
            [single] => Some((single.clone(), single.clone())),
            [source, destination] => Some((source.clone(), destination.clone())),
            _ => None,
        }
    }

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
}

impl Validate for Common {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.namespace.is_empty() {
            return Err(ValidationError::Required("namespace"));
        }

        if self.namespace_pair().is_none() {
            return Err(ValidationError::Namespace(self.namespace.clone()));
        }

        if self.parallel < 1 {
            return Err(ValidationError::TooSmall {
                field: "parallel",
                min: 1,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common(namespace: &str) -> Common {
        Common {
            namespace: namespace.into(),
            parallel: 1,
            ..Common::default()
        }
    }

    #[test]
    fn missing_namespace() {
        assert_eq!(
            common("").validate().unwrap_err().to_string(),
            "namespace is required"
        );
    }

    #[test]
    fn one_or_two_namespaces_are_valid() {
        assert!(common("test").validate().is_ok());
        assert!(common("src,dst").validate().is_ok());
    }

    #[test]
    fn three_namespaces_are_invalid() {
        assert_eq!(
            common("a,b,c").validate().unwrap_err().to_string(),
            "invalid namespace: a,b,c"
        );
    }

    #[test]
    fn empty_namespace_token_is_invalid() {
        assert!(common("a,").validate().is_err());
        assert!(common(",b").validate().is_err());
    }

    #[test]
    fn zero_parallel_is_invalid() {
        let mut c = common("test");
        c.parallel = 0;
        assert_eq!(
            c.validate().unwrap_err().to_string(),
            "parallel can't be less than 1"
        );
    }

    #[test]
    fn namespace_pair_maps_source_and_destination() {
        assert_eq!(
            common("test").namespace_pair(),
            Some(("test".into(), "test".into()))
        );
        assert_eq!(
            common("src,dst").namespace_pair(),
            Some(("src".into(), "dst".into()))
        );
        assert_eq!(common("a,b,c").namespace_pair(), None);
    }

    #[test]
    fn policies_convert_milliseconds() {
        let c = Common {
            info_timeout: 1500,
            info_retry_interval: 250,
            info_retries_multiplier: 2.0,
            info_max_retries: 7,
            ..common("test")
        };
        assert_eq!(c.info_policy().timeout, Duration::from_millis(1500));
        let retry = c.info_retry_policy();
        assert_eq!(retry.base_timeout, Duration::from_millis(250));
        assert_eq!(retry.max_retries, 7);
    }
}
