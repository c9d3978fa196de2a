//! Storage backend options.
//!
//! Local storage is always validated when present.  A cloud backend only
//! counts as selected when [`is_configured`](AwsS3::is_configured) reports an
//! identifying field; see [`crate::config::validation::validate_storages`].
//!
//! Backup and restore check different knobs, hence `validate(is_backup)`
//! instead of [`super::Validate`].

use serde::Serialize;

use crate::error::ValidationError;

fn non_negative(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::Negative(field));
    }

    Ok(())
}

fn at_least_one(field: &'static str, value: i64) -> Result<(), ValidationError> {
    if value < 1 {
        return Err(ValidationError::TooSmall { field, min: 1 });
    }

    Ok(())
}

// ─── Shared ───────────────────────────────────────────────────────────────────

/// Knobs every cloud backend has.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StorageCommon {
    pub max_conns_per_host: i64,
    /// Milliseconds.
    pub request_timeout: i64,
    pub calculate_checksum: bool,
    /// Milliseconds.
    pub retry_read_backoff: i64,
    pub retry_read_multiplier: f64,
    pub retry_read_max_attempts: u32,
}

impl StorageCommon {
    pub fn validate(&self, is_backup: bool) -> Result<(), ValidationError> {
        non_negative("max connections per host", self.max_conns_per_host)?;
        non_negative("request timeout", self.request_timeout)?;

        if !is_backup {
            non_negative("retry read backoff", self.retry_read_backoff)?;

            if self.retry_read_multiplier < 1.0 {
                return Err(ValidationError::TooSmall {
                    field: "retry read multiplier",
                    min: 1,
                });
            }
        }

        Ok(())
    }
}

// ─── Local ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Local {
    /// Bytes read or written per I/O call; 0 lets the engine decide.
    pub buffer_size: i64,
}

impl Local {
    pub fn validate(&self, _is_backup: bool) -> Result<(), ValidationError> {
        non_negative("local buffer size", self.buffer_size)
    }
}

// ─── AWS S3 ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AwsS3 {
    pub bucket_name: String,
    pub region: String,
    pub profile: String,
    pub endpoint: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub storage_class: String,
    /// Rehydration tier for archived objects.
    pub access_tier: String,

    pub retry_max_attempts: i64,
    /// Milliseconds.
    pub retry_max_backoff: i64,
    /// Milliseconds.
    pub retry_backoff: i64,

    /// MiB.
    pub chunk_size: i64,
    pub upload_concurrency: i64,
    /// Milliseconds between rehydration status checks.
    pub restore_poll_duration: i64,

    #[serde(flatten)]
    pub common: StorageCommon,
}

impl AwsS3 {
    pub fn is_configured(&self) -> bool {
        [&self.bucket_name, &self.region, &self.profile, &self.endpoint]
            .iter()
            .any(|value| !value.is_empty())
    }

    pub fn secret_fields(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![
            ("s3-bucket-name", &mut self.bucket_name),
            ("s3-region", &mut self.region),
            ("s3-profile", &mut self.profile),
            ("s3-endpoint-override", &mut self.endpoint),
            ("s3-access-key-id", &mut self.access_key_id),
            ("s3-secret-access-key", &mut self.secret_access_key),
            ("s3-storage-class", &mut self.storage_class),
            ("s3-access-tier", &mut self.access_tier),
        ]
    }

    pub fn validate(&self, is_backup: bool) -> Result<(), ValidationError> {
        if self.bucket_name.is_empty() {
            return Err(ValidationError::Required("bucket name"));
        }

        non_negative("retry maximum attempts", self.retry_max_attempts)?;
        non_negative("retry max backoff", self.retry_max_backoff)?;
        non_negative("retry backoff", self.retry_backoff)?;

        if is_backup {
            at_least_one("chunk size", self.chunk_size)?;
            at_least_one("upload concurrency", self.upload_concurrency)?;
        } else {
            at_least_one("rehydrate poll duration", self.restore_poll_duration)?;
        }

        self.common.validate(is_backup)
    }
}

// ─── GCP Storage ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct GcpStorage {
    /// Service account key file.
    pub key_file: String,
    pub bucket_name: String,
    pub endpoint: String,

    pub retry_max_attempts: i64,
    /// Milliseconds.
    pub retry_backoff: i64,
    /// Milliseconds.
    pub retry_backoff_max: i64,
    pub retry_backoff_multiplier: f64,

    /// MiB.
    pub chunk_size: i64,
    pub upload_concurrency: i64,

    #[serde(flatten)]
    pub common: StorageCommon,
}

impl GcpStorage {
    pub fn is_configured(&self) -> bool {
        [&self.bucket_name, &self.key_file, &self.endpoint]
            .iter()
            .any(|value| !value.is_empty())
    }

    pub fn secret_fields(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![
            ("gcp-key-path", &mut self.key_file),
            ("gcp-bucket-name", &mut self.bucket_name),
            ("gcp-endpoint-override", &mut self.endpoint),
        ]
    }

    pub fn validate(&self, is_backup: bool) -> Result<(), ValidationError> {
        if self.bucket_name.is_empty() {
            return Err(ValidationError::Required("bucket name"));
        }

        non_negative("retry maximum attempts", self.retry_max_attempts)?;
        non_negative("retry backoff", self.retry_backoff)?;
        non_negative("retry backoff max", self.retry_backoff_max)?;

        if is_backup {
            at_least_one("chunk size", self.chunk_size)?;
            at_least_one("upload concurrency", self.upload_concurrency)?;
        }

        self.common.validate(is_backup)
    }
}

// ─── Azure Blob ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AzureBlob {
    pub account_name: String,
    pub account_key: String,
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub endpoint: String,
    pub container_name: String,
    pub access_tier: String,
    /// Milliseconds between rehydration status checks.
    pub restore_poll_duration: i64,

    pub retry_max_attempts: i64,
    /// Milliseconds.
    pub retry_delay: i64,
    /// Milliseconds.
    pub retry_max_delay: i64,

    /// MiB.
    pub block_size: i64,
    pub upload_concurrency: i64,

    #[serde(flatten)]
    pub common: StorageCommon,
}

impl AzureBlob {
    pub fn is_configured(&self) -> bool {
        [
            &self.container_name,
            &self.account_name,
            &self.account_key,
            &self.endpoint,
            &self.tenant_id,
            &self.client_id,
            &self.client_secret,
        ]
        .iter()
        .any(|value| !value.is_empty())
    }

    pub fn secret_fields(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![
            ("azure-account-name", &mut self.account_name),
            ("azure-account-key", &mut self.account_key),
            ("azure-tenant-id", &mut self.tenant_id),
            ("azure-client-id", &mut self.client_id),
            ("azure-client-secret", &mut self.client_secret),
            ("azure-endpoint", &mut self.endpoint),
            ("azure-container-name", &mut self.container_name),
            ("azure-access-tier", &mut self.access_tier),
        ]
    }

    pub fn validate(&self, is_backup: bool) -> Result<(), ValidationError> {
        if self.container_name.is_empty() {
            return Err(ValidationError::Required("container name"));
        }

        non_negative("retry maximum attempts", self.retry_max_attempts)?;
        non_negative("retry delay", self.retry_delay)?;
        non_negative("retry max delay", self.retry_max_delay)?;

        if is_backup {
            at_least_one("block size", self.block_size)?;
            at_least_one("upload concurrency", self.upload_concurrency)?;
        } else {
            at_least_one("restore poll duration", self.restore_poll_duration)?;
        }

        self.common.validate(is_backup)
    }
}

// ─── Selection ────────────────────────────────────────────────────────────────

/// The backend the engine reads from or writes to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "provider", rename_all = "kebab-case")]
pub enum Target {
    Local(Local),
    AwsS3(AwsS3),
    GcpStorage(GcpStorage),
    AzureBlob(AzureBlob),
}

impl Target {
    /// Pick the configured cloud backend, falling back to local storage.
    /// Assumes [`crate::config::validation::validate_storages`] already ran.
    pub fn select(
        aws_s3: Option<&AwsS3>,
        gcp_storage: Option<&GcpStorage>,
        azure_blob: Option<&AzureBlob>,
        local: Option<&Local>,
    ) -> Self {
        if let Some(s3) = aws_s3.filter(|s| s.is_configured()) {
            return Self::AwsS3(s3.clone());
        }
        if let Some(gcp) = gcp_storage.filter(|g| g.is_configured()) {
            return Self::GcpStorage(gcp.clone());
        }
        if let Some(azure) = azure_blob.filter(|a| a.is_configured()) {
            return Self::AzureBlob(azure.clone());
        }

        Self::Local(local.cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common() -> StorageCommon {
        StorageCommon {
            retry_read_multiplier: 2.0,
            ..StorageCommon::default()
        }
    }

    fn s3() -> AwsS3 {
        AwsS3 {
            bucket_name: "bucket".into(),
            chunk_size: 5,
            upload_concurrency: 1,
            restore_poll_duration: 60_000,
            common: common(),
            ..AwsS3::default()
        }
    }

    fn gcp() -> GcpStorage {
        GcpStorage {
            bucket_name: "bucket".into(),
            chunk_size: 5,
            upload_concurrency: 1,
            common: common(),
            ..GcpStorage::default()
        }
    }

    fn azure() -> AzureBlob {
        AzureBlob {
            container_name: "container".into(),
            block_size: 5,
            upload_concurrency: 1,
            restore_poll_duration: 60_000,
            common: common(),
            ..AzureBlob::default()
        }
    }

    #[test]
    fn valid_backends() {
        for is_backup in [true, false] {
            assert!(s3().validate(is_backup).is_ok());
            assert!(gcp().validate(is_backup).is_ok());
            assert!(azure().validate(is_backup).is_ok());
            assert!(Local::default().validate(is_backup).is_ok());
        }
    }

    #[test]
    fn identifying_field_required() {
        let s = AwsS3 {
            bucket_name: String::new(),
            region: "eu-west-1".into(),
            ..s3()
        };
        assert_eq!(s.validate(true).unwrap_err().to_string(), "bucket name is required");

        let g = GcpStorage {
            bucket_name: String::new(),
            ..gcp()
        };
        assert_eq!(g.validate(true).unwrap_err().to_string(), "bucket name is required");

        let a = AzureBlob {
            container_name: String::new(),
            ..azure()
        };
        assert_eq!(
            a.validate(true).unwrap_err().to_string(),
            "container name is required"
        );
    }

    #[test]
    fn upload_tuning_checked_on_backup_only() {
        let s = AwsS3 {
            chunk_size: 0,
            ..s3()
        };
        assert_eq!(
            s.validate(true).unwrap_err().to_string(),
            "chunk size can't be less than 1"
        );
        assert!(s.validate(false).is_ok());

        let a = AzureBlob {
            upload_concurrency: 0,
            ..azure()
        };
        assert_eq!(
            a.validate(true).unwrap_err().to_string(),
            "upload concurrency can't be less than 1"
        );
        assert!(a.validate(false).is_ok());
    }

    #[test]
    fn poll_duration_checked_on_restore_only() {
        let s = AwsS3 {
            restore_poll_duration: 0,
            ..s3()
        };
        assert!(s.validate(true).is_ok());
        assert_eq!(
            s.validate(false).unwrap_err().to_string(),
            "rehydrate poll duration can't be less than 1"
        );

        let a = AzureBlob {
            restore_poll_duration: 0,
            ..azure()
        };
        assert_eq!(
            a.validate(false).unwrap_err().to_string(),
            "restore poll duration can't be less than 1"
        );
    }

    #[test]
    fn negative_retries_rejected() {
        let a = AzureBlob {
            retry_delay: -1,
            ..azure()
        };
        assert_eq!(
            a.validate(true).unwrap_err().to_string(),
            "retry delay must be non-negative"
        );
    }

    #[test]
    fn retry_read_multiplier_checked_on_restore() {
        let s = AwsS3 {
            common: StorageCommon {
                retry_read_multiplier: 0.5,
                ..common()
            },
            ..s3()
        };
        assert!(s.validate(true).is_ok());
        assert_eq!(
            s.validate(false).unwrap_err().to_string(),
            "retry read multiplier can't be less than 1"
        );
    }

    #[test]
    fn negative_local_buffer() {
        let l = Local { buffer_size: -1 };
        assert!(l.validate(true).is_err());
    }

    #[test]
    fn is_configured_looks_at_identifying_fields() {
        assert!(!AwsS3::default().is_configured());
        assert!(AwsS3 {
            profile: "default".into(),
            ..AwsS3::default()
        }
        .is_configured());
        assert!(!GcpStorage::default().is_configured());
        assert!(GcpStorage {
            key_file: "key.json".into(),
            ..GcpStorage::default()
        }
        .is_configured());
        assert!(!AzureBlob::default().is_configured());
        assert!(AzureBlob {
            client_secret: "s".into(),
            ..AzureBlob::default()
        }
        .is_configured());
    }

    #[test]
    fn unconfigured_cloud_defaults_do_not_count() {
        // Tuning defaults alone don't select a backend.
        let s = AwsS3 {
            bucket_name: String::new(),
            ..s3()
        };
        assert!(!s.is_configured());
    }

    #[test]
    fn target_prefers_configured_cloud() {
        let unconfigured = AwsS3::default();
        let target = Target::select(Some(&unconfigured), None, Some(&azure()), None);
        assert!(matches!(target, Target::AzureBlob(_)));

        let target = Target::select(Some(&unconfigured), None, None, None);
        assert_eq!(target, Target::Local(Local::default()));
    }

    #[test]
    fn target_serialises_with_provider_tag() {
        let json = serde_json::to_value(Target::Local(Local { buffer_size: 8 })).unwrap();
        assert_eq!(json["provider"], "local");
        assert_eq!(json["buffer-size"], 8);
    }
}
