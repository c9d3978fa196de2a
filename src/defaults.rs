//! Built-in option values.
//!
//! [`Defaults`] is built once in `main` and handed by reference to the merge
//! step, which only overwrites the fields that a config file or command-line
//! flag actually set.  Backup and restore keep separate `Common` defaults
//! because they disagree on parallelism and write timeouts.

use crate::models::{
    App,
    AwsS3,
    AzureBlob,
    Backup,
    BackupXdr,
    Cluster,
    Common,
    Compression,
    Encryption,
    GcpStorage,
    Local,
    Restore,
    SecretAgent,
    StorageCommon,
    xdr::REWIND_ALL,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Defaults {
    pub app: App,
    pub cluster: Cluster,
    pub backup: Backup,
    pub xdr: BackupXdr,
    pub restore: Restore,
    pub compression: Compression,
    pub encryption: Encryption,
    pub secret_agent: SecretAgent,
    pub aws_s3: AwsS3,
    pub gcp_storage: GcpStorage,
    pub azure_blob: AzureBlob,
    pub local: Local,
}

impl Default for Defaults {
    fn default() -> Self {
        Self::new()
    }
}

impl Defaults {
    pub fn new() -> Self {
        Self {
            app: app(),
            cluster: cluster(),
            backup: backup(),
            xdr: xdr(),
            restore: restore(),
            compression: Compression {
                mode: "NONE".into(),
                level: 3,
            },
            encryption: Encryption {
                mode: "NONE".into(),
                ..Encryption::default()
            },
            secret_agent: SecretAgent {
                connection_type: "tcp".into(),
                timeout: 1000,
                ..SecretAgent::default()
            },
            aws_s3: aws_s3(),
            gcp_storage: gcp_storage(),
            azure_blob: azure_blob(),
            local: Local::default(),
        }
    }
}

fn app() -> App {
    App {
        log_level: "debug".into(),
        ..App::default()
    }
}

fn cluster() -> Cluster {
    Cluster {
        host: "127.0.0.1".into(),
        port: 3000,
        client_timeout: 30_000,
        client_idle_timeout: 0,
        client_login_timeout: 10_000,
        ..Cluster::default()
    }
}

fn common() -> Common {
    Common {
        parallel: 1,
        socket_timeout: 10_000,
        info_timeout: 10_000,
        info_max_retries: 3,
        info_retries_multiplier: 1.0,
        info_retry_interval: 1000,
        std_buffer_size: 4,
        ..Common::default()
    }
}

fn backup() -> Backup {
    Backup {
        common: common(),
        file_limit: 250,
        max_retries: 5,
        sleep_between_retries: 5,
        estimate_samples: 10_000,
        scan_page_size: 10_000,
        ..Backup::default()
    }
}

fn xdr() -> BackupXdr {
    let common = common();

    BackupXdr {
        file_limit: 250,
        parallel_write: 0,
        dc: "dc1".into(),
        local_address: "127.0.0.1".into(),
        local_port: 8080,
        rewind: REWIND_ALL.into(),
        read_timeout: 1000,
        write_timeout: 1000,
        info_polling_period: 1000,
        start_timeout: 30_000,
        results_queue_size: 256,
        ack_queue_size: 256,
        max_connections: 100,
        info_timeout: common.info_timeout,
        info_max_retries: common.info_max_retries,
        info_retries_multiplier: common.info_retries_multiplier,
        info_retry_interval: common.info_retry_interval,
        ..BackupXdr::default()
    }
}

fn restore() -> Restore {
    Restore {
        common: Common {
            parallel: 8,
            total_timeout: 10_000,
            ..common()
        },
        mode: "auto".into(),
        batch_size: 128,
        max_async_batches: 32,
        retry_base_interval: 1000,
        retry_multiplier: 1.0,
        retry_max_attempts: 10,
        ..Restore::default()
    }
}

fn storage_common() -> StorageCommon {
    StorageCommon {
        retry_read_backoff: 1000,
        retry_read_multiplier: 2.0,
        retry_read_max_attempts: 3,
        ..StorageCommon::default()
    }
}

fn aws_s3() -> AwsS3 {
    AwsS3 {
        retry_max_attempts: 100,
        retry_max_backoff: 90_000,
        retry_backoff: 1000,
        chunk_size: 5,
        upload_concurrency: 1,
        restore_poll_duration: 60_000,
        common: storage_common(),
        ..AwsS3::default()
    }
}

fn gcp_storage() -> GcpStorage {
    GcpStorage {
        retry_max_attempts: 100,
        retry_backoff: 1000,
        retry_backoff_max: 90_000,
        retry_backoff_multiplier: 2.0,
        chunk_size: 5,
        upload_concurrency: 1,
        common: storage_common(),
        ..GcpStorage::default()
    }
}

fn azure_blob() -> AzureBlob {
    AzureBlob {
        restore_poll_duration: 60_000,
        retry_max_attempts: 100,
        retry_delay: 60,
        retry_max_delay: 90,
        block_size: 5,
        upload_concurrency: 1,
        common: storage_common(),
        ..AzureBlob::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Validate;

    #[test]
    fn backup_and_restore_disagree_on_parallel() {
        let d = Defaults::new();
        assert_eq!(d.backup.common.parallel, 1);
        assert_eq!(d.restore.common.parallel, 8);
        assert_ne!(
            d.backup.common.total_timeout,
            d.restore.common.total_timeout
        );
    }

    #[test]
    fn default_groups_are_valid() {
        let d = Defaults::new();
        assert!(d.app.validate().is_ok());
        assert!(d.cluster.validate().is_ok());
        assert!(d.compression.validate().is_ok());
        assert!(d.encryption.validate().is_ok());
        assert!(d.secret_agent.validate().is_ok());
        assert!(d.local.validate(true).is_ok());
    }

    #[test]
    fn default_cloud_backends_are_unconfigured() {
        let d = Defaults::new();
        assert!(!d.aws_s3.is_configured());
        assert!(!d.gcp_storage.is_configured());
        assert!(!d.azure_blob.is_configured());
    }

    #[test]
    fn default_policies_are_disabled() {
        let d = Defaults::new();
        assert!(d.compression.policy().is_none());
        assert!(d.encryption.policy().is_none());
        assert!(d.secret_agent.config().is_none());
    }

    #[test]
    fn xdr_defaults_need_only_namespace_and_directory() {
        let mut x = Defaults::new().xdr;
        x.namespace = "test".into();
        x.directory = "dir".into();
        assert!(x.validate().is_ok());
    }

    #[test]
    fn configured_cloud_backends_pass_with_defaults() {
        let d = Defaults::new();
        let s3 = AwsS3 {
            bucket_name: "bucket".into(),
            ..d.aws_s3
        };
        assert!(s3.validate(true).is_ok());
        assert!(s3.validate(false).is_ok());
    }
}
