//! Everything one `restore` run needs, and its assembly into engine
//! configuration.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::{MIB, validation::validate_storages};
use crate::{
    engine::{ClusterConfig, RestoreConfig},
    error::ValidationError,
    models::{
        AwsS3,
        AzureBlob,
        Cluster,
        Compression,
        Encryption,
        GcpStorage,
        Local,
        Restore,
        SecretAgent,
        Validate,
        storage::Target,
    },
};

#[derive(Debug, Clone, PartialEq)]
pub struct RestoreServiceConfig {
    pub cluster: Cluster,
    pub restore: Restore,
    pub compression: Compression,
    pub encryption: Encryption,
    pub secret_agent: SecretAgent,
    pub aws_s3: AwsS3,
    pub gcp_storage: GcpStorage,
    pub azure_blob: AzureBlob,
    pub local: Local,
}

/// What the engine receives on stdin for `restore`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestoreJob {
    pub cluster: ClusterConfig,
    pub restore: RestoreConfig,
    pub storage: Target,
    pub is_directory_restore: bool,
}

impl RestoreServiceConfig {
    /// Every value that may hold a `secrets:` reference, by flag name.
    pub fn secret_fields(&mut self) -> Vec<(&'static str, &mut String)> {
        let mut fields = self.cluster.secret_fields();
        fields.extend(self.encryption.secret_fields());
        fields.extend(self.aws_s3.secret_fields());
        fields.extend(self.gcp_storage.secret_fields());
        fields.extend(self.azure_blob.secret_fields());
        fields
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.cluster.validate()?;
        self.restore.validate()?;
        self.compression.validate()?;
        self.encryption.validate()?;
        self.secret_agent.validate()?;

        validate_storages(
            false,
            Some(&self.aws_s3),
            Some(&self.gcp_storage),
            Some(&self.azure_blob),
            Some(&self.local),
        )
    }

    pub fn assemble(&self) -> Result<RestoreConfig> {
        let restore = &self.restore;
        let common = &restore.common;

        let config = RestoreConfig {
            namespace: restore.namespace_config(),
            source: restore.source(),
            mode: restore.restore_mode(),
            set_list: restore.sets(),
            bin_list: restore.bins(),
            write_policy: restore.write_policy(),
            info_policy: common.info_policy(),
            info_retry_policy: common.info_retry_policy(),
            write_retry_policy: restore.write_retry_policy(),
            compression_policy: self.compression.policy(),
            encryption_policy: self.encryption.policy(),
            secret_agent_config: self.secret_agent.config(),
            parallel: common.parallel,
            records_per_second: common.records_per_second,
            bandwidth: common.bandwidth.saturating_mul(MIB),
            extra_ttl: restore.extra_ttl,
            no_records: common.no_records,
            no_indexes: common.no_indexes,
            no_udfs: common.no_udfs,
            disable_batch_writes: restore.disable_batch_writes,
            batch_size: restore.batch_size,
            max_async_batches: restore.max_async_batches,
            warm_up: usize::try_from(restore.warm_up).context("failed to map warm-up")?,
            ignore_record_errors: restore.ignore_record_error,
            validate_only: restore.validate_only,
            apply_metadata_last: restore.apply_metadata_last,
            metrics_enabled: true,
        };

        info!(
            namespace = ?config.namespace,
            mode = config.mode.as_str(),
            source = ?config.source,
            encryption = %self.encryption.mode,
            compression = %self.compression.mode,
            sets = ?config.set_list,
            bins = ?config.bin_list,
            parallel = config.parallel,
            records_per_second = config.records_per_second,
            bandwidth = config.bandwidth,
            no_records = config.no_records,
            no_indexes = config.no_indexes,
            no_udfs = config.no_udfs,
            disable_batch_writes = config.disable_batch_writes,
            batch_size = config.batch_size,
            max_async_batches = config.max_async_batches,
            warm_up = config.warm_up,
            extra_ttl = config.extra_ttl,
            write_policy = ?config.write_policy,
            validate_only = config.validate_only,
            "initialized restore config"
        );

        Ok(config)
    }

    pub fn job(&self) -> Result<RestoreJob> {
        Ok(RestoreJob {
            cluster: self.cluster.to_config(),
            restore: self.assemble()?,
            storage: Target::select(
                Some(&self.aws_s3),
                Some(&self.gcp_storage),
                Some(&self.azure_blob),
                Some(&self.local),
            ),
            is_directory_restore: self.restore.is_directory_restore(),
        })
    }
}
