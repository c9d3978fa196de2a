//! Everything one `backup` run needs, and its assembly into engine
//! configuration.

use std::{num::NonZero, path::Path, thread, time::Duration};

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use super::{MIB, validation::validate_storages};
use crate::{
    engine::{BackupConfig, BackupXdrConfig, ClusterConfig, EncoderType},
    error::ValidationError,
    models::{
        AwsS3,
        AzureBlob,
        Backup,
        BackupXdr,
        Cluster,
        Compression,
        Encryption,
        GcpStorage,
        Local,
        STDOUT_PLACEHOLDER,
        SecretAgent,
        Validate,
        storage::Target,
    },
};

/// The merged option groups of a backup.  Exactly one of `backup` (scan) and
/// `xdr` (change feed) is set once [`validate`](Self::validate) passes.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupServiceConfig {
    pub cluster: Cluster,
    pub backup: Option<Backup>,
    pub xdr: Option<BackupXdr>,
    pub compression: Compression,
    pub encryption: Encryption,
    pub secret_agent: SecretAgent,
    pub aws_s3: AwsS3,
    pub gcp_storage: GcpStorage,
    pub azure_blob: AzureBlob,
    pub local: Local,
}

/// What the engine receives on stdin for `backup`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupJob {
    pub cluster: ClusterConfig,
    pub backup: BackupConfig,
    pub xdr: Option<BackupXdrConfig>,
    pub storage: Target,
    pub directory: String,
    pub output_file: String,
    pub estimate: bool,
    pub estimate_samples: i64,
    pub remove_artifacts: bool,
    pub is_xdr: bool,
    pub is_continue: bool,
    pub is_stop_xdr: bool,
    pub is_unblock_mrt: bool,
    pub skip_writer_init: bool,
    pub is_stdout: bool,
    pub should_clear_target: bool,
    pub should_save_state: bool,
}

impl BackupServiceConfig {
    pub fn is_xdr(&self) -> bool {
        self.xdr.is_some() && self.backup.is_none()
    }

    pub fn is_continue(&self) -> bool {
        self.backup.as_ref().is_some_and(|b| !b.continue_from.is_empty())
    }

    pub fn is_stop_xdr(&self) -> bool {
        self.xdr.as_ref().is_some_and(|x| x.stop_xdr)
    }

    pub fn is_unblock_mrt(&self) -> bool {
        self.xdr.as_ref().is_some_and(|x| x.unblock_mrt)
    }

    /// True unless this is an estimate run.
    pub fn skip_writer_init(&self) -> bool {
        self.backup.as_ref().is_none_or(|b| !b.estimate)
    }

    pub fn is_stdout(&self) -> bool {
        self.backup
            .as_ref()
            .is_some_and(|b| b.output_file == STDOUT_PLACEHOLDER)
    }

    pub fn should_clear_target(&self) -> bool {
        match (&self.backup, &self.xdr) {
            (Some(backup), _) => backup.should_clear_target(),
            (None, Some(xdr)) => xdr.remove_files,
            (None, None) => false,
        }
    }

    pub fn should_save_state(&self) -> bool {
        self.backup.as_ref().is_some_and(Backup::should_save_state)
    }

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
        if self.backup.is_some() == self.xdr.is_some() {
            return Err(ValidationError::BackupMode);
        }

        self.cluster.validate()?;
        self.backup.validate()?;
        self.xdr.validate()?;
        self.compression.validate()?;
        self.encryption.validate()?;
        self.secret_agent.validate()?;

        validate_storages(
            true,
            Some(&self.aws_s3),
            Some(&self.gcp_storage),
            Some(&self.azure_blob),
            Some(&self.local),
        )
    }

    /// Build the engine configuration.  For a change-feed backup the scan
    /// configuration only carries the namespace, with records disabled: the
    /// regular path backs up indexes and UDFs, records come from the feed.
    pub fn assemble(&self) -> Result<(BackupConfig, Option<BackupXdrConfig>)> {
        info!("initializing backup config");

        if let (Some(xdr), None) = (&self.xdr, &self.backup) {
            let xdr_config = self.xdr_config(xdr);
            let backup_config = BackupConfig {
                namespace: xdr_config.namespace.clone(),
                no_records: true,
                ..BackupConfig::default()
            };

            info!(
                namespace = %xdr_config.namespace,
                encryption = %self.encryption.mode,
                compression = %self.compression.mode,
                parallel_write = xdr_config.parallel_write,
                file_limit = xdr_config.file_limit,
                dc = %xdr_config.dc,
                local_address = %xdr_config.local_address,
                local_port = xdr_config.local_port,
                rewind = %xdr_config.rewind,
                max_throughput = xdr_config.max_throughput,
                max_connections = xdr_config.max_connections,
                forward = xdr_config.forward,
                "initialized xdr backup config"
            );

            return Ok((backup_config, Some(xdr_config)));
        }

        let backup = self.backup.as_ref().ok_or(ValidationError::BackupMode)?;
        let config = self
            .scan_config(backup)
            .context("failed to map backup config")?;

        info!(
            namespace = %config.namespace,
            encryption = %self.encryption.mode,
            compression = %self.compression.mode,
            filters = %backup.partition_list,
            nodes = ?config.node_list,
            sets = ?config.set_list,
            bins = ?config.bin_list,
            racks = ?config.rack_list,
            parallel_read = config.parallel_read,
            parallel_write = config.parallel_write,
            no_records = config.no_records,
            no_indexes = config.no_indexes,
            no_udfs = config.no_udfs,
            records_per_second = config.records_per_second,
            bandwidth = config.bandwidth,
            file_limit = config.file_limit,
            compact = config.compact,
            no_ttl_only = config.no_ttl_only,
            state_file = ?config.state_file,
            continue_ = config.continue_,
            page_size = config.page_size,
            output_prefix = %config.output_file_prefix,
            "initialized scan backup config"
        );

        Ok((config, None))
    }

    /// Assemble and wrap everything the engine needs.
    pub fn job(&self) -> Result<BackupJob> {
        let (backup, xdr) = self.assemble()?;

        let (directory, output_file, estimate, estimate_samples, remove_artifacts) =
            match (&self.backup, &self.xdr) {
                (Some(b), _) => (
                    b.common.directory.clone(),
                    b.output_file.clone(),
                    b.estimate,
                    b.estimate_samples,
                    b.remove_artifacts,
                ),
                (None, Some(x)) => (x.directory.clone(), String::new(), false, 0, false),
                (None, None) => Default::default(),
            };

        Ok(BackupJob {
            cluster: self.cluster.to_config(),
            backup,
            xdr,
            storage: Target::select(
                Some(&self.aws_s3),
                Some(&self.gcp_storage),
                Some(&self.azure_blob),
                Some(&self.local),
            ),
            directory,
            output_file,
            estimate,
            estimate_samples,
            remove_artifacts,
            is_xdr: self.is_xdr(),
            is_continue: self.is_continue(),
            is_stop_xdr: self.is_stop_xdr(),
            is_unblock_mrt: self.is_unblock_mrt(),
            skip_writer_init: self.skip_writer_init(),
            is_stdout: self.is_stdout(),
            should_clear_target: self.should_clear_target(),
            should_save_state: self.should_save_state(),
        })
    }

    fn scan_config(&self, backup: &Backup) -> Result<BackupConfig> {
        let common = &backup.common;

        let mut config = BackupConfig {
            namespace: common.namespace.clone(),
            set_list: backup.sets(),
            bin_list: backup.bins(),
            no_records: common.no_records,
            no_indexes: common.no_indexes,
            no_udfs: common.no_udfs,
            records_per_second: common.records_per_second,
            file_limit: backup.file_limit.saturating_mul(MIB),
            // One knob drives both sides.
            parallel_read: common.parallel,
            parallel_write: common.parallel,
            bandwidth: common.bandwidth.saturating_mul(MIB),
            compact: backup.compact,
            no_ttl_only: backup.no_ttl_only,
            output_file_prefix: backup.output_file_prefix.clone(),
            info_policy: common.info_policy(),
            info_retry_policy: common.info_retry_policy(),
            metrics_enabled: true,
            ..BackupConfig::default()
        };

        // A single stream can't be split into files or written concurrently.
        if self.is_stdout() || !backup.output_file.is_empty() {
            config.file_limit = 0;
            config.parallel_write = 1;
        }

        config.rack_list = backup.racks()?;

        if !backup.continue_from.is_empty() {
            config.state_file = Some(join(&common.directory, &backup.continue_from));
            config.continue_ = true;
            config.page_size = backup.scan_page_size;
        }

        if !backup.state_file_dst.is_empty() {
            config.state_file = Some(join(&common.directory, &backup.state_file_dst));
            config.page_size = backup.scan_page_size;
        }

        config.node_list = backup.nodes();
        config.partition_filters = backup.partition_filters()?;
        config.scan_policy = backup.scan_policy()?;
        config.compression_policy = self.compression.policy();
        config.encryption_policy = self.encryption.policy();
        config.secret_agent_config = self.secret_agent.config();

        config.mod_before = backup
            .modified_before_time()
            .context("failed to parse modified before date")?;
        config.mod_after = backup
            .modified_after_time()
            .context("failed to parse modified after date")?;

        Ok(config)
    }

    fn xdr_config(&self, xdr: &BackupXdr) -> BackupXdrConfig {
        let parallel_write = if xdr.parallel_write > 0 {
            xdr.parallel_write
        } else {
            thread::available_parallelism().map_or(1, NonZero::get)
        };

        BackupXdrConfig {
            namespace: xdr.namespace.clone(),
            dc: xdr.dc.clone(),
            local_address: xdr.local_address.clone(),
            local_port: xdr.local_port,
            rewind: xdr.rewind.clone(),
            encoder: EncoderType::Xdr,
            compression_policy: self.compression.policy(),
            encryption_policy: self.encryption.policy(),
            secret_agent_config: self.secret_agent.config(),
            info_policy: xdr.info_policy(),
            info_retry_policy: xdr.info_retry_policy(),
            file_limit: xdr.file_limit.saturating_mul(MIB),
            parallel_write,
            max_throughput: xdr.max_throughput,
            read_timeout: Duration::from_millis(xdr.read_timeout),
            write_timeout: Duration::from_millis(xdr.write_timeout),
            info_polling_period: Duration::from_millis(xdr.info_polling_period),
            start_timeout: Duration::from_millis(xdr.start_timeout),
            result_queue_size: xdr.results_queue_size,
            ack_queue_size: xdr.ack_queue_size,
            max_connections: xdr.max_connections,
            forward: xdr.forward,
            metrics_enabled: true,
        }
    }
}

fn join(directory: &str, file: &str) -> String {
    Path::new(directory).join(file).to_string_lossy().into_owned()
}
