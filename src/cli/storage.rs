//! Storage backend flags.
//!
//! [`StorageArgs`] is accepted by both subcommands.  Upload tuning
//! ([`UploadArgs`]) only exists under `backup`; read-retry and rehydration
//! tuning ([`DownloadArgs`]) only under `restore`.

use clap::Args;

use crate::partial::PartialConfig;

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Storage")]
pub struct StorageArgs {
    #[arg(long)]
    pub s3_bucket_name: Option<String>,
    #[arg(long)]
    pub s3_region: Option<String>,
    #[arg(long)]
    pub s3_profile: Option<String>,
    #[arg(long)]
    pub s3_endpoint_override: Option<String>,
    #[arg(long)]
    pub s3_access_key_id: Option<String>,
    #[arg(long)]
    pub s3_secret_access_key: Option<String>,
    #[arg(long)]
    pub s3_retry_max_attempts: Option<i64>,
    /// Milliseconds.
    #[arg(long)]
    pub s3_retry_max_backoff: Option<i64>,
    /// Milliseconds.
    #[arg(long)]
    pub s3_retry_backoff: Option<i64>,
    #[arg(long)]
    pub s3_max_conns_per_host: Option<i64>,
    /// Milliseconds.
    #[arg(long)]
    pub s3_request_timeout: Option<i64>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub s3_calculate_checksum: Option<bool>,

    /// Service account key file.
    #[arg(long)]
    pub gcp_key_path: Option<String>,
    #[arg(long)]
    pub gcp_bucket_name: Option<String>,
    #[arg(long)]
    pub gcp_endpoint_override: Option<String>,
    #[arg(long)]
    pub gcp_retry_max_attempts: Option<i64>,
    /// Milliseconds.
    #[arg(long)]
    pub gcp_retry_init_backoff: Option<i64>,
    /// Milliseconds.
    #[arg(long)]
    pub gcp_retry_max_backoff: Option<i64>,
    #[arg(long)]
    pub gcp_retry_backoff_multiplier: Option<f64>,
    #[arg(long)]
    pub gcp_max_conns_per_host: Option<i64>,
    /// Milliseconds.
    #[arg(long)]
    pub gcp_request_timeout: Option<i64>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub gcp_calculate_checksum: Option<bool>,

    #[arg(long)]
    pub azure_account_name: Option<String>,
    #[arg(long)]
    pub azure_account_key: Option<String>,
    #[arg(long)]
    pub azure_tenant_id: Option<String>,
    #[arg(long)]
    pub azure_client_id: Option<String>,
    #[arg(long)]
    pub azure_client_secret: Option<String>,
    #[arg(long)]
    pub azure_endpoint: Option<String>,
    #[arg(long)]
    pub azure_container_name: Option<String>,
    /// Upload tier on backup, rehydration priority on restore.
    #[arg(long)]
    pub azure_access_tier: Option<String>,
    #[arg(long)]
    pub azure_retry_max_attempts: Option<i64>,
    /// Seconds.
    #[arg(long)]
    pub azure_retry_delay: Option<i64>,
    /// Seconds.
    #[arg(long)]
    pub azure_retry_max_delay: Option<i64>,
    #[arg(long)]
    pub azure_max_conns_per_host: Option<i64>,
    /// Milliseconds.
    #[arg(long)]
    pub azure_request_timeout: Option<i64>,
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub azure_calculate_checksum: Option<bool>,

    /// Local file buffer size in bytes.
    #[arg(long)]
    pub local_buffer_size: Option<i64>,
}

impl StorageArgs {
    pub fn apply(&self, cfg: &mut PartialConfig) {
        let s3 = cfg.aws_s3_mut();
        s3.bucket_name = self.s3_bucket_name.clone();
        s3.region = self.s3_region.clone();
        s3.profile = self.s3_profile.clone();
        s3.endpoint_override = self.s3_endpoint_override.clone();
        s3.access_key_id = self.s3_access_key_id.clone();
        s3.secret_access_key = self.s3_secret_access_key.clone();
        s3.retry_max_attempts = self.s3_retry_max_attempts;
        s3.retry_max_backoff = self.s3_retry_max_backoff;
        s3.retry_backoff = self.s3_retry_backoff;
        s3.max_conns_per_host = self.s3_max_conns_per_host;
        s3.request_timeout = self.s3_request_timeout;
        s3.calculate_checksum = self.s3_calculate_checksum;

        let gcp = cfg.gcp_storage_mut();
        gcp.key_file = self.gcp_key_path.clone();
        gcp.bucket_name = self.gcp_bucket_name.clone();
        gcp.endpoint_override = self.gcp_endpoint_override.clone();
        gcp.retry_max_attempts = self.gcp_retry_max_attempts;
        gcp.retry_init_backoff = self.gcp_retry_init_backoff;
        gcp.retry_max_backoff = self.gcp_retry_max_backoff;
        gcp.retry_backoff_multiplier = self.gcp_retry_backoff_multiplier;
        gcp.max_conns_per_host = self.gcp_max_conns_per_host;
        gcp.request_timeout = self.gcp_request_timeout;
        gcp.calculate_checksum = self.gcp_calculate_checksum;

        let azure = cfg.azure_blob_mut();
        azure.account_name = self.azure_account_name.clone();
        azure.account_key = self.azure_account_key.clone();
        azure.tenant_id = self.azure_tenant_id.clone();
        azure.client_id = self.azure_client_id.clone();
        azure.client_secret = self.azure_client_secret.clone();
        azure.endpoint_override = self.azure_endpoint.clone();
        azure.container_name = self.azure_container_name.clone();
        azure.access_tier = self.azure_access_tier.clone();
        azure.retry_max_attempts = self.azure_retry_max_attempts;
        azure.retry_delay = self.azure_retry_delay;
        azure.retry_max_delay = self.azure_retry_max_delay;
        azure.max_conns_per_host = self.azure_max_conns_per_host;
        azure.request_timeout = self.azure_request_timeout;
        azure.calculate_checksum = self.azure_calculate_checksum;

        cfg.local.get_or_insert_with(Default::default).buffer_size = self.local_buffer_size;
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Storage upload")]
pub struct UploadArgs {
    #[arg(long)]
    pub s3_storage_class: Option<String>,
    /// MiB.
    #[arg(long)]
    pub s3_chunk_size: Option<i64>,
    #[arg(long)]
    pub s3_upload_concurrency: Option<i64>,

    /// MiB.
    #[arg(long)]
    pub gcp_chunk_size: Option<i64>,
    #[arg(long)]
    pub gcp_upload_concurrency: Option<i64>,

    /// MiB.
    #[arg(long)]
    pub azure_block_size: Option<i64>,
    #[arg(long)]
    pub azure_upload_concurrency: Option<i64>,
}

impl UploadArgs {
    pub fn apply(&self, cfg: &mut PartialConfig) {
        let s3 = cfg.aws_s3_mut();
        s3.storage_class = self.s3_storage_class.clone();
        s3.chunk_size = self.s3_chunk_size;
        s3.upload_concurrency = self.s3_upload_concurrency;

        let gcp = cfg.gcp_storage_mut();
        gcp.chunk_size = self.gcp_chunk_size;
        gcp.upload_concurrency = self.gcp_upload_concurrency;

        let azure = cfg.azure_blob_mut();
        azure.block_size = self.azure_block_size;
        azure.upload_concurrency = self.azure_upload_concurrency;
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Storage download")]
pub struct DownloadArgs {
    /// Glacier retrieval tier.
    #[arg(long)]
    pub s3_access_tier: Option<String>,
    /// Milliseconds between archive restore status checks.
    #[arg(long)]
    pub s3_restore_poll_duration: Option<i64>,
    /// Milliseconds.
    #[arg(long)]
    pub s3_retry_read_backoff: Option<i64>,
    #[arg(long)]
    pub s3_retry_read_multiplier: Option<f64>,
    #[arg(long)]
    pub s3_retry_read_max_attempts: Option<u32>,

    /// Milliseconds.
    #[arg(long)]
    pub gcp_retry_read_backoff: Option<i64>,
    #[arg(long)]
    pub gcp_retry_read_multiplier: Option<f64>,
    #[arg(long)]
    pub gcp_retry_read_max_attempts: Option<u32>,

    /// Milliseconds between rehydration status checks.
    #[arg(long)]
    pub azure_rehydrate_poll_duration: Option<i64>,
    /// Milliseconds.
    #[arg(long)]
    pub azure_retry_read_backoff: Option<i64>,
    #[arg(long)]
    pub azure_retry_read_multiplier: Option<f64>,
    #[arg(long)]
    pub azure_retry_read_max_attempts: Option<u32>,
}

impl DownloadArgs {
    pub fn apply(&self, cfg: &mut PartialConfig) {
        let s3 = cfg.aws_s3_mut();
        s3.access_tier = self.s3_access_tier.clone();
        s3.restore_poll_duration = self.s3_restore_poll_duration;
        s3.retry_read_backoff = self.s3_retry_read_backoff;
        s3.retry_read_multiplier = self.s3_retry_read_multiplier;
        s3.retry_read_max_attempts = self.s3_retry_read_max_attempts;

        let gcp = cfg.gcp_storage_mut();
        gcp.retry_read_backoff = self.gcp_retry_read_backoff;
        gcp.retry_read_multiplier = self.gcp_retry_read_multiplier;
        gcp.retry_read_max_attempts = self.gcp_retry_read_max_attempts;

        let azure = cfg.azure_blob_mut();
        azure.rehydrate_poll_duration = self.azure_rehydrate_poll_duration;
        azure.retry_read_backoff = self.azure_retry_read_backoff;
        azure.retry_read_multiplier = self.azure_retry_read_multiplier;
        azure.retry_read_max_attempts = self.azure_retry_read_max_attempts;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_flags_leave_sections_empty() {
        let mut cfg = PartialConfig::default();
        StorageArgs::default().apply(&mut cfg);
        UploadArgs::default().apply(&mut cfg);

        assert_eq!(cfg.aws_s3(), Some(&Default::default()));
        assert_eq!(cfg.azure_blob(), Some(&Default::default()));
    }

    #[test]
    fn flags_land_in_their_sections() {
        let mut cfg = PartialConfig::default();
        StorageArgs {
            azure_container_name: Some("c".into()),
            local_buffer_size: Some(4096),
            ..StorageArgs::default()
        }
        .apply(&mut cfg);
        DownloadArgs {
            azure_rehydrate_poll_duration: Some(500),
            ..DownloadArgs::default()
        }
        .apply(&mut cfg);

        let azure = cfg.azure_blob().unwrap();
        assert_eq!(azure.container_name.as_deref(), Some("c"));
        assert_eq!(azure.rehydrate_poll_duration, Some(500));
        assert_eq!(cfg.local.unwrap().buffer_size, Some(4096));
    }
}
