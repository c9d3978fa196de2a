//! `aws.s3:`, `gcp.storage:`, `azure.blob:` and `local:` sections.

use crate::models::{AwsS3, AzureBlob, GcpStorage, Local};

partial_group! {
    pub struct PartialAwsS3 => AwsS3 {
        bucket_name: String => bucket_name,
        region: String => region,
        profile: String => profile,
        endpoint_override: String => endpoint,
        access_key_id: String => access_key_id,
        secret_access_key: String => secret_access_key,
        storage_class: String => storage_class,
        access_tier: String => access_tier,
        retry_max_attempts: i64 => retry_max_attempts,
        retry_max_backoff: i64 => retry_max_backoff,
        retry_backoff: i64 => retry_backoff,
        chunk_size: i64 => chunk_size,
        upload_concurrency: i64 => upload_concurrency,
        restore_poll_duration: i64 => restore_poll_duration,
        max_conns_per_host: i64 => common.max_conns_per_host,
        request_timeout: i64 => common.request_timeout,
        calculate_checksum: bool => common.calculate_checksum,
        retry_read_backoff: i64 => common.retry_read_backoff,
        retry_read_multiplier: f64 => common.retry_read_multiplier,
        retry_read_max_attempts: u32 => common.retry_read_max_attempts,
    }
}

partial_group! {
    pub struct PartialGcpStorage => GcpStorage {
        key_file: String => key_file,
        bucket_name: String => bucket_name,
        endpoint_override: String => endpoint,
        retry_max_attempts: i64 => retry_max_attempts,
        retry_init_backoff: i64 => retry_backoff,
        retry_max_backoff: i64 => retry_backoff_max,
        retry_backoff_multiplier: f64 => retry_backoff_multiplier,
        chunk_size: i64 => chunk_size,
        upload_concurrency: i64 => upload_concurrency,
        max_conns_per_host: i64 => common.max_conns_per_host,
        request_timeout: i64 => common.request_timeout,
        calculate_checksum: bool => common.calculate_checksum,
        retry_read_backoff: i64 => common.retry_read_backoff,
        retry_read_multiplier: f64 => common.retry_read_multiplier,
        retry_read_max_attempts: u32 => common.retry_read_max_attempts,
    }
}

partial_group! {
    pub struct PartialAzureBlob => AzureBlob {
        account_name: String => account_name,
        account_key: String => account_key,
        tenant_id: String => tenant_id,
        client_id: String => client_id,
        client_secret: String => client_secret,
        endpoint_override: String => endpoint,
        container_name: String => container_name,
        access_tier: String => access_tier,
        rehydrate_poll_duration: i64 => restore_poll_duration,
        retry_max_attempts: i64 => retry_max_attempts,
        retry_delay: i64 => retry_delay,
        retry_max_delay: i64 => retry_max_delay,
        block_size: i64 => block_size,
        upload_concurrency: i64 => upload_concurrency,
        max_conns_per_host: i64 => common.max_conns_per_host,
        request_timeout: i64 => common.request_timeout,
        calculate_checksum: bool => common.calculate_checksum,
        retry_read_backoff: i64 => common.retry_read_backoff,
        retry_read_multiplier: f64 => common.retry_read_multiplier,
        retry_read_max_attempts: u32 => common.retry_read_max_attempts,
    }
}

partial_group! {
    pub struct PartialLocal => Local {
        buffer_size: i64 => buffer_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{defaults::Defaults, partial::parse_str};

    #[test]
    fn s3_section_resolves_shared_knobs() {
        let defaults = Defaults::new();
        let cfg = parse_str(
            "aws:\n  s3:\n    bucket-name: backups\n    endpoint-override: http://minio:9000\n    max-conns-per-host: 16\n",
        )
        .unwrap();

        let s3 = cfg.aws_s3().cloned().unwrap().resolve(&defaults.aws_s3);
        assert_eq!(s3.bucket_name, "backups");
        assert_eq!(s3.endpoint, "http://minio:9000");
        assert_eq!(s3.common.max_conns_per_host, 16);
        assert_eq!(s3.chunk_size, defaults.aws_s3.chunk_size);
        assert!(s3.is_configured());
    }

    #[test]
    fn azure_poll_duration_key() {
        let cfg = parse_str("azure:\n  blob:\n    rehydrate-poll-duration: 1000\n").unwrap();
        let azure = cfg.azure_blob().cloned().unwrap().resolve(&Defaults::new().azure_blob);
        assert_eq!(azure.restore_poll_duration, 1000);
        assert!(!azure.is_configured());
    }
}
