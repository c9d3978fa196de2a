//! Checks that span more than one storage group.

use crate::{
    error::ValidationError,
    models::{AwsS3, AzureBlob, GcpStorage, Local},
};

/// Validate the storage groups and make sure at most one cloud backend is
/// configured.
///
/// Local storage is always validated.  A cloud backend is validated, and
/// counted, only when one of its identifying fields is set.
pub fn validate_storages(
    is_backup: bool,
    aws_s3: Option<&AwsS3>,
    gcp_storage: Option<&GcpStorage>,
    azure_blob: Option<&AzureBlob>,
    local: Option<&Local>,
) -> Result<(), ValidationError> {
    if let Some(local) = local {
        local
            .validate(is_backup)
            .map_err(|e| ValidationError::storage("local storage", e))?;
    }

    let mut configured = 0;

    if let Some(s3) = aws_s3.filter(|s| s.is_configured()) {
        s3.validate(is_backup)
            .map_err(|e| ValidationError::storage("aws s3", e))?;
        configured += 1;
    }

    if let Some(gcp) = gcp_storage.filter(|g| g.is_configured()) {
        gcp.validate(is_backup)
            .map_err(|e| ValidationError::storage("gcp storage", e))?;
        configured += 1;
    }

    if let Some(azure) = azure_blob.filter(|a| a.is_configured()) {
        azure
            .validate(is_backup)
            .map_err(|e| ValidationError::storage("azure blob", e))?;
        configured += 1;
    }

    if configured > 1 {
        return Err(ValidationError::MultipleCloudProviders);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::Defaults;

    fn s3() -> AwsS3 {
        AwsS3 {
            bucket_name: "backups".into(),
            ..Defaults::new().aws_s3
        }
    }

    fn azure() -> AzureBlob {
        AzureBlob {
            container_name: "backups".into(),
            ..Defaults::new().azure_blob
        }
    }

    #[test]
    fn nothing_configured_is_valid() {
        assert!(validate_storages(true, None, None, None, None).is_ok());
    }

    #[test]
    fn unconfigured_cloud_groups_are_not_validated() {
        let defaults = Defaults::new();
        let result = validate_storages(
            true,
            Some(&defaults.aws_s3),
            Some(&defaults.gcp_storage),
            Some(&defaults.azure_blob),
            Some(&defaults.local),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn two_cloud_providers_are_rejected() {
        let err = validate_storages(true, Some(&s3()), None, Some(&azure()), None).unwrap_err();
        assert_eq!(err.to_string(), "only one cloud provider can be configured");
    }

    #[test]
    fn local_plus_one_cloud_is_valid() {
        let local = Defaults::new().local;
        assert!(validate_storages(false, Some(&s3()), None, None, Some(&local)).is_ok());
    }

    #[test]
    fn provider_failure_names_the_provider() {
        let broken = AzureBlob {
            account_name: "acct".into(),
            ..Defaults::new().azure_blob
        };
        let err = validate_storages(true, None, None, Some(&broken), None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "failed to validate azure blob: container name is required"
        );
    }

    #[test]
    fn negative_local_buffer_is_rejected() {
        let local = Local { buffer_size: -1 };
        let err = validate_storages(true, None, None, None, Some(&local)).unwrap_err();
        assert!(err.to_string().starts_with("failed to validate local storage"), "{err}");
    }
}
