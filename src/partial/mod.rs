//! Partial option groups and the YAML file loader.
//!
//! A `Partial*` struct mirrors one model group with every field wrapped in
//! `Option`: `None` means "not set here".  Both the YAML file and the command
//! line produce partials, so precedence is a plain overlay:
//!
//! ```text
//! file.merge(flags).resolve(&defaults.backup)   // flag > file > default
//! ```
//!
//! # File format
//!
//! ```yaml
//! app:
//!   log-level: info
//! cluster:
//!   host: 10.0.0.1
//!   port: 3000
//! backup:
//!   namespace: test
//!   directory: /backups/test
//!   set-list: [set1, set2]     # or "set1,set2"
//! compression:
//!   mode: zstd
//! aws:
//!   s3:
//!     bucket-name: backups
//! ```
//!
//! Unknown keys are rejected.  Sections that don't apply to the running
//! command (`restore` during a backup, say) are parsed but ignored.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};

/// Declare a partial group: the struct, [`merge`](PartialBackup::merge) and
/// [`resolve`](PartialBackup::resolve).
///
/// Each field names the model path it resolves into, so nested models
/// (`common.namespace`) need no hand-written glue.
macro_rules! partial_group {
    (
        $(#[$meta:meta])*
        pub struct $name:ident => $model:ty {
            $(
                $(#[$field_meta:meta])*
                $field:ident: $ty:ty => $($path:ident).+
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
        #[serde(rename_all = "kebab-case", deny_unknown_fields)]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: Option<$ty>,
            )*
        }

        impl $name {
            /// Overlay `over` on `self`; fields set in `over` win.
            pub fn merge(self, over: Self) -> Self {
                Self {
                    $( $field: over.$field.or(self.$field), )*
                }
            }

            /// Fill every unset field from `defaults`.
            pub fn resolve(self, defaults: &$model) -> $model {
                let mut model = defaults.clone();
                $(
                    if let Some(value) = self.$field {
                        model.$($path).+ = value;
                    }
                )*
                model
            }
        }
    };
}

pub mod backup;
pub mod cluster;
pub mod policy;
pub mod restore;
pub mod storage;

pub use backup::{PartialBackup, PartialXdr};
pub use cluster::{PartialApp, PartialCluster};
pub use policy::{PartialCompression, PartialEncryption, PartialSecretAgent};
pub use restore::PartialRestore;
pub use storage::{PartialAwsS3, PartialAzureBlob, PartialGcpStorage, PartialLocal};

/// Root of the YAML config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialConfig {
    pub app: Option<PartialApp>,
    pub cluster: Option<PartialCluster>,
    pub backup: Option<PartialBackup>,
    /// Present only for change-feed backups.
    pub xdr: Option<PartialXdr>,
    pub restore: Option<PartialRestore>,
    pub compression: Option<PartialCompression>,
    pub encryption: Option<PartialEncryption>,
    pub secret_agent: Option<PartialSecretAgent>,
    pub aws: Option<AwsSection>,
    pub gcp: Option<GcpSection>,
    pub azure: Option<AzureSection>,
    pub local: Option<PartialLocal>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AwsSection {
    pub s3: Option<PartialAwsS3>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GcpSection {
    pub storage: Option<PartialGcpStorage>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AzureSection {
    pub blob: Option<PartialAzureBlob>,
}

/// Merge two optional sections; a section present on both sides is merged
/// field by field.
macro_rules! overlay {
    ($base:expr, $over:expr) => {
        match ($base, $over) {
            (Some(base), Some(over)) => Some(base.merge(over)),
            (base, over) => over.or(base),
        }
    };
}

impl AwsSection {
    fn merge(self, over: Self) -> Self {
        Self { s3: overlay!(self.s3, over.s3) }
    }
}

impl GcpSection {
    fn merge(self, over: Self) -> Self {
        Self { storage: overlay!(self.storage, over.storage) }
    }
}

impl AzureSection {
    fn merge(self, over: Self) -> Self {
        Self { blob: overlay!(self.blob, over.blob) }
    }
}

impl PartialConfig {
    /// Overlay `over` (usually the command line) on `self` (usually the
    /// file).
    pub fn merge(self, over: Self) -> Self {
        Self {
            app: overlay!(self.app, over.app),
            cluster: overlay!(self.cluster, over.cluster),
            backup: overlay!(self.backup, over.backup),
            xdr: overlay!(self.xdr, over.xdr),
            restore: overlay!(self.restore, over.restore),
            compression: overlay!(self.compression, over.compression),
            encryption: overlay!(self.encryption, over.encryption),
            secret_agent: overlay!(self.secret_agent, over.secret_agent),
            aws: overlay!(self.aws, over.aws),
            gcp: overlay!(self.gcp, over.gcp),
            azure: overlay!(self.azure, over.azure),
            local: overlay!(self.local, over.local),
        }
    }

    pub fn aws_s3(&self) -> Option<&PartialAwsS3> {
        self.aws.as_ref()?.s3.as_ref()
    }

    pub fn gcp_storage(&self) -> Option<&PartialGcpStorage> {
        self.gcp.as_ref()?.storage.as_ref()
    }

    pub fn azure_blob(&self) -> Option<&PartialAzureBlob> {
        self.azure.as_ref()?.blob.as_ref()
    }

    pub fn aws_s3_mut(&mut self) -> &mut PartialAwsS3 {
        self.aws
            .get_or_insert_with(Default::default)
            .s3
            .get_or_insert_with(Default::default)
    }

    pub fn gcp_storage_mut(&mut self) -> &mut PartialGcpStorage {
        self.gcp
            .get_or_insert_with(Default::default)
            .storage
            .get_or_insert_with(Default::default)
    }

    pub fn azure_blob_mut(&mut self) -> &mut PartialAzureBlob {
        self.azure
            .get_or_insert_with(Default::default)
            .blob
            .get_or_insert_with(Default::default)
    }
}

/// Parse `text` as a YAML config document.  An empty document is an empty
/// config.
pub fn parse_str(text: &str) -> Result<PartialConfig> {
    if text.trim().is_empty() {
        return Ok(PartialConfig::default());
    }

    Ok(serde_yaml::from_str(text)?)
}

/// Read and parse the config file at `path`.
///
/// Returns `Ok(None)` when the file does not exist, so the caller decides
/// whether a missing file is an error.
pub fn parse_partial(path: &Path) -> Result<Option<PartialConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    parse_str(&text)
        .with_context(|| format!("parsing {}", path.display()))
        .map(Some)
}

/// Accept a YAML list or a comma-separated string; store it comma-joined.
pub(crate) fn comma_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Item {
        Text(String),
        Number(i64),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List {
        Joined(Item),
        Items(Vec<Item>),
    }

    let text = |item: Item| match item {
        Item::Text(text) => text,
        Item::Number(n) => n.to_string(),
    };

    Ok(Option::<List>::deserialize(deserializer)?.map(|list| match list {
        List::Joined(joined) => text(joined),
        List::Items(items) => items.into_iter().map(text).collect::<Vec<_>>().join(","),
    }))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn empty_document_is_empty_config() {
        assert_eq!(parse_str("").unwrap(), PartialConfig::default());
        assert_eq!(parse_str("  \n").unwrap(), PartialConfig::default());
    }

    #[test]
    fn sections_are_optional() {
        let cfg = parse_str("cluster:\n  host: 10.0.0.1\n").unwrap();
        assert_eq!(cfg.cluster.unwrap().host.as_deref(), Some("10.0.0.1"));
        assert!(cfg.backup.is_none());
        assert!(cfg.xdr.is_none());
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let err = parse_str("bakcup:\n  namespace: test\n").unwrap_err();
        assert!(err.to_string().contains("unknown field"), "{err}");
    }

    #[test]
    fn unknown_nested_key_is_rejected() {
        assert!(parse_str("backup:\n  namespaces: test\n").is_err());
    }

    #[test]
    fn cloud_sections_are_nested() {
        let cfg = parse_str(
            "aws:\n  s3:\n    bucket-name: b\ngcp:\n  storage:\n    bucket-name: g\nazure:\n  blob:\n    container-name: c\n",
        )
        .unwrap();
        assert_eq!(cfg.aws_s3().unwrap().bucket_name.as_deref(), Some("b"));
        assert_eq!(cfg.gcp_storage().unwrap().bucket_name.as_deref(), Some("g"));
        assert_eq!(cfg.azure_blob().unwrap().container_name.as_deref(), Some("c"));
    }

    #[test]
    fn lists_accept_sequence_or_string() {
        let cfg = parse_str("backup:\n  set-list: [a, b, c]\n  bin-list: x,y\n").unwrap();
        let backup = cfg.backup.unwrap();
        assert_eq!(backup.set_list.as_deref(), Some("a,b,c"));
        assert_eq!(backup.bin_list.as_deref(), Some("x,y"));
    }

    #[test]
    fn numeric_lists_are_joined() {
        let cfg = parse_str("backup:\n  rack-list: [1, 2]\n  prefer-racks: 3\n").unwrap();
        let backup = cfg.backup.unwrap();
        assert_eq!(backup.rack_list.as_deref(), Some("1,2"));
        assert_eq!(backup.prefer_racks.as_deref(), Some("3"));
    }

    #[test]
    fn merge_overlays_sections_field_by_field() {
        let file = parse_str(
            "backup:\n  namespace: file-ns\n  parallel: 4\naws:\n  s3:\n    bucket-name: b\n",
        )
        .unwrap();
        let flags = parse_str("backup:\n  namespace: flag-ns\n").unwrap();

        let merged = file.merge(flags);
        let backup = merged.backup.as_ref().unwrap();
        assert_eq!(backup.namespace.as_deref(), Some("flag-ns"));
        assert_eq!(backup.parallel, Some(4));
        assert_eq!(merged.aws_s3().unwrap().bucket_name.as_deref(), Some("b"));
    }

    #[test]
    fn merge_keeps_sections_missing_from_overlay() {
        let file = parse_str("cluster:\n  host: h\n").unwrap();
        let merged = file.merge(PartialConfig::default());
        assert_eq!(merged.cluster.unwrap().host.as_deref(), Some("h"));
    }

    #[test]
    fn missing_file_is_none() {
        let path = Path::new("/tmp/this-file-should-never-exist-7f3a.yaml");
        assert!(parse_partial(path).unwrap().is_none());
    }

    #[test]
    fn parses_file_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "backup:\n  namespace: test\n  parallel: 4\n").unwrap();

        let cfg = parse_partial(f.path()).unwrap().unwrap();
        let backup = cfg.backup.unwrap();
        assert_eq!(backup.namespace.as_deref(), Some("test"));
        assert_eq!(backup.parallel, Some(4));
    }

    #[test]
    fn malformed_yaml_names_the_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "backup: [unclosed").unwrap();

        let err = parse_partial(f.path()).unwrap_err();
        assert!(err.to_string().starts_with("parsing "), "{err}");
    }
}
