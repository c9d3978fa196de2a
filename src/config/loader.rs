//! Turn the merged file + flag partials into validated service configs.
//!
//! ```text
//! load_file(--config) ── merge(flags) ── backup_service / restore_service
//!                                            │
//!                           resolve secrets ─┴─ validate
//! ```
//!
//! Secrets are resolved after the merge and before validation, so a
//! `secrets:` reference can stand in for any value a validator looks at.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use super::{BackupServiceConfig, RestoreServiceConfig};
use crate::{
    defaults::Defaults,
    error::ValidationError,
    models::{App, Validate},
    partial::{PartialConfig, parse_partial},
    secrets::{SecretResolver, resolve_fields},
};

/// Read the `--config` file, or an empty config when none was given.
///
/// A path that was given but does not exist is an error.
pub fn load_file(path: Option<&Path>) -> Result<PartialConfig> {
    let Some(path) = path else {
        return Ok(PartialConfig::default());
    };

    parse_partial(path)?.with_context(|| format!("config file not found: {}", path.display()))
}

/// Resolve and validate the `app` group.  Runs before logging is set up.
pub fn resolve_app(
    cfg: &PartialConfig,
    config_path: Option<&Path>,
    defaults: &Defaults,
) -> Result<App, ValidationError> {
    let mut app = cfg.app.clone().unwrap_or_default().resolve(&defaults.app);
    if let Some(path) = config_path {
        app.config_path = path.display().to_string();
    }

    app.validate()?;
    Ok(app)
}

/// Resolve the groups a backup uses.  An `xdr` section selects a change-feed
/// backup, which rejects scan-only options and takes the shared ones from the
/// `backup` section.
pub fn backup_service(
    cfg: PartialConfig,
    defaults: &Defaults,
) -> Result<BackupServiceConfig, ValidationError> {
    let aws_s3 = cfg.aws_s3().cloned().unwrap_or_default().resolve(&defaults.aws_s3);
    let gcp_storage = cfg
        .gcp_storage()
        .cloned()
        .unwrap_or_default()
        .resolve(&defaults.gcp_storage);
    let azure_blob = cfg
        .azure_blob()
        .cloned()
        .unwrap_or_default()
        .resolve(&defaults.azure_blob);
    let scan = cfg.backup.unwrap_or_default();

    let (backup, xdr) = match cfg.xdr {
        Some(xdr) => {
            if let Some(&option) = scan.scan_only_options().first() {
                return Err(ValidationError::UnsupportedForXdr { option });
            }
            (None, Some(xdr.inherit(&scan).resolve(&defaults.xdr)))
        },
        None => (Some(scan.resolve(&defaults.backup)), None),
    };

    Ok(BackupServiceConfig {
        cluster: cfg.cluster.unwrap_or_default().resolve(&defaults.cluster),
        backup,
        xdr,
        compression: cfg
            .compression
            .unwrap_or_default()
            .resolve(&defaults.compression),
        encryption: cfg
            .encryption
            .unwrap_or_default()
            .resolve(&defaults.encryption),
        secret_agent: cfg
            .secret_agent
            .unwrap_or_default()
            .resolve(&defaults.secret_agent),
        aws_s3,
        gcp_storage,
        azure_blob,
        local: cfg.local.unwrap_or_default().resolve(&defaults.local),
    })
}

/// Resolve the groups a restore uses.  Backup-only sections are ignored.
pub fn restore_service(cfg: PartialConfig, defaults: &Defaults) -> RestoreServiceConfig {
    let aws_s3 = cfg.aws_s3().cloned().unwrap_or_default().resolve(&defaults.aws_s3);
    let gcp_storage = cfg
        .gcp_storage()
        .cloned()
        .unwrap_or_default()
        .resolve(&defaults.gcp_storage);
    let azure_blob = cfg
        .azure_blob()
        .cloned()
        .unwrap_or_default()
        .resolve(&defaults.azure_blob);

    RestoreServiceConfig {
        cluster: cfg.cluster.unwrap_or_default().resolve(&defaults.cluster),
        restore: cfg.restore.unwrap_or_default().resolve(&defaults.restore),
        compression: cfg
            .compression
            .unwrap_or_default()
            .resolve(&defaults.compression),
        encryption: cfg
            .encryption
            .unwrap_or_default()
            .resolve(&defaults.encryption),
        secret_agent: cfg
            .secret_agent
            .unwrap_or_default()
            .resolve(&defaults.secret_agent),
        aws_s3,
        gcp_storage,
        azure_blob,
        local: cfg.local.unwrap_or_default().resolve(&defaults.local),
    }
}

/// Resolve, fill secrets and validate everything a backup needs.
pub fn load_backup(
    cfg: PartialConfig,
    defaults: &Defaults,
    resolver: &dyn SecretResolver,
) -> Result<BackupServiceConfig> {
    let mut service = backup_service(cfg, defaults).context("invalid configuration")?;

    let agent = service.secret_agent.config();
    resolve_fields(service.secret_fields(), agent.as_ref(), resolver)?;

    service.validate().context("invalid configuration")?;
    debug!(xdr = service.is_xdr(), "backup configuration validated");

    Ok(service)
}

/// Resolve, fill secrets and validate everything a restore needs.
pub fn load_restore(
    cfg: PartialConfig,
    defaults: &Defaults,
    resolver: &dyn SecretResolver,
) -> Result<RestoreServiceConfig> {
    let mut service = restore_service(cfg, defaults);

    let agent = service.secret_agent.config();
    resolve_fields(service.secret_fields(), agent.as_ref(), resolver)?;

    service.validate().context("invalid configuration")?;
    debug!("restore configuration validated");

    Ok(service)
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, io::Write};

    use super::*;
    use crate::{engine::SecretAgentConfig, partial::parse_str};

    /// Resolves every reference to `resolved-<reference>`.
    #[derive(Default)]
    struct EchoResolver {
        calls: Cell<usize>,
    }

    impl SecretResolver for EchoResolver {
        fn resolve(&self, _agent: &SecretAgentConfig, reference: &str) -> Result<String> {
            self.calls.set(self.calls.get() + 1);
            Ok(format!("resolved-{reference}"))
        }
    }

    fn yaml(text: &str) -> PartialConfig {
        parse_str(text).unwrap()
    }

    // ── load_file ─────────────────────────────────────────────────────────────

    #[test]
    fn no_config_flag_is_empty_config() {
        assert_eq!(load_file(None).unwrap(), PartialConfig::default());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let path = Path::new("/tmp/this-file-should-never-exist-91bc.yaml");
        let err = load_file(Some(path)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "config file not found: /tmp/this-file-should-never-exist-91bc.yaml"
        );
    }

    #[test]
    fn config_file_is_read() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "cluster:\n  host: 10.0.0.9\n").unwrap();

        let cfg = load_file(Some(f.path())).unwrap();
        assert_eq!(cfg.cluster.unwrap().host.as_deref(), Some("10.0.0.9"));
    }

    // ── resolve_app ───────────────────────────────────────────────────────────

    #[test]
    fn app_defaults_and_config_path() {
        let d = Defaults::new();
        let app = resolve_app(&PartialConfig::default(), Some(Path::new("/etc/b.yaml")), &d).unwrap();
        assert_eq!(app.log_level, d.app.log_level);
        assert_eq!(app.config_path, "/etc/b.yaml");
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let err = resolve_app(&yaml("app:\n  log-level: loud\n"), None, &Defaults::new()).unwrap_err();
        assert_eq!(err.to_string(), "unsupported log level: loud");
    }

    // ── backup_service ────────────────────────────────────────────────────────

    #[test]
    fn file_values_survive_omitted_flags() {
        let d = Defaults::new();
        let file = yaml("backup:\n  namespace: test\n  parallel: 3\n");
        let flags = yaml("backup:\n  directory: /b\n");

        let service = backup_service(file.merge(flags), &d).unwrap();
        let backup = service.backup.unwrap();
        assert_eq!(backup.common.namespace, "test");
        assert_eq!(backup.common.parallel, 3);
        assert_eq!(backup.common.directory, "/b");
        assert_eq!(backup.compact, d.backup.compact);
        assert!(service.xdr.is_none());
    }

    #[test]
    fn flag_beats_file() {
        let file = yaml("cluster:\n  port: 3000\n");
        let flags = yaml("cluster:\n  port: 4000\n");

        let service = backup_service(file.merge(flags), &Defaults::new()).unwrap();
        assert_eq!(service.cluster.port, 4000);
    }

    #[test]
    fn xdr_section_selects_change_feed() {
        let cfg = yaml(
            "backup:\n  namespace: test\n  directory: /b\n  file-limit: 5\nxdr:\n  dc: dc1\n",
        );

        let service = backup_service(cfg, &Defaults::new()).unwrap();
        assert!(service.backup.is_none());
        let xdr = service.xdr.unwrap();
        assert_eq!(xdr.namespace, "test");
        assert_eq!(xdr.directory, "/b");
        assert_eq!(xdr.file_limit, 5);
        assert_eq!(xdr.dc, "dc1");
    }

    #[test]
    fn scan_only_option_is_rejected_for_xdr() {
        let cfg = yaml("backup:\n  namespace: test\n  node-list: a:3000\nxdr:\n  dc: dc1\n");
        let err = backup_service(cfg, &Defaults::new()).unwrap_err();
        assert_eq!(err.to_string(), "node-list is not supported for xdr backup");
    }

    #[test]
    fn storage_sections_resolve() {
        let cfg = yaml("aws:\n  s3:\n    bucket-name: b\nlocal:\n  buffer-size: 7\n");
        let service = backup_service(cfg, &Defaults::new()).unwrap();
        assert_eq!(service.aws_s3.bucket_name, "b");
        assert_eq!(service.local.buffer_size, 7);
    }

    // ── load_backup / load_restore ────────────────────────────────────────────

    #[test]
    fn load_backup_validates() {
        let err = load_backup(yaml("backup:\n  directory: /b\n"), &Defaults::new(), &EchoResolver::default())
            .unwrap_err();
        assert_eq!(format!("{err:#}"), "invalid configuration: namespace is required");
    }

    #[test]
    fn load_backup_resolves_secrets_before_validation() {
        let resolver = EchoResolver::default();
        let cfg = yaml(
            "cluster:\n  password: secrets:db:pw\nbackup:\n  namespace: test\n  directory: /b\nsecret-agent:\n  address: 127.0.0.1\n",
        );

        let service = load_backup(cfg, &Defaults::new(), &resolver).unwrap();
        assert_eq!(service.cluster.password, "resolved-secrets:db:pw");
        assert_eq!(resolver.calls.get(), 1);
    }

    #[test]
    fn secret_without_agent_fails() {
        let cfg = yaml("cluster:\n  user: secrets:db:user\nbackup:\n  namespace: test\n  directory: /b\n");
        let err = load_backup(cfg, &Defaults::new(), &EchoResolver::default()).unwrap_err();
        assert!(format!("{err:#}").ends_with("secret agent is not configured"), "{err:#}");
    }

    #[test]
    fn load_restore_ignores_backup_sections() {
        let cfg = yaml(
            "backup:\n  namespace: ignored\nrestore:\n  namespace: test\n  directory: /b\n",
        );

        let service = load_restore(cfg, &Defaults::new(), &EchoResolver::default()).unwrap();
        assert_eq!(service.restore.common.namespace, "test");
    }

    #[test]
    fn load_restore_requires_input() {
        let err = load_restore(yaml("restore:\n  namespace: test\n"), &Defaults::new(), &EchoResolver::default())
            .unwrap_err();
        assert_eq!(format!("{err:#}"), "invalid configuration: input file or directory required");
    }
}
