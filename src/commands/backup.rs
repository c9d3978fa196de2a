//! `backupctl backup`: scan or change-feed backup.

use anyhow::Result;

use super::{Output, execute};
use crate::{
    cli::{BackupArgs, Cli},
    config::loader::load_backup,
    defaults::Defaults,
    partial::PartialConfig,
    runner::Operation,
    secrets::ProcessResolver,
};

/// Overlay the backup flags on `cfg` (file + app flags) and run the stages.
pub fn run(cli: &Cli, args: &BackupArgs, cfg: PartialConfig, defaults: &Defaults) -> Result<()> {
    let resolver = ProcessResolver::new(cli.engine.as_str());
    let service = load_backup(cfg.merge(args.to_partial()), defaults, &resolver);

    // Nothing but the backup may reach stdout.
    let output = match &service {
        Ok(service) if service.is_stdout() => Output::Inherited,
        _ => Output::Captured,
    };

    let job = service.and_then(|service| service.job());
    execute(Operation::Backup, &cli.engine, cli.print_config, job, output)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::{cli::Subcommand, partial::parse_str};

    fn run_with(args: &[&str], yaml: &str) -> Result<()> {
        let cli = Cli::try_parse_from(
            ["backupctl", "--engine", "/nonexistent/engine", "--print-config", "backup"]
                .into_iter()
                .chain(args.iter().copied()),
        )
        .unwrap();
        let Subcommand::Backup(args) = &cli.command else {
            unreachable!()
        };

        run(&cli, args, parse_str(yaml).unwrap(), &Defaults::new())
    }

    #[test]
    fn flags_alone_configure_a_backup() {
        run_with(&["-n", "test", "-d", "/backups"], "").unwrap();
    }

    #[test]
    fn file_supplies_missing_options() {
        run_with(&["-d", "/backups"], "backup:\n  namespace: test\n").unwrap();
    }

    #[test]
    fn validation_error_surfaces() {
        let err = run_with(&["-n", "test"], "").unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "invalid configuration: must specify either estimate, output-file or directory"
        );
    }

    #[test]
    fn xdr_flag_with_scan_option_is_rejected() {
        let err = run_with(&["-n", "test", "-d", "/b", "--xdr", "--estimate"], "").unwrap_err();
        assert_eq!(
            format!("{err:#}"),
            "invalid configuration: estimate is not supported for xdr backup"
        );
    }
}
