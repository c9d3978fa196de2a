//! Command-line interface definition.
//!
//! All argument parsing lives here so the rest of the codebase can stay
//! agnostic to `clap`.  Every option is an `Option<T>`: `None` means the flag
//! was not passed, which is what lets a value from the config file survive
//! when the flag is omitted.  Each argument group converts into the matching
//! `Partial*` value from [`crate::partial`], so the command line and the
//! config file are merged with the same overlay.
//!
//! Boolean switches take an optional value: `--compact` and
//! `--compact=false` both work.

pub mod backup;
pub mod cluster;
pub mod policy;
pub mod restore;
pub mod storage;

use std::path::PathBuf;

use clap::{Args, Parser};

pub use backup::BackupArgs;
pub use restore::RestoreArgs;

use crate::partial::PartialApp;

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name    = "backupctl",
    about   = "Configure and launch database backups and restores",
    version,
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    #[command(flatten)]
    pub app: AppArgs,

    /// Backup engine executable.  Looked up on `PATH` unless it contains a
    /// slash.
    #[arg(long, global = true, env = "BACKUPCTL_ENGINE", default_value = "backup-engine")]
    pub engine: String,

    /// Print the assembled engine configuration as JSON and exit without
    /// running the engine.
    #[arg(long, global = true)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum Subcommand {
    /// Back up a namespace, either by scanning it or from the change feed
    /// (`--xdr`).
    Backup(BackupArgs),

    /// Restore backup files into a namespace.
    Restore(RestoreArgs),
}

/// Application flags, accepted before or after the subcommand.
#[derive(Args, Debug, Default)]
pub struct AppArgs {
    /// YAML config file.  Flags passed on the command line override its
    /// values.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at `--log-level` instead of `info`.
    #[arg(
        short,
        long,
        global = true,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub verbose: Option<bool>,

    /// One of debug, info, warn, error.  Only used with `--verbose`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        default_missing_value = "true",
        require_equals = true
    )]
    pub log_json: Option<bool>,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<String>,
}

impl AppArgs {
    pub fn to_partial(&self) -> PartialApp {
        PartialApp {
            verbose: self.verbose,
            log_level: self.log_level.clone(),
            log_json: self.log_json,
            log_file: self.log_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("backupctl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn omitted_flags_are_none() {
        let cli = parse(&["backup"]);
        assert_eq!(cli.app.to_partial(), PartialApp::default());
        assert!(cli.app.config.is_none());
        assert!(!cli.print_config);
    }

    #[test]
    fn boolean_flags_accept_optional_value() {
        let cli = parse(&["-v", "--log-json=false", "backup"]);
        assert_eq!(cli.app.verbose, Some(true));
        assert_eq!(cli.app.log_json, Some(false));
    }

    #[test]
    fn app_flags_are_global() {
        let cli = parse(&["restore", "--log-level", "warn", "--print-config"]);
        assert_eq!(cli.app.log_level.as_deref(), Some("warn"));
        assert!(cli.print_config);
        assert!(matches!(cli.command, Subcommand::Restore(_)));
    }

    #[test]
    fn engine_flag_overrides_default() {
        let cli = parse(&["--engine", "/opt/engine", "backup"]);
        assert_eq!(cli.engine, "/opt/engine");
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["backupctl"]).is_err());
    }
}
