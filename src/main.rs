//! `backupctl`: configure database backups and restores from flags and a
//! YAML file, then hand them to the backup engine.
//!
//! # Overview
//!
//! This binary is the configuration front-end of a backup engine.  It merges
//! command-line flags, an optional YAML file and built-in defaults (in that
//! order of precedence), resolves `secrets:` references, validates the
//! result, assembles the engine configuration and writes it as JSON to the
//! engine's stdin.
//!
//! # Usage
//!
//! ```text
//! backupctl backup -n test -d /backups/test          # scan backup
//! backupctl backup --xdr -n test -d /b --dc dc1      # change-feed backup
//! backupctl restore -n test -d /backups/test
//! backupctl --config backup.yaml backup --print-config
//! ```
//!
//! # Module layout
//!
//! | Module                   | Responsibility                               |
//! |--------------------------|----------------------------------------------|
//! | [`cli`]                  | Argument types parsed by clap                |
//! | [`partial`]              | `Option`-per-field groups + YAML loader      |
//! | [`defaults`]             | Built-in option values                       |
//! | [`models`]               | Resolved option groups + validation          |
//! | [`config`]               | Service configs, loading, assembly           |
//! | [`engine`]               | Engine configuration types + process hand-off |
//! | [`secrets`]              | `secrets:` reference resolution              |
//! | [`runner`]               | Engine argument construction                 |
//! | [`logging`]              | tracing subscriber setup                     |
//! | [`ui`]                   | Spinner, stage output, summary               |
//! | [`commands`]             | `backup` and `restore` handlers              |

mod cli;
mod commands;
mod config;
mod defaults;
mod engine;
mod error;
mod logging;
mod models;
mod partial;
mod runner;
mod secrets;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Subcommand};
use config::loader::{load_file, resolve_app};
use defaults::Defaults;
use logging::LogConfig;
use partial::PartialConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let defaults = Defaults::new();

    let config_path = cli.app.config.as_deref();
    let cfg = load_file(config_path)?.merge(PartialConfig {
        app: Some(cli.app.to_partial()),
        ..PartialConfig::default()
    });

    let app = resolve_app(&cfg, config_path, &defaults).context("invalid configuration")?;
    logging::init(&LogConfig::from(&app))?;

    match &cli.command {
        // ── backupctl backup ──────────────────────────────────────────────────
        Subcommand::Backup(args) => commands::backup::run(&cli, args, cfg, &defaults),

        // ── backupctl restore ─────────────────────────────────────────────────
        Subcommand::Restore(args) => commands::restore::run(&cli, args, cfg, &defaults),
    }
}
