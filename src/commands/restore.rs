//! `backupctl restore`.

use anyhow::Result;

use super::{Output, execute};
use crate::{
    cli::{Cli, RestoreArgs},
    config::loader::load_restore,
    defaults::Defaults,
    partial::PartialConfig,
    runner::Operation,
    secrets::ProcessResolver,
};

/// Overlay the restore flags on `cfg` (file + app flags) and run the stages.
pub fn run(cli: &Cli, args: &RestoreArgs, cfg: PartialConfig, defaults: &Defaults) -> Result<()> {
    let resolver = ProcessResolver::new(cli.engine.as_str());
    let job = load_restore(cfg.merge(args.to_partial()), defaults, &resolver)
        .and_then(|service| service.job());

    execute(
        Operation::Restore,
        &cli.engine,
        cli.print_config,
        job,
        Output::Captured,
    )
}
