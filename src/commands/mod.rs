//! Subcommand handlers.
//!
//! Each file in this module corresponds to one user-facing command:
//!
//! | File          | Invocation           | Description                      |
//! |---------------|----------------------|----------------------------------|
//! | `backup.rs`   | `backupctl backup`   | Scan or change-feed backup       |
//! | `restore.rs`  | `backupctl restore`  | Restore from files or directories |
//!
//! Both run the same two stages:
//!
//! | # | Stage     | Description                                         |
//! |---|-----------|-----------------------------------------------------|
//! | 1 | Configure | Merge, resolve secrets, validate, assemble the job  |
//! | 2 | Engine    | Hand the job to `<engine> backup|restore` on stdin  |

pub mod backup;
pub mod restore;

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::info;

use crate::{
    engine::process,
    runner::{Operation, engine_command},
    ui::{StageOutcome, completed_stage, failed_stage, print_summary, run_stage},
};

/// How the engine's output reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    /// Behind a spinner, replayed on failure.
    Captured,
    /// Straight through, with no UI at all.  The backup itself is on stdout.
    Inherited,
}

/// Run the stages for an already configured (or failed) job.
///
/// With `print_config` the job is printed as JSON and the engine is not run;
/// configuration errors are returned as-is in that case.
pub fn execute<J: Serialize>(
    operation: Operation,
    engine: &str,
    print_config: bool,
    job: Result<J>,
    output: Output,
) -> Result<()> {
    if print_config {
        println!("{}", serde_json::to_string_pretty(&job?)?);
        return Ok(());
    }

    if output == Output::Inherited {
        let payload = process::encode(&job?)?;
        info!(engine, operation = operation.as_str(), "starting engine");

        if !process::run_inherited(&engine_command(engine, operation), &payload)? {
            bail!("{} failed: engine exited non-zero", operation.as_str());
        }
        return Ok(());
    }

    println!();
    let mut outcomes: Vec<StageOutcome> = Vec::new();

    // 1. Configure
    let payload = job.and_then(|job| process::encode(&job));
    let configure = match &payload {
        Ok(_) => completed_stage("Configure"),
        Err(e) => failed_stage("Configure", e),
    };
    configure.print();
    outcomes.push(configure);

    let Ok(payload) = payload else {
        print_summary(operation.as_str(), &outcomes);
        bail!("{} aborted: invalid configuration", operation.as_str());
    };

    // 2. Engine
    info!(engine, operation = operation.as_str(), "starting engine");
    let run = run_stage("Engine", &engine_command(engine, operation), &payload);
    run.print();
    let failed = run.failed();
    outcomes.push(run);

    print_summary(operation.as_str(), &outcomes);

    if failed {
        bail!("{} failed: engine exited non-zero", operation.as_str());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[derive(Serialize)]
    struct Job {
        namespace: &'static str,
    }

    #[test]
    fn configuration_error_aborts_before_engine() {
        let err = execute::<Job>(
            Operation::Backup,
            "/nonexistent/engine",
            false,
            Err(anyhow!("namespace is required")),
            Output::Captured,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "backup aborted: invalid configuration");
    }

    #[test]
    fn print_config_returns_configuration_errors() {
        let err = execute::<Job>(
            Operation::Restore,
            "/nonexistent/engine",
            true,
            Err(anyhow!("input file or directory required")),
            Output::Captured,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "input file or directory required");
    }

    #[test]
    fn print_config_skips_engine() {
        execute(
            Operation::Backup,
            "/nonexistent/engine",
            true,
            Ok(Job { namespace: "test" }),
            Output::Captured,
        )
        .unwrap();
    }

    #[test]
    fn missing_engine_fails_the_engine_stage() {
        let err = execute(
            Operation::Backup,
            "/nonexistent/engine",
            false,
            Ok(Job { namespace: "test" }),
            Output::Captured,
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "backup failed: engine exited non-zero");
    }

    #[test]
    fn missing_engine_is_an_error_when_inherited() {
        let err = execute(
            Operation::Backup,
            "/nonexistent/engine",
            false,
            Ok(Job { namespace: "test" }),
            Output::Inherited,
        )
        .unwrap_err();

        assert!(err.to_string().starts_with("failed to spawn"), "{err}");
    }
}
