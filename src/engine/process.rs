//! Hand-off to the engine executable.
//!
//! The engine reads one JSON document on stdin and does the actual work.
//! Everything here is synchronous: spawn, write the payload, wait.

use std::{
    io::{ErrorKind, Write},
    process::{Command, Stdio},
};

use anyhow::{Context, Result};
use serde::Serialize;

/// What a finished engine process left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Serialise a job (or any engine input) as the JSON payload.
pub fn encode<T: Serialize>(payload: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(payload).context("failed to encode engine input")
}

/// Run `args`, feeding `input` on stdin and capturing stdout and stderr.
///
/// A process that exits without reading all of its input is not an error in
/// itself; its exit status decides.
pub fn run_captured(args: &[String], input: &[u8]) -> Result<Captured> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;

    let mut child = Command::new(prog)
        .args(rest)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn: {}", args.join(" ")))?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(input) {
            Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                return Err(e).context("failed to write engine input");
            },
            _ => {},
        }
    }

    let output = child
        .wait_with_output()
        .with_context(|| format!("failed to wait for: {}", args.join(" ")))?;

    Ok(Captured {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Run `args` with `input` on stdin, letting it write straight to our stdout
/// and stderr.  Used when the backup itself goes to stdout.
pub fn run_inherited(args: &[String], input: &[u8]) -> Result<bool> {
    let (prog, rest) = args.split_first().context("cannot run an empty command")?;

    let mut child = Command::new(prog)
        .args(rest)
        .stdin(Stdio::piped())
        .spawn()
        .with_context(|| format!("failed to spawn: {}", args.join(" ")))?;

    if let Some(mut stdin) = child.stdin.take() {
        match stdin.write_all(input) {
            Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                return Err(e).context("failed to write engine input");
            },
            _ => {},
        }
    }

    let status = child
        .wait()
        .with_context(|| format!("failed to wait for: {}", args.join(" ")))?;

    Ok(status.success())
}
