//! Terminal UI: spinners, stage lines and replay of engine output.
//!
//! - While the engine runs the user sees a spinner and a short label; its
//!   output is captured and hidden.
//! - If a stage fails, the captured stdout *and* stderr are printed in full
//!   so the operator can diagnose the problem without re-running manually.
//! - [`StageOutcome`] is plain data, so stage logic is testable without a
//!   terminal.

use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::engine::process::{self, Captured};

// ─── Icons ───────────────────────────────────────────────────────────────────

static SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

fn icon_ok() -> console::StyledObject<&'static str> {
    style("✓").green().bold()
}

fn icon_err() -> console::StyledObject<&'static str> {
    style("✗").red().bold()
}

fn icon_done() -> console::StyledObject<&'static str> {
    style("✓").cyan().bold()
}

// ─── Stage result ─────────────────────────────────────────────────────────────

/// The outcome of one stage (`Configure`, `Engine`).
#[derive(Debug)]
pub struct StageOutcome {
    pub label: String,
    pub success: bool,
    /// Captured engine stdout; empty for stages that run no process.
    pub stdout: String,
    pub stderr: String,
    pub error: Option<String>,
}

impl StageOutcome {
    /// Print the one-line summary (✓/✗ + label).
    ///
    /// On failure, also prints the error and the captured output.
    pub fn print(&self) {
        if self.success {
            println!("  {}  {}", icon_ok(), style(&self.label).bold());
            return;
        }

        println!("  {}  {}", icon_err(), style(&self.label).bold());

        if let Some(ref msg) = self.error {
            eprintln!();
            eprintln!("  {} {}", style("Error:").red().bold(), msg);
        }

        if !self.stdout.is_empty() {
            eprintln!();
            eprintln!("  {} stdout:", style("►").dim());
            for line in self.stdout.lines() {
                eprintln!("    {line}");
            }
        }
        if !self.stderr.is_empty() {
            eprintln!();
            eprintln!("  {} stderr:", style("►").dim());
            for line in self.stderr.lines() {
                eprintln!("    {line}");
            }
        }
    }

    pub const fn failed(&self) -> bool {
        !self.success
    }
}

// ─── Spinner ──────────────────────────────────────────────────────────────────

fn make_spinner(label: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::with_template("  {spinner:.cyan}  {msg}") {
        pb.set_style(template.tick_chars(SPINNER_CHARS));
    }
    pb.set_message(format!("{}", style(label).dim()));
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

// ─── Stages ───────────────────────────────────────────────────────────────────

/// Run `args` behind a spinner with `input` on stdin.
///
/// The spinner is cleared before the outcome is returned, so the terminal
/// always shows a clean, static line once the stage finishes.
pub fn run_stage(label: &str, args: &[String], input: &[u8]) -> StageOutcome {
    let spinner = make_spinner(label);
    let result = process::run_captured(args, input);
    spinner.finish_and_clear();

    match result {
        Ok(Captured {
            success: true,
            stdout,
            stderr,
        }) => StageOutcome {
            label: label.to_string(),
            success: true,
            stdout,
            stderr,
            error: None,
        },
        Ok(Captured {
            success: false,
            stdout,
            stderr,
        }) => StageOutcome {
            label: label.to_string(),
            success: false,
            stdout,
            stderr,
            error: Some(format!("command exited non-zero: {}", args.join(" "))),
        },
        Err(e) => failed_stage(label, &e),
    }
}

/// A stage that ran in-process and succeeded.
pub fn completed_stage(label: &str) -> StageOutcome {
    StageOutcome {
        label: label.to_string(),
        success: true,
        stdout: String::new(),
        stderr: String::new(),
        error: None,
    }
}

/// A stage that ran in-process and failed with `err`.  The whole error chain
/// is kept.
pub fn failed_stage(label: &str, err: &anyhow::Error) -> StageOutcome {
    StageOutcome {
        label: label.to_string(),
        success: false,
        stdout: String::new(),
        stderr: String::new(),
        error: Some(format!("{err:#}")),
    }
}

// ─── Summary banner ───────────────────────────────────────────────────────────

/// Print the final banner: success, or the list of failed stages.
pub fn print_summary(operation: &str, outcomes: &[StageOutcome]) {
    let failed: Vec<&StageOutcome> = outcomes.iter().filter(|o| o.failed()).collect();
    println!();
    if failed.is_empty() {
        println!(
            "  {} {}",
            icon_done(),
            style(format!("{} completed successfully.", capitalize(operation)))
                .cyan()
                .bold()
        );
    } else {
        eprintln!(
            "  {}  {}",
            icon_err(),
            style(format!("{} failed.", capitalize(operation))).red().bold()
        );
        for o in &failed {
            eprintln!("    {} {}", icon_err(), style(&o.label).red());
        }
    }
    println!();
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".into(), "-c".into(), script.into()]
    }

    #[test]
    fn completed_stage_is_not_failed() {
        let o = completed_stage("Configure");
        assert!(!o.failed());
        assert_eq!(o.label, "Configure");
    }

    #[test]
    fn failed_stage_keeps_the_chain() {
        let err = anyhow::anyhow!("namespace is required").context("invalid configuration");
        let o = failed_stage("Configure", &err);
        assert!(o.failed());
        assert_eq!(
            o.error.as_deref(),
            Some("invalid configuration: namespace is required")
        );
    }

    #[test]
    fn run_stage_success() {
        let o = run_stage("Engine", &sh("cat >/dev/null"), b"{}");
        assert!(o.success);
        assert!(o.error.is_none());
    }

    #[test]
    fn run_stage_failure_keeps_output() {
        let o = run_stage("Engine", &sh("echo bad output; exit 1"), b"");
        assert!(!o.success);
        assert!(o.stdout.contains("bad output"));
        assert!(o.error.unwrap().starts_with("command exited non-zero"));
    }

    #[test]
    fn run_stage_spawn_failure() {
        let o = run_stage("Engine", &["/nonexistent/engine".into()], b"");
        assert!(o.failed());
        assert!(o.error.unwrap().starts_with("failed to spawn"));
    }

    #[test]
    fn capitalize_words() {
        assert_eq!(capitalize("backup"), "Backup");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn summary_smoke() {
        print_summary("backup", &[completed_stage("Configure"), completed_stage("Engine")]);
        print_summary("restore", &[
            completed_stage("Configure"),
            failed_stage("Engine", &anyhow::anyhow!("boom")),
        ]);
    }
}
