//! Engine command-line construction.
//!
//! This module only *builds* argument lists.  Execution lives in
//! [`crate::engine::process`] and [`crate::ui`], so every function here is
//! pure and unit-testable without spawning anything.

/// The engine operation a job is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Backup,
    Restore,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Backup => "backup",
            Self::Restore => "restore",
        }
    }
}

/// `<engine> backup` or `<engine> restore`.  The job itself goes to stdin.
pub fn engine_command(engine: &str, operation: Operation) -> Vec<String> {
    vec![engine.into(), operation.as_str().into()]
}

/// `<engine> resolve-secret <reference>`.  The secret agent configuration
/// goes to stdin.
pub fn resolve_secret_command(engine: &str, reference: &str) -> Vec<String> {
    vec![engine.into(), "resolve-secret".into(), reference.into()]
}
