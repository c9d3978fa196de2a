//! `secrets:` reference resolution.
//!
//! Any string option that may hold a credential can instead hold a reference
//! such as `secrets:resource:key`.  References are resolved once, after the
//! file and the command line are merged and before anything is validated.
//! Resolution itself is delegated: [`ProcessResolver`] asks the engine, which
//! talks to the secret agent.

use anyhow::{Context, Result, bail};

use crate::{
    engine::{SecretAgentConfig, process},
    runner,
};

/// Prefix marking a value as a secret agent reference.
pub const SECRET_PREFIX: &str = "secrets:";

pub trait SecretResolver {
    /// Resolve one `secrets:` reference through the agent described by
    /// `agent`.
    fn resolve(&self, agent: &SecretAgentConfig, reference: &str) -> Result<String>;
}

/// Resolves references with `<engine> resolve-secret <reference>`, passing the
/// agent configuration as JSON on stdin.
#[derive(Debug, Clone)]
pub struct ProcessResolver {
    engine: String,
}

impl ProcessResolver {
    pub fn new(engine: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
        }
    }
}

impl SecretResolver for ProcessResolver {
    fn resolve(&self, agent: &SecretAgentConfig, reference: &str) -> Result<String> {
        let args = runner::resolve_secret_command(&self.engine, reference);
        let input = process::encode(agent)?;
        let output = process::run_captured(&args, &input)?;

        if !output.success {
            bail!("secret agent lookup failed: {}", output.stderr.trim());
        }

        Ok(output.stdout.trim().to_string())
    }
}

/// Replace every `secrets:` value in `fields` with its resolved value.
///
/// Values without the prefix are left alone, so no agent is needed unless a
/// reference is actually used.
pub fn resolve_fields(
    fields: Vec<(&'static str, &mut String)>,
    agent: Option<&SecretAgentConfig>,
    resolver: &dyn SecretResolver,
) -> Result<()> {
    for (name, value) in fields {
        if !value.starts_with(SECRET_PREFIX) {
            continue;
        }

        let resolved = match agent {
            Some(agent) => resolver.resolve(agent, value),
            None => Err(anyhow::anyhow!("secret agent is not configured")),
        }
        .with_context(|| format!("failed to resolve {name}"))?;

        *value = resolved;
    }

    Ok(())
}
