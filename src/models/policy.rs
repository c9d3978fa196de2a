//! Compression and encryption options.
//!
//! Modes are case-insensitive and forwarded uppercase.  An empty mode or
//! `NONE` projects to no policy at all.

use super::Validate;
use crate::{
    engine::{CompressionPolicy, EncryptionPolicy},
    error::ValidationError,
};

const NONE: &str = "NONE";
const COMPRESSION_MODES: [&str; 2] = [NONE, "ZSTD"];
const ENCRYPTION_MODES: [&str; 3] = [NONE, "AES128", "AES256"];

fn is_none(mode: &str) -> bool {
    mode.is_empty() || mode.eq_ignore_ascii_case(NONE)
}

fn check_mode(kind: &'static str, mode: &str, allowed: &[&str]) -> Result<(), ValidationError> {
    if mode.is_empty() || allowed.iter().any(|m| m.eq_ignore_ascii_case(mode)) {
        return Ok(());
    }

    Err(ValidationError::Unsupported {
        kind,
        value: mode.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Compression {
    pub mode: String,
    pub level: i32,
}

impl Compression {
    pub fn policy(&self) -> Option<CompressionPolicy> {
        if is_none(&self.mode) {
            return None;
        }

        Some(CompressionPolicy {
            mode: self.mode.to_uppercase(),
            level: self.level,
        })
    }
}

impl Validate for Compression {
    fn validate(&self) -> Result<(), ValidationError> {
        check_mode("compression mode", &self.mode, &COMPRESSION_MODES)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Encryption {
    pub mode: String,
    /// Path to a PEM key file.
    pub key_file: String,
    /// Name of an environment variable holding the key.
    pub key_env: String,
    /// Secret agent reference the engine resolves to the key.
    pub key_secret: String,
}

impl Encryption {
    pub fn secret_fields(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![
            ("encryption-key-file", &mut self.key_file),
            ("encryption-key-env", &mut self.key_env),
        ]
    }

    pub fn policy(&self) -> Option<EncryptionPolicy> {
        if is_none(&self.mode) {
            return None;
        }

        let source = |value: &str| (!value.is_empty()).then(|| value.to_string());

        Some(EncryptionPolicy {
            mode: self.mode.to_uppercase(),
            key_file: source(&self.key_file),
            key_env: source(&self.key_env),
            key_secret: source(&self.key_secret),
        })
    }
}

impl Validate for Encryption {
    fn validate(&self) -> Result<(), ValidationError> {
        check_mode("encryption mode", &self.mode, &ENCRYPTION_MODES)?;

        if is_none(&self.mode) {
            return Ok(());
        }

        let sources = [&self.key_file, &self.key_env, &self.key_secret]
            .iter()
            .filter(|value| !value.is_empty())
            .count();

        match sources {
            0 => Err(ValidationError::MissingEncryptionKey),
            1 => Ok(()),
            _ => Err(ValidationError::MultipleEncryptionKeys),
        }
    }
}
