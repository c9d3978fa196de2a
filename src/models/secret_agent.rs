//! Secret agent connection options.

use super::Validate;
use crate::{engine::SecretAgentConfig, error::ValidationError};

const CONNECTION_TYPES: [&str; 2] = ["tcp", "uds"];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SecretAgent {
    /// `tcp` or `uds`.
    pub connection_type: String,
    /// Host or socket path; empty means no agent.
    pub address: String,
    pub port: u16,
    /// Milliseconds.
    pub timeout: u64,
    pub ca_file: String,
    pub tls_name: String,
    pub cert_file: String,
    pub key_file: String,
    /// Resolved values come back base64-encoded.
    pub is_base64: bool,
}

impl SecretAgent {
    /// Connection details for the engine, or `None` when no address is set.
    pub fn config(&self) -> Option<SecretAgentConfig> {
        if self.address.is_empty() {
            return None;
        }

        let set = |value: &str| (!value.is_empty()).then(|| value.to_string());

        Some(SecretAgentConfig {
            connection_type: set(&self.connection_type).map(|t| t.to_lowercase()),
            address: self.address.clone(),
            port: (self.port != 0).then_some(self.port),
            timeout_ms: (self.timeout != 0).then_some(self.timeout),
            ca_file: set(&self.ca_file),
            tls_name: set(&self.tls_name),
            cert_file: set(&self.cert_file),
            key_file: set(&self.key_file),
            is_base64: self.is_base64,
        })
    }
}

impl Validate for SecretAgent {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.connection_type.is_empty() {
            return Err(ValidationError::Required("connection type"));
        }

        if !CONNECTION_TYPES
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&self.connection_type))
        {
            return Err(ValidationError::Unsupported {
                kind: "connection type",
                value: self.connection_type.clone(),
            });
        }

        Ok(())
    }
}
