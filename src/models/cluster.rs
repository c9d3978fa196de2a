//! Application and cluster connection options.

use std::time::Duration;

use super::Validate;
use crate::{
    engine::{ClusterConfig, TlsConfig},
    error::ValidationError,
};

const LOG_LEVELS: [&str; 4] = ["debug", "info", "warn", "error"];
const AUTH_MODES: [&str; 3] = ["INTERNAL", "EXTERNAL", "PKI"];

/// Process-level switches: logging and where the config file lives.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct App {
    pub verbose: bool,
    /// Level used when `verbose` is set.
    pub log_level: String,
    pub log_json: bool,
    /// Empty means stderr.
    pub log_file: String,
    pub config_path: String,
}

impl Validate for App {
    fn validate(&self) -> Result<(), ValidationError> {
        if !self.log_level.is_empty()
            && !LOG_LEVELS
                .iter()
                .any(|level| level.eq_ignore_ascii_case(&self.log_level))
        {
            return Err(ValidationError::Unsupported {
                kind: "log level",
                value: self.log_level.clone(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cluster {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// INTERNAL, EXTERNAL or PKI; empty leaves it to the engine.
    pub auth_mode: String,

    pub tls_name: String,
    pub tls_ca_file: String,
    pub tls_cert_file: String,
    pub tls_key_file: String,
    pub tls_key_file_password: String,
    pub tls_protocols: String,

    /// Milliseconds.
    pub client_timeout: u64,
    /// Milliseconds.
    pub client_idle_timeout: u64,
    /// Milliseconds.
    pub client_login_timeout: u64,
}

impl Cluster {
    /// Fields that may hold a `secrets:` reference, by flag name.
    pub fn secret_fields(&mut self) -> Vec<(&'static str, &mut String)> {
        vec![
            ("host", &mut self.host),
            ("user", &mut self.user),
            ("password", &mut self.password),
            ("tls-name", &mut self.tls_name),
            ("tls-cafile", &mut self.tls_ca_file),
            ("tls-certfile", &mut self.tls_cert_file),
            ("tls-keyfile", &mut self.tls_key_file),
            ("tls-keyfile-password", &mut self.tls_key_file_password),
            ("tls-protocols", &mut self.tls_protocols),
        ]
    }

    fn tls_enabled(&self) -> bool {
        [
            &self.tls_name,
            &self.tls_ca_file,
            &self.tls_cert_file,
            &self.tls_key_file,
        ]
        .iter()
        .any(|value| !value.is_empty())
    }

    pub fn to_config(&self) -> ClusterConfig {
        let tls = self.tls_enabled().then(|| TlsConfig {
            name: non_empty(&self.tls_name),
            ca_file: non_empty(&self.tls_ca_file),
            cert_file: non_empty(&self.tls_cert_file),
            key_file: non_empty(&self.tls_key_file),
            key_file_password: non_empty(&self.tls_key_file_password),
            protocols: non_empty(&self.tls_protocols),
        });

        ClusterConfig {
            host: self.host.clone(),
            port: self.port,
            user: non_empty(&self.user),
            password: non_empty(&self.password),
            auth_mode: non_empty(&self.auth_mode).map(|mode| mode.to_uppercase()),
            tls,
            timeout: Duration::from_millis(self.client_timeout),
            idle_timeout: Duration::from_millis(self.client_idle_timeout),
            login_timeout: Duration::from_millis(self.client_login_timeout),
        }
    }
}

impl Validate for Cluster {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.host.is_empty() {
            return Err(ValidationError::Required("host"));
        }

        if !self.auth_mode.is_empty()
            && !AUTH_MODES
                .iter()
                .any(|mode| mode.eq_ignore_ascii_case(&self.auth_mode))
        {
            return Err(ValidationError::Unsupported {
                kind: "auth mode",
                value: self.auth_mode.clone(),
            });
        }

        if self.tls_cert_file.is_empty() != self.tls_key_file.is_empty() {
            return Err(ValidationError::Paired("tls-certfile", "tls-keyfile"));
        }

        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
