//! Compression, encryption and secret agent flags.
//!
//! Field names carry the group prefix: clap derives argument ids from them,
//! and ids must be unique across every flattened group of a subcommand.

use clap::Args;

use crate::partial::{PartialCompression, PartialEncryption, PartialSecretAgent};

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Compression")]
pub struct CompressionArgs {
    /// NONE or ZSTD.
    #[arg(short = 'z', long)]
    pub compress: Option<String>,

    #[arg(long)]
    pub compression_level: Option<i32>,
}

impl CompressionArgs {
    pub fn to_partial(&self) -> PartialCompression {
        PartialCompression {
            mode: self.compress.clone(),
            level: self.compression_level,
        }
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Encryption")]
pub struct EncryptionArgs {
    /// NONE, AES128 or AES256.
    #[arg(long)]
    pub encrypt: Option<String>,

    /// Path to the key file.  Accepts `secrets:<resource>:<key>`.
    #[arg(long)]
    pub encryption_key_file: Option<String>,

    /// Environment variable holding the key.
    #[arg(long)]
    pub encryption_key_env: Option<String>,

    /// Secret agent reference holding the key.
    #[arg(long)]
    pub encryption_key_secret: Option<String>,
}

impl EncryptionArgs {
    pub fn to_partial(&self) -> PartialEncryption {
        PartialEncryption {
            mode: self.encrypt.clone(),
            key_file: self.encryption_key_file.clone(),
            key_env: self.encryption_key_env.clone(),
            key_secret: self.encryption_key_secret.clone(),
        }
    }
}

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Secret agent")]
pub struct SecretAgentArgs {
    /// tcp or uds.
    #[arg(long)]
    pub sa_connection_type: Option<String>,

    /// Host, or socket path for uds.
    #[arg(long)]
    pub sa_address: Option<String>,

    #[arg(long)]
    pub sa_port: Option<u16>,

    /// Milliseconds.
    #[arg(long)]
    pub sa_timeout: Option<u64>,

    #[arg(long)]
    pub sa_cafile: Option<String>,

    #[arg(long)]
    pub sa_tls_name: Option<String>,

    #[arg(long)]
    pub sa_certfile: Option<String>,

    #[arg(long)]
    pub sa_keyfile: Option<String>,

    /// Secrets come back base64-encoded.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub sa_is_base64: Option<bool>,
}

impl SecretAgentArgs {
    pub fn to_partial(&self) -> PartialSecretAgent {
        PartialSecretAgent {
            connection_type: self.sa_connection_type.clone(),
            address: self.sa_address.clone(),
            port: self.sa_port,
            timeout: self.sa_timeout,
            ca_file: self.sa_cafile.clone(),
            tls_name: self.sa_tls_name.clone(),
            cert_file: self.sa_certfile.clone(),
            key_file: self.sa_keyfile.clone(),
            is_base64: self.sa_is_base64,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::cli::{Cli, Subcommand};

    fn backup(args: &[&str]) -> crate::cli::BackupArgs {
        let cli = Cli::try_parse_from(["backupctl", "backup"].into_iter().chain(args.iter().copied()))
            .unwrap();
        match cli.command {
            Subcommand::Backup(args) => args,
            Subcommand::Restore(_) => unreachable!(),
        }
    }

    #[test]
    fn compression_and_encryption_flags() {
        let args = backup(&[
            "-z",
            "zstd",
            "--compression-level",
            "5",
            "--encrypt",
            "aes256",
            "--encryption-key-env",
            "KEY",
        ]);

        let compression = args.compression.to_partial();
        assert_eq!(compression.mode.as_deref(), Some("zstd"));
        assert_eq!(compression.level, Some(5));

        let encryption = args.encryption.to_partial();
        assert_eq!(encryption.mode.as_deref(), Some("aes256"));
        assert_eq!(encryption.key_env.as_deref(), Some("KEY"));
        assert_eq!(encryption.key_file, None);
    }

    #[test]
    fn secret_agent_port_is_not_cluster_port() {
        let args = backup(&["--port", "3000", "--sa-port", "3005", "--sa-address", "agent"]);

        assert_eq!(args.cluster.to_partial().port, Some(3000));
        let agent = args.secret_agent.to_partial();
        assert_eq!(agent.port, Some(3005));
        assert_eq!(agent.address.as_deref(), Some("agent"));
    }
}
