//! `compression:`, `encryption:` and `secret-agent:` sections.

use crate::models::{Compression, Encryption, SecretAgent};

partial_group! {
    pub struct PartialCompression => Compression {
        mode: String => mode,
        level: i32 => level,
    }
}

partial_group! {
    pub struct PartialEncryption => Encryption {
        mode: String => mode,
        key_file: String => key_file,
        key_env: String => key_env,
        key_secret: String => key_secret,
    }
}

partial_group! {
    pub struct PartialSecretAgent => SecretAgent {
        connection_type: String => connection_type,
        address: String => address,
        port: u16 => port,
        timeout: u64 => timeout,
        ca_file: String => ca_file,
        tls_name: String => tls_name,
        cert_file: String => cert_file,
        key_file: String => key_file,
        is_base64: bool => is_base64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{defaults::Defaults, partial::parse_str};

    #[test]
    fn policy_sections() {
        let defaults = Defaults::new();
        let cfg = parse_str(
            "compression:\n  mode: zstd\nencryption:\n  mode: aes256\n  key-env: KEY\nsecret-agent:\n  address: 127.0.0.1\n  port: 3005\n",
        )
        .unwrap();

        let compression = cfg.compression.unwrap().resolve(&defaults.compression);
        assert_eq!(compression.mode, "zstd");
        assert_eq!(compression.level, defaults.compression.level);

        let encryption = cfg.encryption.unwrap().resolve(&defaults.encryption);
        assert_eq!(encryption.key_env, "KEY");

        let agent = cfg.secret_agent.unwrap().resolve(&defaults.secret_agent);
        assert_eq!(agent.connection_type, "tcp");
        assert_eq!(agent.port, 3005);
    }
}
