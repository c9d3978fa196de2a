//! `app:` and `cluster:` sections.

use crate::models::{App, Cluster};

partial_group! {
    pub struct PartialApp => App {
        verbose: bool => verbose,
        log_level: String => log_level,
        log_json: bool => log_json,
        log_file: String => log_file,
    }
}

partial_group! {
    pub struct PartialCluster => Cluster {
        host: String => host,
        port: u16 => port,
        user: String => user,
        password: String => password,
        auth: String => auth_mode,
        tls_name: String => tls_name,
        tls_ca_file: String => tls_ca_file,
        tls_cert_file: String => tls_cert_file,
        tls_key_file: String => tls_key_file,
        tls_key_file_password: String => tls_key_file_password,
        tls_protocols: String => tls_protocols,
        client_timeout: u64 => client_timeout,
        client_idle_timeout: u64 => client_idle_timeout,
        client_login_timeout: u64 => client_login_timeout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{defaults::Defaults, partial::parse_str};

    #[test]
    fn cluster_section() {
        let cfg = parse_str(
            "cluster:\n  host: db.local\n  user: admin\n  auth: external\n  tls-ca-file: ca.pem\n",
        )
        .unwrap();
        let cluster = cfg.cluster.unwrap().resolve(&Defaults::new().cluster);

        assert_eq!(cluster.host, "db.local");
        assert_eq!(cluster.port, 3000);
        assert_eq!(cluster.auth_mode, "external");
        assert_eq!(cluster.tls_ca_file, "ca.pem");
    }

    #[test]
    fn app_section_merge() {
        let file = PartialApp {
            log_level: Some("info".into()),
            log_json: Some(true),
            ..PartialApp::default()
        };
        let flags = PartialApp {
            log_json: Some(false),
            ..PartialApp::default()
        };

        let app = file.merge(flags).resolve(&Defaults::new().app);
        assert_eq!(app.log_level, "info");
        assert!(!app.log_json);
    }
}
