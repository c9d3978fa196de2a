//! Cluster connection flags, shared by both subcommands.

use clap::Args;

use crate::partial::PartialCluster;

#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Cluster")]
pub struct ClusterArgs {
    /// Seed host.  Accepts `secrets:<resource>:<key>`.
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Accepts `secrets:<resource>:<key>`.
    #[arg(short = 'U', long)]
    pub user: Option<String>,

    /// Accepts `secrets:<resource>:<key>`.
    #[arg(short = 'P', long)]
    pub password: Option<String>,

    /// INTERNAL, EXTERNAL or PKI.
    #[arg(long)]
    pub auth: Option<String>,

    #[arg(long)]
    pub tls_name: Option<String>,

    #[arg(long = "tls-cafile")]
    pub tls_ca_file: Option<String>,

    #[arg(long = "tls-certfile")]
    pub tls_cert_file: Option<String>,

    #[arg(long = "tls-keyfile")]
    pub tls_key_file: Option<String>,

    #[arg(long = "tls-keyfile-password")]
    pub tls_key_file_password: Option<String>,

    /// e.g. "TLSv1.2 TLSv1.3".
    #[arg(long)]
    pub tls_protocols: Option<String>,

    /// Connection timeout in milliseconds.
    #[arg(long)]
    pub client_timeout: Option<u64>,

    /// Idle connection timeout in milliseconds.
    #[arg(long)]
    pub client_idle_timeout: Option<u64>,

    /// Login timeout in milliseconds.
    #[arg(long)]
    pub client_login_timeout: Option<u64>,
}

impl ClusterArgs {
    pub fn to_partial(&self) -> PartialCluster {
        PartialCluster {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            auth: self.auth.clone(),
            tls_name: self.tls_name.clone(),
            tls_ca_file: self.tls_ca_file.clone(),
            tls_cert_file: self.tls_cert_file.clone(),
            tls_key_file: self.tls_key_file.clone(),
            tls_key_file_password: self.tls_key_file_password.clone(),
            tls_protocols: self.tls_protocols.clone(),
            client_timeout: self.client_timeout,
            client_idle_timeout: self.client_idle_timeout,
            client_login_timeout: self.client_login_timeout,
        }
    }
}
