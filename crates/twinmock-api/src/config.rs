//! Server configuration
//!
//! Every option can be given as a command-line flag or an environment
//! variable:
//!
//! | Flag | Env | Default |
//! |------|-----|---------|
//! | `--host` | `HOST` | `0.0.0.0` |
//! | `--http-port` | `HTTP_PORT` | `80` |
//! | `--https-port` | `HTTPS_PORT` | `443` |
//! | `--silent` | `SILENT` | `false` |
//! | `--tls-key` | `TLS_KEY_FILE` | `server.key` |
//! | `--tls-cert` | `TLS_CERT_FILE` | `server.cert` |
//! | `--no-tls` | `DISABLE_TLS` | `false` |

use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Parser)]
#[command(name = "twinmock", version, about = "Device-management backend mock")]
pub struct ServerConfig {
    /// Address both listeners bind to
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Plaintext HTTP port
    #[arg(long, env = "HTTP_PORT", default_value_t = 80)]
    pub http_port: u16,

    /// HTTPS port
    #[arg(long, env = "HTTPS_PORT", default_value_t = 443)]
    pub https_port: u16,

    /// Only log warnings and errors
    #[arg(long, env = "SILENT")]
    pub silent: bool,

    /// PEM private key for the HTTPS listener
    #[arg(long, env = "TLS_KEY_FILE", default_value = "server.key")]
    pub tls_key: PathBuf,

    /// PEM certificate for the HTTPS listener, also served at /manage-api/cert
    #[arg(long, env = "TLS_CERT_FILE", default_value = "server.cert")]
    pub tls_cert: PathBuf,

    /// Do not start the HTTPS listener
    #[arg(long = "no-tls", env = "DISABLE_TLS")]
    pub disable_tls: bool,
}

impl ServerConfig {
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.http_port)
    }

    pub fn https_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.https_port)
    }

    /// Default log directive when `RUST_LOG` is not set
    pub fn default_log_directive(&self) -> &'static str {
        if self.silent {
            "warn"
        } else {
            "info"
        }
    }

    /// `RUST_LOG` if present, otherwise the level implied by `silent`
    pub fn log_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_log_directive()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            http_port: 80,
            https_port: 443,
            silent: false,
            tls_key: PathBuf::from("server.key"),
            tls_cert: PathBuf::from("server.cert"),
            disable_tls: false,
        }
    }
}
