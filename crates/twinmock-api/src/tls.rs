//! TLS material for the HTTPS listener

use anyhow::{Context, Result};
use axum_server::tls_rustls::RustlsConfig;
use std::path::Path;

/// Load a PEM certificate chain and private key
pub async fn load_rustls_config(cert: &Path, key: &Path) -> Result<RustlsConfig> {
    RustlsConfig::from_pem_file(cert, key).await.with_context(|| {
        format!(
            "failed to load TLS certificate {} / key {}",
            cert.display(),
            key.display()
        )
    })
}
