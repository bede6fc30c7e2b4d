//! HTTP and HTTPS listeners
//!
//! Both listeners serve the same router over one shared
//! [`DeviceRegistry`], so a device created over HTTP can be invoked over
//! HTTPS and vice versa.

use crate::config::ServerConfig;
use crate::tls::load_rustls_config;
use crate::{create_app, AppState};
use anyhow::{Context, Result};
use axum_server::Handle;
use std::time::Duration;
use twinmock_core::DeviceRegistry;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Run the server until Ctrl-C
pub async fn run(config: ServerConfig) -> Result<()> {
    run_with_registry(config, DeviceRegistry::new()).await
}

/// Run the server on an existing registry until Ctrl-C
pub async fn run_with_registry(config: ServerConfig, registry: DeviceRegistry) -> Result<()> {
    let app = create_app(AppState::new(registry, config.tls_cert.clone()));
    let handle = Handle::new();
    tokio::spawn(shutdown_on_ctrl_c(handle.clone()));

    let http_addr = config.http_addr();
    let http = axum_server::bind(http_addr)
        .handle(handle.clone())
        .serve(app.clone().into_make_service());
    tracing::info!("TwinMock listening unencrypted on {http_addr}");

    let tls = if config.disable_tls {
        None
    } else {
        match load_rustls_config(&config.tls_cert, &config.tls_key).await {
            Ok(tls) => Some(tls),
            Err(e) => {
                tracing::warn!("HTTPS listener disabled: {e:#}");
                None
            }
        }
    };

    match tls {
        Some(tls) => {
            let https_addr = config.https_addr();
            let https = axum_server::bind_rustls(https_addr, tls)
                .handle(handle)
                .serve(app.into_make_service());
            tracing::info!("TwinMock listening encrypted on {https_addr}");

            tokio::try_join!(
                async { http.await.with_context(|| format!("HTTP server on {http_addr}")) },
                async { https.await.with_context(|| format!("HTTPS server on {https_addr}")) },
            )?;
        }
        None => {
            http.await
                .with_context(|| format!("HTTP server on {http_addr}"))?;
        }
    }

    tracing::info!("TwinMock stopped");
    Ok(())
}

async fn shutdown_on_ctrl_c(handle: Handle) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("shutdown requested");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        }
        Err(e) => tracing::error!("failed to listen for Ctrl-C: {e}"),
    }
}
