//! TwinMock HTTP API Server
//!
//! Wire surface of the device-management mock:
//! - `/manage-api/...` endpoints used by a test harness to create devices,
//!   script direct-method responses and read back what happened
//! - `/twins/...` endpoints a system under test calls to invoke direct methods
//! - A permissive fallback answering every other request with `{}`

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod tls;

use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use twinmock_core::DeviceRegistry;

pub use config::ServerConfig;
pub use error::ApiError;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: DeviceRegistry,
    /// PEM certificate served by `GET /manage-api/cert`
    pub cert_path: Arc<PathBuf>,
}

impl AppState {
    pub fn new(registry: DeviceRegistry, cert_path: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            cert_path: Arc::new(cert_path.into()),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    routes::create_router(state)
}
