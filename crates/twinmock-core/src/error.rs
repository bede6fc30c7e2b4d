//! Error types for registry lookups and direct-method invocation

use thiserror::Error;

/// Not-found outcomes surfaced by core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// No device is registered under this id
    #[error("unknown deviceId {device_id}")]
    UnknownDevice { device_id: String },

    /// The device has no method record for this (module, method) pair
    #[error(
        "unknown method {}/{}",
        .module_name.as_deref().unwrap_or("-"),
        .method_name.as_deref().unwrap_or("-")
    )]
    UnknownMethod {
        device_id: String,
        module_name: Option<String>,
        method_name: Option<String>,
    },

    /// The method exists but its response queue is empty
    #[error("no recorded response {}/{method_name}", .module_name.as_deref().unwrap_or("-"))]
    NoResponseConfigured {
        device_id: String,
        module_name: Option<String>,
        method_name: String,
    },
}

impl MockError {
    pub(crate) fn unknown_device(device_id: impl Into<String>) -> Self {
        Self::UnknownDevice {
            device_id: device_id.into(),
        }
    }

    /// Id of the device the failed operation targeted
    pub fn device_id(&self) -> &str {
        match self {
            Self::UnknownDevice { device_id }
            | Self::UnknownMethod { device_id, .. }
            | Self::NoResponseConfigured { device_id, .. } => device_id,
        }
    }
}

/// Result alias for core operations
pub type Result<T> = std::result::Result<T, MockError>;
