//! Simulated devices

use crate::method::MethodRegistry;
use crate::twin::Twin;
use crate::Document;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier a device is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for DeviceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A device owns its direct methods and its twin; nothing is shared
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    id: DeviceId,
    methods: MethodRegistry,
    twin: Twin,
}

impl Device {
    /// Fresh device with no methods and a twin holding `initial_twin`
    pub fn new(id: impl Into<DeviceId>, initial_twin: Document) -> Self {
        Self {
            id: id.into(),
            methods: MethodRegistry::new(),
            twin: Twin::new(initial_twin),
        }
    }

    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    pub fn methods(&self) -> &MethodRegistry {
        &self.methods
    }

    pub fn methods_mut(&mut self) -> &mut MethodRegistry {
        &mut self.methods
    }

    pub fn twin(&self) -> &Twin {
        &self.twin
    }

    pub fn twin_mut(&mut self) -> &mut Twin {
        &mut self.twin
    }
}
