//! Device registry shared by every request handler
//!
//! Devices live in a `DashMap`. Each operation touches exactly one device
//! entry and holds that entry's lock for its whole duration, so two
//! operations on the same device never interleave. Clones share the same
//! map.
//!
//! Nothing is ever evicted: call histories and twin histories grow for as
//! long as a device exists. Use [`DeviceRegistry::stats`] to watch the
//! accumulation and `clear_all` to reset it.

use crate::device::{Device, DeviceId};
use crate::error::{MockError, Result};
use crate::invocation::{Invocation, InvocationResponse};
use crate::method::MethodKey;
use crate::response::ScriptedResponse;
use crate::Document;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Process-wide set of simulated devices
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Arc<DashMap<DeviceId, Device>>,
}

impl DeviceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a fresh device, dropping any previous device with the same id.
    ///
    /// Returns `true` when a device was replaced.
    pub fn create_or_replace(&self, device_id: impl Into<DeviceId>, initial_twin: Document) -> bool {
        let device_id = device_id.into();
        let device = Device::new(device_id.clone(), initial_twin);
        self.devices.insert(device_id, device).is_some()
    }

    /// Remove a device; returns `false` if it was not registered
    pub fn delete(&self, device_id: &str) -> bool {
        self.devices.remove(device_id).is_some()
    }

    /// Remove every device and return how many were removed.
    ///
    /// Only devices this call actually dropped are counted; a device created
    /// concurrently either survives or is counted, never both.
    pub fn clear_all(&self) -> usize {
        let mut removed = 0;
        self.devices.retain(|_, _| {
            removed += 1;
            false
        });
        removed
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.devices.contains_key(device_id)
    }

    /// Run `f` against a device while holding its entry.
    ///
    /// `f` must not touch the registry again: the shard lock is held and a
    /// re-entrant call can deadlock.
    pub(crate) fn with_device<T>(&self, device_id: &str, f: impl FnOnce(&Device) -> T) -> Result<T> {
        self.devices
            .get(device_id)
            .map(|device| f(&device))
            .ok_or_else(|| MockError::unknown_device(device_id))
    }

    /// Run `f` against a device while holding its entry exclusively
    pub(crate) fn with_device_mut<T>(
        &self,
        device_id: &str,
        f: impl FnOnce(&mut Device) -> T,
    ) -> Result<T> {
        self.devices
            .get_mut(device_id)
            .map(|mut device| f(&mut device))
            .ok_or_else(|| MockError::unknown_device(device_id))
    }

    /// Snapshot of a device
    pub fn get(&self, device_id: &str) -> Result<Device> {
        self.with_device(device_id, |device| device.clone())
    }

    /// Replace the twin document of a device
    pub fn update_twin(&self, device_id: &str, value: Document) -> Result<()> {
        self.with_device_mut(device_id, |device| device.twin_mut().update(value))
    }

    /// Current twin document of a device
    pub fn twin_value(&self, device_id: &str) -> Result<Document> {
        self.with_device(device_id, |device| device.twin().value().clone())
    }

    /// Every twin document written since creation, oldest first
    pub fn twin_history(&self, device_id: &str) -> Result<Vec<Document>> {
        self.with_device(device_id, |device| device.twin().history().to_vec())
    }

    /// Queue a scripted response; returns the method's queue length
    pub fn register_response(
        &self,
        device_id: &str,
        key: MethodKey,
        response: ScriptedResponse,
    ) -> Result<usize> {
        self.with_device_mut(device_id, |device| {
            device.methods_mut().register_response(key, response)
        })
    }

    /// Answer a direct-method call
    pub fn invoke(&self, invocation: Invocation) -> Result<InvocationResponse> {
        let Some(mut device) = self.devices.get_mut(invocation.device_id.as_str()) else {
            tracing::warn!(
                device_id = %invocation.device_id,
                "tried to invoke direct method: unknown deviceId"
            );
            return Err(MockError::unknown_device(invocation.device_id.as_str()));
        };
        device.invoke(invocation)
    }

    /// Call history per method name for the methods matching the module
    /// filter. An unknown device has no calls.
    pub fn call_history(
        &self,
        device_id: &str,
        module_filter: Option<&str>,
    ) -> BTreeMap<String, Vec<Document>> {
        self.with_device(device_id, |device| {
            device.methods().call_history(module_filter)
        })
        .unwrap_or_default()
    }

    pub fn device_ids(&self) -> Vec<DeviceId> {
        let mut ids: Vec<_> = self.devices.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Totals over everything the registry currently holds
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            devices: self.devices.len(),
            ..RegistryStats::default()
        };

        for entry in self.devices.iter() {
            for record in entry.value().methods().iter() {
                stats.methods += 1;
                stats.queued_responses += record.responses().len();
                stats.recorded_calls += record.call_history().len();
            }
        }

        stats
    }
}

/// Registry statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub devices: usize,
    pub methods: usize,
    pub queued_responses: usize,
    pub recorded_calls: usize,
}
