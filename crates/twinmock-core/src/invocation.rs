//! Direct-method invocation engine
//!
//! Resolving a call walks device, then method, then the method's response
//! queue. Only a call that is actually answered lands in the call history.

use crate::device::{Device, DeviceId};
use crate::error::{MockError, Result};
use crate::Document;
use serde::{Deserialize, Serialize};

/// Body field naming the method to invoke
pub const METHOD_NAME_FIELD: &str = "methodName";

/// An inbound direct-method call
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub device_id: DeviceId,
    pub module_name: Option<String>,
    /// `None` when the caller did not name a method; such a call never matches
    pub method_name: Option<String>,
    /// Recorded verbatim in the call history
    pub payload: Document,
}

impl Invocation {
    /// Call `method_name` on the device itself
    pub fn new(
        device_id: impl Into<DeviceId>,
        method_name: impl Into<String>,
        payload: Document,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            module_name: None,
            method_name: Some(method_name.into()),
            payload,
        }
    }

    /// Address the call to a module of the device
    #[must_use]
    pub fn on_module(mut self, module_name: impl Into<String>) -> Self {
        self.module_name = Some(module_name.into());
        self
    }

    /// Build a call from a wire body of the form `{"methodName": ..., ...}`.
    ///
    /// The whole body, method name included, becomes the recorded payload.
    pub fn from_body(
        device_id: impl Into<DeviceId>,
        module_name: Option<String>,
        body: Document,
    ) -> Self {
        let method_name = body
            .get(METHOD_NAME_FIELD)
            .and_then(Document::as_str)
            .map(str::to_string);

        Self {
            device_id: device_id.into(),
            module_name,
            method_name,
            payload: body,
        }
    }
}

/// Scripted answer returned to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(default)]
    pub payload: Document,
}

impl Device {
    /// Answer a call addressed to this device.
    ///
    /// The device id of `invocation` is not checked here; the registry has
    /// already used it to pick the device.
    pub fn invoke(&mut self, invocation: Invocation) -> Result<InvocationResponse> {
        let Invocation {
            device_id,
            module_name,
            method_name,
            payload,
        } = invocation;

        let record = method_name
            .as_deref()
            .and_then(|name| self.methods_mut().find_mut(name, module_name.as_deref()));

        let Some(record) = record else {
            tracing::warn!(
                device_id = %device_id,
                module = module_name.as_deref().unwrap_or("-"),
                method = method_name.as_deref().unwrap_or("-"),
                "tried to invoke direct method: unknown method"
            );
            return Err(MockError::UnknownMethod {
                device_id: device_id.to_string(),
                module_name,
                method_name,
            });
        };

        let Some(response) = record.responses_mut().consume() else {
            tracing::warn!(
                device_id = %device_id,
                method = %record.key(),
                "tried to invoke direct method: no recorded response"
            );
            return Err(MockError::NoResponseConfigured {
                device_id: device_id.to_string(),
                module_name,
                method_name: record.method_name().to_string(),
            });
        };

        record.record_call(payload);
        tracing::debug!(
            device_id = %device_id,
            method = %record.key(),
            remaining = record.responses().len(),
            "answered direct method"
        );

        Ok(InvocationResponse {
            status: response.status,
            payload: response.payload,
        })
    }
}
