//! State-changing operations as explicit commands
//!
//! The HTTP layer turns each mutating request into one [`Command`] and hands
//! it to [`DeviceRegistry::execute`]. Read-only queries go straight to the
//! registry.

use crate::device::DeviceId;
use crate::error::Result;
use crate::invocation::{Invocation, InvocationResponse};
use crate::method::MethodKey;
use crate::registry::DeviceRegistry;
use crate::response::ScriptedResponse;
use crate::Document;
use std::fmt;

/// A mutation of the device registry
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a device, replacing any device with the same id
    CreateDevice { device_id: DeviceId, twin: Document },

    /// Overwrite the twin document of an existing device
    UpdateTwin { device_id: DeviceId, twin: Document },

    /// Append a scripted response to a direct method's queue
    RegisterResponse {
        device_id: DeviceId,
        key: MethodKey,
        response: ScriptedResponse,
    },

    /// Answer a direct-method call
    Invoke(Invocation),

    /// Drop every device
    ClearAll,

    /// Drop one device
    ClearDevice { device_id: DeviceId },
}

/// What a successfully executed command did
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Created { replaced: bool },
    TwinUpdated,
    ResponseRegistered { queued: usize },
    Invoked(InvocationResponse),
    Cleared { devices: usize },
}

impl DeviceRegistry {
    /// Apply a command to the registry
    pub fn execute(&self, command: Command) -> Result<CommandOutcome> {
        tracing::debug!(%command, "execute");
        match command {
            Command::CreateDevice { device_id, twin } => {
                tracing::info!(device_id = %device_id, twin = %twin, "create device");
                let replaced = self.create_or_replace(device_id, twin);
                Ok(CommandOutcome::Created { replaced })
            }

            Command::UpdateTwin { device_id, twin } => {
                tracing::info!(device_id = %device_id, twin = %twin, "update twin");
                self.update_twin(device_id.as_str(), twin)?;
                Ok(CommandOutcome::TwinUpdated)
            }

            Command::RegisterResponse {
                device_id,
                key,
                response,
            } => {
                tracing::info!(
                    device_id = %device_id,
                    method = %key,
                    count = response.count,
                    "add direct method response"
                );
                let queued = self.register_response(device_id.as_str(), key, response)?;
                Ok(CommandOutcome::ResponseRegistered { queued })
            }

            Command::Invoke(invocation) => {
                tracing::info!(
                    device_id = %invocation.device_id,
                    module = invocation.module_name.as_deref().unwrap_or("-"),
                    payload = %invocation.payload,
                    "incoming direct method call"
                );
                self.invoke(invocation).map(CommandOutcome::Invoked)
            }

            Command::ClearAll => {
                let devices = self.clear_all();
                if devices > 0 {
                    tracing::info!(devices, "clear all devices");
                }
                Ok(CommandOutcome::Cleared { devices })
            }

            Command::ClearDevice { device_id } => {
                let removed = self.delete(device_id.as_str());
                if removed {
                    tracing::info!(device_id = %device_id, "clear device");
                }
                Ok(CommandOutcome::Cleared {
                    devices: usize::from(removed),
                })
            }
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDevice { device_id, .. } => write!(f, "createDevice {device_id}"),
            Self::UpdateTwin { device_id, .. } => write!(f, "updateTwin {device_id}"),
            Self::RegisterResponse { device_id, key, .. } => {
                write!(f, "registerResponse {device_id}/{key}")
            }
            Self::Invoke(invocation) => {
                write!(f, "invoke {}", invocation.device_id)?;
                if let Some(module) = &invocation.module_name {
                    write!(f, "/{module}")?;
                }
                write!(
                    f,
                    "/{}",
                    invocation.method_name.as_deref().unwrap_or("<unnamed>")
                )
            }
            Self::ClearAll => write!(f, "clearAll"),
            Self::ClearDevice { device_id } => write!(f, "clearDevice {device_id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MockError;
    use serde_json::json;

    #[test]
    fn test_execute_walks_script() {
        let registry = DeviceRegistry::new();
        registry
            .execute(Command::CreateDevice {
                device_id: "dev-1".into(),
                twin: json!({}),
            })
            .unwrap();

        let outcome = registry
            .execute(Command::RegisterResponse {
                device_id: "dev-1".into(),
                key: MethodKey::device("reboot"),
                response: ScriptedResponse::once(201, "b"),
            })
            .unwrap();
        assert_eq!(outcome, CommandOutcome::ResponseRegistered { queued: 1 });

        let outcome = registry
            .execute(Command::Invoke(Invocation::new("dev-1", "reboot", json!({}))))
            .unwrap();
        assert_eq!(
            outcome,
            CommandOutcome::Invoked(InvocationResponse {
                status: Some(201),
                payload: json!("b"),
            })
        );
    }

    #[test]
    fn test_unknown_device_leaves_registry_untouched() {
        let registry = DeviceRegistry::new();

        let err = registry
            .execute(Command::UpdateTwin {
                device_id: "ghost".into(),
                twin: json!({"v": 1}),
            })
            .unwrap_err();
        assert_eq!(
            err,
            MockError::UnknownDevice {
                device_id: "ghost".to_string()
            }
        );

        let err = registry
            .execute(Command::RegisterResponse {
                device_id: "ghost".into(),
                key: MethodKey::device("reboot"),
                response: ScriptedResponse::once(200, "x"),
            })
            .unwrap_err();
        assert_eq!(err.device_id(), "ghost");
        assert!(registry.is_empty());
    }

    #[test]
    fn test_command_display() {
        let command = Command::Invoke(
            Invocation::new("dev-1", "reboot", json!({})).on_module("edge"),
        );
        assert_eq!(command.to_string(), "invoke dev-1/edge/reboot");
        assert_eq!(Command::ClearAll.to_string(), "clearAll");
    }
}
