//! TwinMock Core
//!
//! In-memory state engine for a device-management backend mock:
//! - Device registry with create/replace, delete and clear-all
//! - Per-method FIFO queues of scripted direct-method responses
//! - Exact (method, module) invocation matching with call history
//! - Per-device twin documents with a history log

pub mod command;
pub mod device;
pub mod error;
pub mod invocation;
pub mod method;
pub mod registry;
pub mod response;
pub mod twin;

pub use command::{Command, CommandOutcome};
pub use device::{Device, DeviceId};
pub use error::{MockError, Result};
pub use invocation::{Invocation, InvocationResponse};
pub use method::{MethodKey, MethodRecord, MethodRegistry};
pub use registry::{DeviceRegistry, RegistryStats};
pub use response::{Consumption, ResponseQueue, ScriptedResponse};
pub use twin::Twin;

/// Opaque JSON document used for twins, payloads and call history entries
pub type Document = serde_json::Value;
