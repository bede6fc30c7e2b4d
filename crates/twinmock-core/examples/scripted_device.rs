//! Scripting a device and walking its responses

use serde_json::json;
use twinmock_core::{Command, DeviceRegistry, Invocation, MethodKey, ScriptedResponse};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = DeviceRegistry::new();

    println!("=== TwinMock Scripted Device ===\n");

    registry.execute(Command::CreateDevice {
        device_id: "sensor-1".into(),
        twin: json!({"desired": {"interval": 60}}),
    })?;

    // Succeed twice, fail once, then keep answering "ok"
    for response in [
        ScriptedResponse::new(2, 200, json!({"result": "rebooted"})),
        ScriptedResponse::once(500, json!({"error": "busy"})),
        ScriptedResponse::unlimited(200, json!({"result": "ok"})),
    ] {
        registry.execute(Command::RegisterResponse {
            device_id: "sensor-1".into(),
            key: MethodKey::device("reboot"),
            response,
        })?;
    }

    for attempt in 1..=5 {
        let answer = registry.invoke(Invocation::new(
            "sensor-1",
            "reboot",
            json!({"methodName": "reboot", "attempt": attempt}),
        ))?;
        println!(
            "  attempt {attempt}: status={:?} payload={}",
            answer.status, answer.payload
        );
    }

    registry.update_twin("sensor-1", json!({"desired": {"interval": 30}}))?;
    println!("\nTwin history:");
    for document in registry.twin_history("sensor-1")? {
        println!("  {document}");
    }

    let stats = registry.stats();
    println!("\nRegistry statistics:");
    println!("  Devices: {}", stats.devices);
    println!("  Recorded calls: {}", stats.recorded_calls);

    Ok(())
}
