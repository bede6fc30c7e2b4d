//! Tests for device lifecycle, twins and history queries

use serde_json::json;
use twinmock_core::{
    Command, CommandOutcome, DeviceId, DeviceRegistry, Invocation, MethodKey, MockError, ScriptedResponse,
};

#[test]
fn test_replace_resets_state() {
    let registry = DeviceRegistry::new();
    registry.create_or_replace("D", json!({"v": 1}));
    registry
        .register_response("D", MethodKey::device("M"), ScriptedResponse::unlimited(200, "x"))
        .unwrap();
    registry
        .register_response("D", MethodKey::module("X", "M"), ScriptedResponse::unlimited(200, "y"))
        .unwrap();
    registry
        .invoke(Invocation::new("D", "M", json!({"methodName": "M"})))
        .unwrap();
    registry.update_twin("D", json!({"v": 2})).unwrap();

    assert!(registry.create_or_replace("D", json!({"v": 3})));

    let device = registry.get("D").unwrap();
    assert!(device.methods().is_empty());
    assert_eq!(device.twin().value(), &json!({"v": 3}));
    assert!(device.twin().history().is_empty());
    assert!(registry.call_history("D", None).is_empty());
    assert!(registry
        .invoke(Invocation::new("D", "M", json!({})))
        .is_err());
}

#[test]
fn test_clear_idempotence() {
    let registry = DeviceRegistry::new();

    assert_eq!(
        registry.execute(Command::ClearAll).unwrap(),
        CommandOutcome::Cleared { devices: 0 }
    );
    assert_eq!(
        registry
            .execute(Command::ClearDevice {
                device_id: "ghost".into()
            })
            .unwrap(),
        CommandOutcome::Cleared { devices: 0 }
    );

    registry.create_or_replace("a", json!({}));
    registry.create_or_replace("b", json!({}));
    assert_eq!(
        registry.execute(Command::ClearAll).unwrap(),
        CommandOutcome::Cleared { devices: 2 }
    );
    assert_eq!(
        registry.execute(Command::ClearAll).unwrap(),
        CommandOutcome::Cleared { devices: 0 }
    );
}

#[test]
fn test_clear_device_only_removes_that_device() {
    let registry = DeviceRegistry::new();
    registry.create_or_replace("a", json!({}));
    registry.create_or_replace("b", json!({}));

    let outcome = registry
        .execute(Command::ClearDevice {
            device_id: "a".into(),
        })
        .unwrap();

    assert_eq!(outcome, CommandOutcome::Cleared { devices: 1 });
    assert_eq!(registry.device_ids(), vec![DeviceId::from("b")]);
}

#[test]
fn test_twin_history_records_updates() {
    let registry = DeviceRegistry::new();
    registry.create_or_replace("D", json!({"desired": {"led": "off"}}));
    assert!(registry.twin_history("D").unwrap().is_empty());

    registry
        .update_twin("D", json!({"desired": {"led": "on"}}))
        .unwrap();
    registry.update_twin("D", json!("raw")).unwrap();

    assert_eq!(registry.twin_value("D").unwrap(), json!("raw"));
    assert_eq!(
        registry.twin_history("D").unwrap(),
        vec![json!({"desired": {"led": "on"}}), json!("raw")]
    );
}

#[test]
fn test_twin_of_unknown_device() {
    let registry = DeviceRegistry::new();

    assert!(matches!(
        registry.twin_history("ghost"),
        Err(MockError::UnknownDevice { .. })
    ));
    assert!(matches!(
        registry.update_twin("ghost", json!({})),
        Err(MockError::UnknownDevice { .. })
    ));
    assert!(!registry.contains("ghost"));
}

#[test]
fn test_call_history_lists_registered_methods() {
    let registry = DeviceRegistry::new();
    registry.create_or_replace("D", json!({}));
    registry
        .register_response("D", MethodKey::device("reboot"), ScriptedResponse::unlimited(200, 1))
        .unwrap();
    registry
        .register_response("D", MethodKey::device("ping"), ScriptedResponse::unlimited(200, 2))
        .unwrap();
    registry
        .register_response("D", MethodKey::module("X", "ping"), ScriptedResponse::unlimited(200, 3))
        .unwrap();
    registry
        .invoke(Invocation::new("D", "ping", json!({"methodName": "ping"})))
        .unwrap();

    let history = registry.call_history("D", None);
    assert_eq!(history.len(), 2);
    assert_eq!(history["reboot"], Vec::<serde_json::Value>::new());
    assert_eq!(history["ping"], vec![json!({"methodName": "ping"})]);

    let module_history = registry.call_history("D", Some("X"));
    assert_eq!(module_history.len(), 1);
    assert!(module_history["ping"].is_empty());

    assert!(registry.call_history("D", Some("Z")).is_empty());
    assert!(registry.call_history("ghost", None).is_empty());
}

#[test]
fn test_concurrent_invocations_are_serialized() {
    let registry = DeviceRegistry::new();
    registry.create_or_replace("D", json!({}));
    registry
        .register_response("D", MethodKey::device("M"), ScriptedResponse::new(100, 200, "x"))
        .unwrap();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let registry = registry.clone();
            scope.spawn(move || {
                for _ in 0..50 {
                    let _ = registry.invoke(Invocation::new("D", "M", json!({})));
                }
            });
        }
    });

    let stats = registry.stats();
    assert_eq!(stats.recorded_calls, 100);
    assert_eq!(stats.queued_responses, 0);
}

#[test]
fn test_clear_all_counts_only_removed_devices() {
    let registry = DeviceRegistry::new();
    for n in 0..64 {
        registry.create_or_replace(format!("pre-{n}"), json!({}));
    }

    let removed = std::thread::scope(|scope| {
        let creator = scope.spawn(|| {
            for n in 0..256 {
                registry.create_or_replace(format!("late-{n}"), json!({}));
            }
        });
        let removed = registry.clear_all();
        creator.join().unwrap();
        removed
    });

    assert!(removed >= 64);
    assert_eq!(removed + registry.len(), 64 + 256);
}
