//! Request handlers
//!
//! Handlers translate a request into a core [`Command`] or registry query and
//! serialize the outcome. No device state lives here.

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::AppState;
use axum::body::to_bytes;
use axum::extract::{Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use twinmock_core::{
    Command, CommandOutcome, DeviceId, Invocation, InvocationResponse, MethodKey,
    ScriptedResponse,
};

const PEM_CONTENT_TYPE: &str = "application/x-pem-file";

/// Largest body captured when logging an unknown request
const LOGGED_BODY_LIMIT: usize = 1024 * 1024;

fn empty_object() -> Json<Value> {
    Json(Value::Object(Map::new()))
}

fn scripted_response(body: Value) -> Result<ScriptedResponse, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid direct method response: {e}")))
}

/// GET /health
pub async fn health() -> Json<Value> {
    empty_object()
}

/// GET /manage-api/cert
pub async fn certificate(State(state): State<AppState>) -> Result<Response, ApiError> {
    let pem = tokio::fs::read(state.cert_path.as_path()).await.map_err(|e| {
        ApiError::Internal(format!(
            "failed to read certificate {}: {e}",
            state.cert_path.display()
        ))
    })?;

    Ok(([(header::CONTENT_TYPE, PEM_CONTENT_TYPE)], pem).into_response())
}

/// PUT /manage-api/devices/{device_id}
pub async fn create_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    JsonBody(twin): JsonBody,
) -> Result<Json<Value>, ApiError> {
    state
        .registry
        .execute(Command::CreateDevice {
            device_id: device_id.into(),
            twin,
        })
        .map_err(ApiError::management)?;
    Ok(empty_object())
}

/// PUT /manage-api/devices/{device_id}/twin
pub async fn update_twin(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    JsonBody(twin): JsonBody,
) -> Result<Json<Value>, ApiError> {
    state
        .registry
        .execute(Command::UpdateTwin {
            device_id: device_id.into(),
            twin,
        })
        .map_err(ApiError::management)?;
    Ok(empty_object())
}

/// GET /manage-api/devices/{device_id}/twin
pub async fn twin_history(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> (StatusCode, Json<Vec<Value>>) {
    match state.registry.twin_history(&device_id) {
        Ok(history) => (StatusCode::OK, Json(history)),
        Err(_) => (StatusCode::NOT_FOUND, Json(Vec::new())),
    }
}

/// PUT /manage-api/devices/{device_id}/direct-method-response/methods/{method_name}
pub async fn register_device_response(
    State(state): State<AppState>,
    Path((device_id, method_name)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError> {
    register(&state, device_id.into(), MethodKey::device(method_name), body)
}

/// PUT /manage-api/devices/{device_id}/direct-method-response/modules/{module_name}/methods/{method_name}
pub async fn register_module_response(
    State(state): State<AppState>,
    Path((device_id, module_name, method_name)): Path<(String, String, String)>,
    JsonBody(body): JsonBody,
) -> Result<Json<Value>, ApiError> {
    register(
        &state,
        device_id.into(),
        MethodKey::module(module_name, method_name),
        body,
    )
}

fn register(
    state: &AppState,
    device_id: DeviceId,
    key: MethodKey,
    body: Value,
) -> Result<Json<Value>, ApiError> {
    // Unknown devices are reported before the body is validated
    if !state.registry.contains(device_id.as_str()) {
        return Err(ApiError::DeviceNotFound(device_id.to_string()));
    }

    let response = scripted_response(body)?;
    state
        .registry
        .execute(Command::RegisterResponse {
            device_id,
            key,
            response,
        })
        .map_err(ApiError::management)?;
    Ok(empty_object())
}

/// POST /manage-api/clear
pub async fn clear_all(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state
        .registry
        .execute(Command::ClearAll)
        .map_err(ApiError::management)?;
    Ok(empty_object())
}

/// POST /manage-api/devices/{device_id}/clear
pub async fn clear_device(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    state
        .registry
        .execute(Command::ClearDevice {
            device_id: device_id.into(),
        })
        .map_err(ApiError::management)?;
    Ok(empty_object())
}

/// GET /manage-api/devices/{device_id}/direct-method-calls
pub async fn device_calls(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
) -> Json<BTreeMap<String, Vec<Value>>> {
    Json(state.registry.call_history(&device_id, None))
}

/// GET /manage-api/devices/{device_id}/modules/{module_name}/direct-method-calls
pub async fn module_calls(
    State(state): State<AppState>,
    Path((device_id, module_name)): Path<(String, String)>,
) -> Json<BTreeMap<String, Vec<Value>>> {
    Json(state.registry.call_history(&device_id, Some(&module_name)))
}

/// POST /twins/{device_id}/methods
pub async fn invoke_device_method(
    State(state): State<AppState>,
    Path(device_id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Json<InvocationResponse>, ApiError> {
    invoke(&state, Invocation::from_body(device_id, None, body))
}

/// POST /twins/{device_id}/modules/{module_name}/methods
pub async fn invoke_module_method(
    State(state): State<AppState>,
    Path((device_id, module_name)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<Json<InvocationResponse>, ApiError> {
    invoke(
        &state,
        Invocation::from_body(device_id, Some(module_name), body),
    )
}

fn invoke(state: &AppState, invocation: Invocation) -> Result<Json<InvocationResponse>, ApiError> {
    match state.registry.execute(Command::Invoke(invocation))? {
        CommandOutcome::Invoked(response) => Ok(Json(response)),
        other => Err(ApiError::Internal(format!(
            "unexpected outcome for invocation: {other:?}"
        ))),
    }
}

/// Any request no route matches: log it and answer `{}`
pub async fn unknown_request(request: Request) -> Json<Value> {
    let (parts, body) = request.into_parts();

    let headers: Map<String, Value> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                Value::String(String::from_utf8_lossy(value.as_bytes()).into_owned()),
            )
        })
        .collect();

    let body = match to_bytes(body, LOGGED_BODY_LIMIT).await {
        Ok(bytes) if bytes.is_empty() => Value::Null,
        Ok(bytes) => serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) => Value::String(format!("<unreadable body: {e}>")),
    };

    let record = json!({
        "method": parts.method.as_str(),
        "uri": parts.uri.to_string(),
        "path": parts.uri.path(),
        "query": parts.uri.query(),
        "headers": headers,
        "body": body,
    });
    tracing::error!("Unknown request: {record}");

    empty_object()
}
