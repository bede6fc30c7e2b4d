//! Route table
//!
//! A path that matches but is called with an unrouted method is treated the
//! same as an unknown path: logged and answered with `{}`.

use crate::handlers;
use crate::AppState;
use axum::routing::{get, post, put, MethodRouter};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

fn route(method_router: MethodRouter<AppState>) -> MethodRouter<AppState> {
    method_router.fallback(handlers::unknown_request)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", route(get(handlers::health)))
        .route("/manage-api/cert", route(get(handlers::certificate)))
        .route("/manage-api/clear", route(post(handlers::clear_all)))
        .route(
            "/manage-api/devices/{device_id}",
            route(put(handlers::create_device)),
        )
        .route(
            "/manage-api/devices/{device_id}/twin",
            route(put(handlers::update_twin).get(handlers::twin_history)),
        )
        .route(
            "/manage-api/devices/{device_id}/clear",
            route(post(handlers::clear_device)),
        )
        .route(
            "/manage-api/devices/{device_id}/direct-method-response/methods/{method_name}",
            route(put(handlers::register_device_response)),
        )
        .route(
            "/manage-api/devices/{device_id}/direct-method-response/modules/{module_name}/methods/{method_name}",
            route(put(handlers::register_module_response)),
        )
        .route(
            "/manage-api/devices/{device_id}/direct-method-calls",
            route(get(handlers::device_calls)),
        )
        .route(
            "/manage-api/devices/{device_id}/modules/{module_name}/direct-method-calls",
            route(get(handlers::module_calls)),
        )
        .route(
            "/twins/{device_id}/methods",
            route(post(handlers::invoke_device_method)),
        )
        .route(
            "/twins/{device_id}/modules/{module_name}/methods",
            route(post(handlers::invoke_module_method)),
        )
        .fallback(handlers::unknown_request)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
