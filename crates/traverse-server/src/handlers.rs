// File: src/handlers.rs
// Purpose: Named handlers referenced from the routing config

use crate::request::HttpRequest;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, info};
use traverse_router::{fallback, handler, Fallback, HandlerSet, Next};

type Chain = Next<HttpRequest, Response>;

/// All handlers the routing config may name
pub fn handler_set() -> HandlerSet<HttpRequest, Response> {
    HandlerSet::new()
        .with_handler("log", handler(log))
        .with_handler("describe", handler(describe))
        .with_handler("require_json", handler(require_json))
        .with_handler("accepted", handler(accepted))
}

/// Terminal continuation: nothing in the chain produced a response
pub fn not_found() -> Fallback<HttpRequest, Response> {
    fallback(|req: HttpRequest| async move {
        debug!("No handler answered {} {}", req.method, req.path);
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "not found", "path": req.path })),
        )
            .into_response()
    })
}

async fn log(req: HttpRequest, next: Chain) -> Response {
    let resource = req
        .resolution()
        .map(|r| r.resource().to_string())
        .unwrap_or_default();
    let line = format!("{} {} -> {}", req.method, req.path, resource);

    let response = next.run(req).await;
    info!("{} [{}]", line, response.status());
    response
}

/// Echoes the resolved resource chain as JSON
async fn describe(req: HttpRequest, _next: Chain) -> Response {
    let Some(resolution) = req.resolution() else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    let chain: Vec<JsonValue> = resolution
        .chain()
        .iter()
        .map(|node| json!({ "resource": node.resource(), "key": node.key() }))
        .collect();

    Json(json!({
        "resource": resolution.resource(),
        "key": resolution.leaf().key(),
        "url": resolution.url(None),
        "name": resolution.name(),
        "unresolved": resolution.unresolved(),
        "chain": chain,
        "options": resolution.leaf().options(),
    }))
    .into_response()
}

async fn require_json(req: HttpRequest, next: Chain) -> Response {
    if !req.is_json() {
        return (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Json(json!({ "error": "expected application/json" })),
        )
            .into_response();
    }
    next.run(req).await
}

/// Accepts a JSON body addressed to the resolved resource
async fn accepted(req: HttpRequest, _next: Chain) -> Response {
    let body: JsonValue = match serde_json::from_slice(&req.body) {
        Ok(value) => value,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("invalid JSON body: {}", e) })),
            )
                .into_response()
        }
    };

    let target = req
        .resolution()
        .map(|r| r.url(Some(r.name())))
        .unwrap_or_else(|| req.path.clone());

    (
        StatusCode::ACCEPTED,
        Json(json!({ "target": target, "body": body })),
    )
        .into_response()
}
