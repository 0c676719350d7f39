// File: src/app.rs
// Purpose: Wires the resource router into an axum application

use crate::config::Config;
use crate::handlers::{handler_set, not_found};
use crate::request::HttpRequest;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    Router,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};
use traverse_router::Router as ResourceRouter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<ResourceRouter<HttpRequest, Response>>,
}

/// Reads the config file and applies env overrides
///
/// A file that exists but does not parse is an error; startup must not fall
/// back to defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config = Config::load(path).with_context(|| format!("Failed to load {:?}", path))?;
    Ok(config.with_env_overrides())
}

/// Builds and validates the resource router described by `config`
pub fn build_router(config: &Config) -> Result<ResourceRouter<HttpRequest, Response>> {
    let mut router = ResourceRouter::new();
    config
        .routing()?
        .apply(&mut router, &handler_set())
        .context("Failed to apply routing config")?;
    router.validate().context("Invalid routing config")?;

    info!(
        "Loaded {} resource types and {} paths",
        router.registry().len(),
        router.paths().len()
    );
    Ok(router)
}

pub fn build_app(config: &Config) -> Result<Router> {
    let state = AppState {
        router: Arc::new(build_router(config)?),
    };

    Ok(Router::new().fallback(dispatch_request).with_state(state))
}

/// Every request goes through resource traversal
async fn dispatch_request(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let req = HttpRequest::new(method, uri.path(), headers, body);

    match state.router.handle(req, not_found()) {
        Ok(response) => response.await,
        Err(e) => {
            error!("Routing failed for {}: {}", uri.path(), e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
