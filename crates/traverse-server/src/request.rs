// File: src/request.rs
// Purpose: Request descriptor handed through the handler chain

use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use traverse_router::{Resolution, RouteRequest};

/// Owned view of an incoming request plus the router's resolution
pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
    resolution: Option<Resolution>,
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

impl HttpRequest {
    pub fn new(method: Method, path: impl Into<String>, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
            resolution: None,
        }
    }

    /// Set by the router before the first handler runs
    pub fn resolution(&self) -> Option<&Resolution> {
        self.resolution.as_ref()
    }

    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn is_json(&self) -> bool {
        self.get_header("content-type")
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }
}

impl RouteRequest for HttpRequest {
    fn path(&self) -> &str {
        &self.path
    }

    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn attach(&mut self, resolution: Resolution) {
        self.resolution = Some(resolution);
    }
}
