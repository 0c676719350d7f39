// File: src/router.rs
// Purpose: Registration API, per-request entry point and handler dispatch

use crate::chain::{build_chain, Resolution};
use crate::error::{Result, RouterError};
use crate::registry::ResourceRegistry;
use crate::resource::{Options, Resource, ResourceInstance};
use crate::table::{BoxFuture, Fallback, Handler, HandlerSet, Next, PathOptions, PathTable, ALL};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Request descriptor the router reads from and writes the resolution into
///
/// Hosts implement this for their own request type. The method string is
/// compared case-insensitively.
pub trait RouteRequest: Send + 'static {
    fn path(&self) -> &str;

    fn method(&self) -> &str;

    /// Receives the resolved chain before any handler runs
    fn attach(&mut self, resolution: Resolution);
}

/// Resource registry plus path table, with the per-request entry point
///
/// Configure through `&mut self` at startup, then share (usually as
/// `Arc<Router<..>>`) and call [`Router::handle`] per request. Holding only
/// shared references while serving keeps registration out of the request phase.
pub struct Router<Req, Res> {
    registry: ResourceRegistry,
    paths: PathTable<Req, Res>,
}

impl<Req, Res> Router<Req, Res> {
    pub fn new() -> Self {
        Self {
            registry: ResourceRegistry::new(),
            paths: PathTable::new(),
        }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    pub fn paths(&self) -> &PathTable<Req, Res> {
        &self.paths
    }

    /// See [`ResourceRegistry::register_resource`]
    pub fn register_resource<R: Resource>(&mut self, id: impl Into<String>, resource: R) {
        self.registry.register_resource(id, resource);
    }

    /// Builder form of [`Router::register_resource`]
    pub fn with_resource<R: Resource>(mut self, id: impl Into<String>, resource: R) -> Self {
        self.register_resource(id, resource);
        self
    }

    pub fn check_resource(&self, id: &str) -> Result<&Arc<dyn Resource>> {
        self.registry.check_resource(id)
    }

    pub fn set_root_resource(&mut self, id: &str) -> Result<()> {
        self.registry.set_root_resource(id)
    }

    pub fn init_resource(
        &self,
        id: &str,
        key: &str,
        parent: Option<Arc<ResourceInstance>>,
        options: Options,
    ) -> Result<Arc<ResourceInstance>> {
        self.registry.init_resource(id, key, parent, options)
    }

    /// Registers a handler sequence for `resource`
    ///
    /// # Errors
    ///
    /// - [`RouterError::RootNotSet`] before [`Router::set_root_resource`]
    /// - [`RouterError::UnregisteredResource`] for an unknown `resource` or `options.parent`
    /// - [`RouterError::MissingHandlers`] for an empty `handlers`
    pub fn register_resource_path(
        &mut self,
        resource: &str,
        options: PathOptions,
        handlers: Vec<Handler<Req, Res>>,
    ) -> Result<()> {
        if self.registry.root().is_none() {
            return Err(RouterError::RootNotSet);
        }
        self.registry.check_resource(resource)?;
        if let Some(parent) = options.parent.as_deref() {
            self.registry.check_resource(parent)?;
        }
        if handlers.is_empty() {
            return Err(RouterError::MissingHandlers {
                resource: resource.to_string(),
                name: options.name_or_default().to_string(),
            });
        }

        debug!(
            resource,
            name = options.name_or_default(),
            parent = options.parent_or_default(),
            method = %options.method_key(),
            handlers = handlers.len(),
            "path registered"
        );
        self.paths.insert(resource, &options, handlers);
        Ok(())
    }

    /// Registers a path whose handlers are looked up by name in `set`
    ///
    /// # Errors
    ///
    /// As [`Router::register_resource_path`], plus [`RouterError::InvalidHandler`]
    /// for a name `set` does not contain.
    pub fn register_named_path<S: AsRef<str>>(
        &mut self,
        resource: &str,
        options: PathOptions,
        names: &[S],
        set: &HandlerSet<Req, Res>,
    ) -> Result<()> {
        let handlers = set.resolve(names)?;
        self.register_resource_path(resource, options, handlers)
    }

    /// Handler sequence registered for `resource` under `options`, with fallbacks
    pub fn get_resource_path(
        &self,
        resource: &str,
        options: &PathOptions,
    ) -> Option<&Arc<[Handler<Req, Res>]>> {
        self.paths.lookup(
            resource,
            options.name_or_default(),
            options.parent_or_default(),
            &options.method_key(),
        )
    }

    /// Checks every resource reference; call once configuration is complete
    pub fn validate(&self) -> Result<()> {
        self.registry.validate()?;
        info!(
            resources = self.registry.len(),
            paths = self.paths.len(),
            root = self.registry.root().unwrap_or("<unset>"),
            "router configuration validated"
        );
        Ok(())
    }

    /// Walks `path` through the resource tree
    pub fn resolve(&self, path: &str) -> Result<Resolution> {
        build_chain(&self.registry, path)
    }

    /// Drops every resource type, the root and every path entry
    pub fn clear(&mut self) {
        self.registry.clear();
        self.paths.clear();
    }
}

impl<Req, Res> Router<Req, Res>
where
    Req: RouteRequest,
    Res: Send + 'static,
{
    /// Per-request entry point
    ///
    /// Resolves the request path, attaches the [`Resolution`] to `req`, and
    /// returns the future running the matched handler chain. Traversal happens
    /// before the future is returned, so configuration errors surface here and no
    /// handler runs. An unmatched path is not an error: the returned future simply
    /// calls `fallback`.
    pub fn handle(&self, mut req: Req, fallback: Fallback<Req, Res>) -> Result<BoxFuture<'static, Res>> {
        let resolution = self.resolve(req.path())?;
        let handlers = self
            .paths
            .lookup(
                resolution.resource(),
                resolution.name(),
                resolution.parent_resource().unwrap_or(ALL),
                req.method(),
            )
            .cloned();

        debug!(
            path = req.path(),
            method = req.method(),
            resource = resolution.resource(),
            name = resolution.name(),
            matched = handlers.is_some(),
            "dispatching"
        );

        req.attach(resolution);
        Ok(dispatch(handlers, req, fallback))
    }
}

/// Runs `handlers` as a continuation chain ending in `fallback`
///
/// With no (or an empty) handler sequence, control passes straight to `fallback`.
pub fn dispatch<Req, Res>(
    handlers: Option<Arc<[Handler<Req, Res>]>>,
    req: Req,
    fallback: Fallback<Req, Res>,
) -> BoxFuture<'static, Res> {
    match handlers {
        Some(handlers) if !handlers.is_empty() => Next::new(handlers, fallback).run(req),
        _ => fallback(req),
    }
}

impl<Req, Res> Default for Router<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> fmt::Debug for Router<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("registry", &self.registry)
            .field("paths", &self.paths)
            .finish()
    }
}
