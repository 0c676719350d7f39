//! # Traverse Router
//!
//! A hierarchical resource-traversal router. A request path is walked
//! segment-by-segment through a tree of registered resource types, producing:
//! - a materialized chain of typed [`ResourceInstance`]s, root to leaf
//! - the unresolved remainder of the path, if some segment was not claimed
//! - an ordered handler chain selected by resource type, path name, HTTP method
//!   and the leaf's parent type
//!
//! ## Traversal
//!
//! Each instance resolves the next segment into a child: a literal match in its
//! type's static `children` first, then its dynamic `child` type if that type's
//! `child_validate` accepts the segment. The walk is greedy and stops at the first
//! unclaimed segment; that segment becomes the path *name* used for handler lookup.
//!
//! ## Dispatch
//!
//! Handlers are async and receive a [`Next`] continuation. The last handler's
//! `Next` leads to the host's fallback, so an exhausted chain (or no match at all)
//! hands control back to the surrounding server.
//!
//! ## Example
//!
//! ```
//! use traverse_router::{fallback, handler, Next, PathOptions, ResourceDefinition, Resolution, RouteRequest, Router};
//!
//! struct Req {
//!     path: String,
//!     method: String,
//!     resolution: Option<Resolution>,
//! }
//!
//! impl RouteRequest for Req {
//!     fn path(&self) -> &str { &self.path }
//!     fn method(&self) -> &str { &self.method }
//!     fn attach(&mut self, resolution: Resolution) { self.resolution = Some(resolution); }
//! }
//!
//! let mut router: Router<Req, String> = Router::new()
//!     .with_resource("root", ResourceDefinition::new().with_static_child("users", "users"))
//!     .with_resource("users", ResourceDefinition::new().with_child("user"))
//!     .with_resource("user", ResourceDefinition::new().with_pattern("^[0-9]+$").unwrap());
//! router.set_root_resource("root").unwrap();
//! router
//!     .register_resource_path(
//!         "user",
//!         PathOptions::new().name("edit").method("get"),
//!         vec![handler(|req: Req, _next: Next<Req, String>| async move {
//!             let leaf = req.resolution.as_ref().unwrap().leaf();
//!             format!("editing user {}", leaf.key())
//!         })],
//!     )
//!     .unwrap();
//! router.validate().unwrap();
//!
//! let req = Req { path: "/users/42/edit".into(), method: "GET".into(), resolution: None };
//! let not_found = fallback(|_req: Req| async { "404".to_string() });
//! let future = router.handle(req, not_found).unwrap();
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! assert_eq!(runtime.block_on(future), "editing user 42");
//! ```

pub mod chain;
pub mod config;
pub mod error;
pub mod path;
pub mod registry;
pub mod resource;
pub mod router;
pub mod table;

pub use chain::{build_chain, Resolution};
pub use config::{PathConfig, ResourceConfig, RoutingConfig};
pub use error::{Result, RouterError};
pub use registry::ResourceRegistry;
pub use resource::{url_for, Children, Options, Resource, ResourceDefinition, ResourceInstance};
pub use router::{dispatch, RouteRequest, Router};
pub use table::{
    fallback, handler, BoxFuture, Fallback, Handler, HandlerSet, Next, PathOptions, PathTable, ALL, INDEX,
};
