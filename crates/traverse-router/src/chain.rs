// File: src/chain.rs
// Purpose: Chain builder - turns a request path into a resolved resource chain

use crate::error::Result;
use crate::path::split_segments;
use crate::registry::ResourceRegistry;
use crate::resource::ResourceInstance;
use crate::table::INDEX;
use std::sync::Arc;
use tracing::debug;

/// Outcome of walking a request path through the resource tree
///
/// `leaf` is the deepest instance that claimed a segment (the root if none did);
/// `unresolved` holds the first segment no resource claimed plus everything after it.
#[derive(Debug, Clone)]
pub struct Resolution {
    leaf: Arc<ResourceInstance>,
    unresolved: Vec<String>,
}

impl Resolution {
    pub fn leaf(&self) -> &Arc<ResourceInstance> {
        &self.leaf
    }

    /// Resource type id of the leaf
    pub fn resource(&self) -> &str {
        self.leaf.resource()
    }

    pub fn unresolved(&self) -> &[String] {
        &self.unresolved
    }

    /// True when every segment was claimed by a resource
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Path name used for handler lookup: first unresolved segment, or `index`
    pub fn name(&self) -> &str {
        self.unresolved.first().map(String::as_str).unwrap_or(INDEX)
    }

    /// Resource type id of the leaf's parent, if the leaf is not the root
    pub fn parent_resource(&self) -> Option<&str> {
        self.leaf.parent().map(|parent| parent.resource())
    }

    /// Root-to-leaf instances
    pub fn chain(&self) -> Vec<Arc<ResourceInstance>> {
        self.leaf.chain()
    }

    /// Nearest ancestor of the leaf with the given type
    pub fn traverse_to(&self, resource: &str) -> Option<&Arc<ResourceInstance>> {
        self.leaf.traverse_to(resource)
    }

    /// URL of the leaf, optionally extended by one trailing segment
    pub fn url(&self, extra: Option<&str>) -> String {
        self.leaf.url(extra)
    }
}

/// Walks `path` from the root, one segment at a time
///
/// Greedy and leftmost-first: each segment is offered to the current instance
/// only, and the walk stops at the first segment it cannot claim. There is no
/// backtracking to reinterpret earlier segments.
///
/// # Examples
///
/// ```
/// use traverse_router::{build_chain, ResourceDefinition, ResourceRegistry};
///
/// let mut registry = ResourceRegistry::new();
/// registry.register_resource("root", ResourceDefinition::new().with_static_child("users", "users"));
/// registry.register_resource("users", ResourceDefinition::new().with_child("user"));
/// registry.register_resource(
///     "user",
///     ResourceDefinition::new().with_validator(|s| s.chars().all(|c| c.is_ascii_digit())),
/// );
/// registry.set_root_resource("root").unwrap();
///
/// let resolution = build_chain(&registry, "/users/42/edit").unwrap();
/// assert_eq!(resolution.leaf().key(), "42");
/// assert_eq!(resolution.unresolved(), ["edit".to_string()]);
/// assert_eq!(resolution.name(), "edit");
/// ```
pub fn build_chain(registry: &ResourceRegistry, path: &str) -> Result<Resolution> {
    let segments = split_segments(path);
    let mut current = registry.root_instance()?;

    for (index, segment) in segments.iter().enumerate() {
        match current.get(registry, segment)? {
            Some(child) => current = child,
            None => {
                let unresolved: Vec<String> = segments[index..].iter().map(|s| s.to_string()).collect();
                debug!(
                    path,
                    resource = current.resource(),
                    segment = *segment,
                    "traversal stopped at unclaimed segment"
                );
                return Ok(Resolution {
                    leaf: current,
                    unresolved,
                });
            }
        }
    }

    debug!(path, resource = current.resource(), "traversal complete");
    Ok(Resolution {
        leaf: current,
        unresolved: Vec::new(),
    })
}
