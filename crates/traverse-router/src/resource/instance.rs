//! Resource instances: the per-request nodes of the traversal tree
//!
//! An instance is built for the root and for every path segment a resource type
//! claims. Each instance owns a reference to the instance that created it, so the
//! leaf of a traversal keeps the whole chain alive until the request finishes.

use super::Options;
use crate::error::Result;
use crate::path::join_segments;
use crate::registry::ResourceRegistry;
use std::sync::Arc;

/// A node of the traversal tree
#[derive(Debug, Clone)]
pub struct ResourceInstance {
    key: String,
    parent: Option<Arc<ResourceInstance>>,
    options: Options,
    resource: String,
}

impl ResourceInstance {
    pub(crate) fn new(
        resource: impl Into<String>,
        key: impl Into<String>,
        parent: Option<Arc<ResourceInstance>>,
        options: Options,
    ) -> Self {
        Self {
            key: key.into(),
            parent,
            options,
            resource: resource.into(),
        }
    }

    /// Path segment that produced this node (empty for the root)
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Resource type id this instance was built from
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn parent(&self) -> Option<&Arc<ResourceInstance>> {
        self.parent.as_ref()
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Mutable options, typically filled in by [`crate::Resource::init`]
    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Number of ancestors (0 for the root)
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Lazy iterator over the parent chain, nearest first, excluding `self`
    ///
    /// # Examples
    ///
    /// ```
    /// use traverse_router::{ResourceDefinition, ResourceRegistry};
    ///
    /// let mut registry = ResourceRegistry::new();
    /// registry.register_resource("root", ResourceDefinition::new().with_child("item"));
    /// registry.register_resource("item", ResourceDefinition::new().with_child("item"));
    /// registry.set_root_resource("root").unwrap();
    ///
    /// let root = registry.root_instance().unwrap();
    /// let a = root.get(&registry, "a").unwrap().unwrap();
    /// let b = a.get(&registry, "b").unwrap().unwrap();
    ///
    /// let keys: Vec<&str> = b.ancestors().map(|node| node.key()).collect();
    /// assert_eq!(keys, vec!["a", ""]);
    /// ```
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.parent.as_ref(),
        }
    }

    /// Nearest ancestor of the given resource type, excluding `self`
    pub fn traverse_to(&self, resource: &str) -> Option<&Arc<ResourceInstance>> {
        self.ancestors().find(|node| node.resource == resource)
    }

    /// Root-to-leaf chain ending with `self`
    pub fn chain(self: &Arc<Self>) -> Vec<Arc<ResourceInstance>> {
        let mut chain: Vec<Arc<ResourceInstance>> = self.ancestors().cloned().collect();
        chain.reverse();
        chain.push(Arc::clone(self));
        chain
    }

    /// Absolute URL of this node, optionally extended by one trailing segment
    pub fn url(&self, extra: Option<&str>) -> String {
        url_for(self, extra)
    }

    /// Resolves one path segment into a child instance
    ///
    /// Static `children` win over the dynamic `child`; the dynamic child is only
    /// used when its type's `child_validate` accepts the segment. The matched type
    /// is constructed with `(segment, self)` as `(key, parent)` and initialised
    /// before being returned. `Ok(None)` means no type claims the segment.
    ///
    /// # Errors
    ///
    /// [`crate::RouterError::UnregisteredResource`] if this instance's type or the
    /// referenced child type is missing from `registry`.
    pub fn get(
        self: &Arc<Self>,
        registry: &ResourceRegistry,
        segment: &str,
    ) -> Result<Option<Arc<ResourceInstance>>> {
        let owner = registry.check_resource(&self.resource)?;

        if let Some(target) = owner.children().and_then(|children| children.get(segment)) {
            let child = registry.init_resource(target, segment, Some(Arc::clone(self)), Options::new())?;
            return Ok(Some(child));
        }

        if let Some(dynamic) = owner.child() {
            if registry.check_resource(dynamic)?.child_validate(segment) {
                let child = registry.init_resource(dynamic, segment, Some(Arc::clone(self)), Options::new())?;
                return Ok(Some(child));
            }
        }

        Ok(None)
    }
}

/// Iterator returned by [`ResourceInstance::ancestors`]
#[derive(Clone)]
pub struct Ancestors<'a> {
    next: Option<&'a Arc<ResourceInstance>>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Arc<ResourceInstance>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent.as_ref();
        Some(current)
    }
}

/// Rebuilds the URL of `instance` from the keys on its parent chain
///
/// Keys are joined root-to-leaf with `/` and prefixed with `/`; the root alone
/// yields `/`. `extra` is appended as a final segment.
pub fn url_for(instance: &ResourceInstance, extra: Option<&str>) -> String {
    let mut keys: Vec<&str> = instance.ancestors().map(|node| node.key()).collect();
    keys.reverse();
    keys.push(instance.key());
    keys.extend(extra);
    join_segments(keys)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceDefinition;
    use serde_json::json;

    fn registry() -> ResourceRegistry {
        let mut registry = ResourceRegistry::new();
        registry.register_resource(
            "root",
            ResourceDefinition::new().with_static_child("projects", "projects"),
        );
        registry.register_resource("projects", ResourceDefinition::new().with_child("project"));
        registry.register_resource(
            "project",
            ResourceDefinition::new()
                .with_static_child("tasks", "tasks")
                .on_init(|node| {
                    let key = node.key().to_string();
                    node.options_mut().insert("slug".into(), json!(key));
                }),
        );
        registry.register_resource(
            "tasks",
            ResourceDefinition::new().with_child("task"),
        );
        registry.register_resource(
            "task",
            ResourceDefinition::new().with_validator(|s| s.parse::<u32>().is_ok()),
        );
        registry.set_root_resource("root").unwrap();
        registry
    }

    fn walk(registry: &ResourceRegistry, segments: &[&str]) -> Arc<ResourceInstance> {
        segments.iter().fold(registry.root_instance().unwrap(), |node, segment| {
            node.get(registry, segment).unwrap().unwrap()
        })
    }

    #[test]
    fn test_static_child_sets_key_and_parent() {
        let registry = registry();
        let root = registry.root_instance().unwrap();
        let projects = root.get(&registry, "projects").unwrap().unwrap();

        assert_eq!(projects.key(), "projects");
        assert_eq!(projects.resource(), "projects");
        assert!(Arc::ptr_eq(projects.parent().unwrap(), &root));
    }

    #[test]
    fn test_dynamic_child_validation() {
        let registry = registry();
        let tasks = walk(&registry, &["projects", "alpha", "tasks"]);

        assert_eq!(tasks.get(&registry, "12").unwrap().unwrap().resource(), "task");
        assert!(tasks.get(&registry, "twelve").unwrap().is_none());
    }

    #[test]
    fn test_init_runs_with_key_set() {
        let registry = registry();
        let project = walk(&registry, &["projects", "alpha"]);
        assert_eq!(project.options().get("slug"), Some(&json!("alpha")));
    }

    #[test]
    fn test_traverse_to_finds_nearest_ancestor() {
        let registry = registry();
        let task = walk(&registry, &["projects", "alpha", "tasks", "3"]);

        let project = task.traverse_to("project").unwrap();
        assert_eq!(project.key(), "alpha");
        assert!(task.traverse_to("task").is_none());
    }

    #[test]
    fn test_chain_and_depth() {
        let registry = registry();
        let task = walk(&registry, &["projects", "alpha", "tasks", "3"]);

        let resources: Vec<String> = task.chain().iter().map(|n| n.resource().to_string()).collect();
        assert_eq!(resources, vec!["root", "projects", "project", "tasks", "task"]);
        assert_eq!(task.depth(), 4);
        assert!(task.chain()[0].is_root());
    }

    #[test]
    fn test_url_for() {
        let registry = registry();
        let root = registry.root_instance().unwrap();
        let task = walk(&registry, &["projects", "alpha", "tasks", "3"]);

        assert_eq!(url_for(&root, None), "/");
        assert_eq!(url_for(&root, Some("projects")), "/projects");
        assert_eq!(task.url(None), "/projects/alpha/tasks/3");
        assert_eq!(task.url(Some("edit")), "/projects/alpha/tasks/3/edit");
    }
}
