// File: src/registry.rs
// Purpose: Resource type registry and instance construction

use crate::error::{Result, RouterError};
use crate::resource::{Options, Resource, ResourceInstance};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Maps resource type ids to their behaviour and acts as the instance factory
///
/// Populated during startup through `&mut self`, then shared read-only while
/// requests are served.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, Arc<dyn Resource>>,
    root: Option<String>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a resource type under `id`, replacing any previous registration
    pub fn register_resource<R: Resource>(&mut self, id: impl Into<String>, resource: R) {
        let id = id.into();
        if self.resources.insert(id.clone(), Arc::new(resource)).is_some() {
            debug!(resource = %id, "resource type re-registered");
        } else {
            debug!(resource = %id, "resource type registered");
        }
    }

    /// Looks up a resource type, failing if it was never registered
    pub fn check_resource(&self, id: &str) -> Result<&Arc<dyn Resource>> {
        self.resources
            .get(id)
            .ok_or_else(|| RouterError::UnregisteredResource(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    /// Fixes the entry type of the traversal tree
    pub fn set_root_resource(&mut self, id: &str) -> Result<()> {
        self.check_resource(id)?;
        self.root = Some(id.to_string());
        debug!(resource = %id, "root resource set");
        Ok(())
    }

    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    /// Builds a fresh root instance (key `""`, no parent)
    pub fn root_instance(&self) -> Result<Arc<ResourceInstance>> {
        let root = self.root.as_deref().ok_or(RouterError::RootNotSet)?;
        self.init_resource(root, "", None, Options::new())
    }

    /// Constructs an instance of `id` and runs its `init` hook
    ///
    /// Bypasses traversal; useful for building instances out of band.
    ///
    /// # Examples
    ///
    /// ```
    /// use traverse_router::{Options, ResourceDefinition, ResourceRegistry};
    ///
    /// let mut registry = ResourceRegistry::new();
    /// registry.register_resource("user", ResourceDefinition::new());
    ///
    /// let user = registry.init_resource("user", "42", None, Options::new()).unwrap();
    /// assert_eq!(user.key(), "42");
    /// assert_eq!(user.resource(), "user");
    ///
    /// assert!(registry.init_resource("ghost", "1", None, Options::new()).is_err());
    /// ```
    pub fn init_resource(
        &self,
        id: &str,
        key: &str,
        parent: Option<Arc<ResourceInstance>>,
        options: Options,
    ) -> Result<Arc<ResourceInstance>> {
        let resource = self.check_resource(id)?;
        let mut instance = ResourceInstance::new(id, key, parent, options);
        resource.init(&mut instance);
        Ok(Arc::new(instance))
    }

    /// Checks that every declared child reference and the root name registered types
    ///
    /// Types are visited in id order so the reported error is deterministic.
    pub fn validate(&self) -> Result<()> {
        if let Some(root) = &self.root {
            self.check_resource(root)?;
        }

        for id in self.ids() {
            let resource = self.check_resource(id)?;
            if let Some(child) = resource.child() {
                self.check_resource(child)?;
            }
            for target in resource.children().into_iter().flat_map(|c| c.values()) {
                self.check_resource(target)?;
            }
        }

        Ok(())
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.resources.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Forgets every type and the root
    pub fn clear(&mut self) {
        self.resources.clear();
        self.root = None;
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resources", &self.ids())
            .field("root", &self.root)
            .finish()
    }
}
