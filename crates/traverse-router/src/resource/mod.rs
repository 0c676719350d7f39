//! Resource types: the behaviour shared by every instance of a registered type
//!
//! A resource type decides which path segments may become its children and how a
//! freshly constructed instance is initialised. Types are registered once at
//! startup (see [`crate::ResourceRegistry`]) and consulted on every request.

use regex::Regex;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub mod instance;
pub use instance::{url_for, Ancestors, ResourceInstance};

/// Free-form data carried by an instance
pub type Options = Map<String, Value>;

/// Literal segment name → resource type id
pub type Children = BTreeMap<String, String>;

/// Predicate accepting or rejecting a dynamic child segment
pub type Validator = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Post-construction hook run once per instance
pub type InitHook = Arc<dyn Fn(&mut ResourceInstance) + Send + Sync>;

/// Behaviour of a registered resource type
///
/// Every method has a default, so a unit struct implementing `Resource` is a
/// valid leaf type with no children.
///
/// # Examples
///
/// ```
/// use traverse_router::{Resource, ResourceInstance};
///
/// struct Task;
///
/// impl Resource for Task {
///     fn child_validate(&self, segment: &str) -> bool {
///         segment.parse::<u64>().is_ok()
///     }
///
///     fn init(&self, instance: &mut ResourceInstance) {
///         let id = instance.key().to_string();
///         instance.options_mut().insert("id".into(), id.into());
///     }
/// }
/// ```
pub trait Resource: Send + Sync + 'static {
    /// Type id of the dynamically keyed child, if any
    fn child(&self) -> Option<&str> {
        None
    }

    /// Static, exact-match children
    fn children(&self) -> Option<&Children> {
        None
    }

    /// Whether `segment` may instantiate this type as a dynamic child
    fn child_validate(&self, segment: &str) -> bool {
        !segment.is_empty()
    }

    /// Runs once right after construction, before the instance is shared.
    /// `key` and `parent` are already set.
    fn init(&self, _instance: &mut ResourceInstance) {}
}

/// Declarative resource type built from closures and maps
///
/// # Examples
///
/// ```
/// use traverse_router::{Resource, ResourceDefinition};
///
/// let users = ResourceDefinition::new()
///     .with_static_child("me", "profile")
///     .with_child("user");
///
/// assert_eq!(users.child(), Some("user"));
/// assert_eq!(users.children().unwrap().get("me"), Some(&"profile".to_string()));
///
/// let user = ResourceDefinition::new()
///     .with_validator(|segment| segment.chars().all(|c| c.is_ascii_digit()));
///
/// assert!(user.child_validate("42"));
/// assert!(!user.child_validate("abc"));
/// ```
#[derive(Clone, Default)]
pub struct ResourceDefinition {
    child: Option<String>,
    children: Children,
    validator: Option<Validator>,
    init: Option<InitHook>,
}

impl ResourceDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dynamically keyed child type
    pub fn with_child(mut self, resource: impl Into<String>) -> Self {
        self.child = Some(resource.into());
        self
    }

    /// Adds a literal child segment
    pub fn with_static_child(
        mut self,
        segment: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        self.children.insert(segment.into(), resource.into());
        self
    }

    /// Adds several literal child segments at once
    pub fn with_static_children<I, K, V>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.children
            .extend(children.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Replaces the default non-empty check for dynamic segments
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Accepts dynamic segments matching `pattern`
    ///
    /// The pattern is unanchored regex syntax; use `^...$` to match whole segments.
    pub fn with_pattern(self, pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        Ok(self.with_validator(move |segment| regex.is_match(segment)))
    }

    /// Sets the post-construction hook
    pub fn on_init<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut ResourceInstance) + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(hook));
        self
    }
}

impl Resource for ResourceDefinition {
    fn child(&self) -> Option<&str> {
        self.child.as_deref()
    }

    fn children(&self) -> Option<&Children> {
        if self.children.is_empty() {
            None
        } else {
            Some(&self.children)
        }
    }

    fn child_validate(&self, segment: &str) -> bool {
        match &self.validator {
            Some(validator) => validator(segment),
            None => !segment.is_empty(),
        }
    }

    fn init(&self, instance: &mut ResourceInstance) {
        if let Some(hook) = &self.init {
            hook(instance);
        }
    }
}

impl fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDefinition")
            .field("child", &self.child)
            .field("children", &self.children)
            .field("validator", &self.validator.is_some())
            .field("init", &self.init.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf;
    impl Resource for Leaf {}

    #[test]
    fn test_trait_defaults() {
        let leaf = Leaf;
        assert!(leaf.child().is_none());
        assert!(leaf.children().is_none());
        assert!(leaf.child_validate("anything"));
        assert!(!leaf.child_validate(""));

        let mut instance = ResourceInstance::new("leaf", "7", None, Options::new());
        leaf.init(&mut instance);
        assert_eq!(instance.key(), "7");
        assert!(instance.options().is_empty());
    }

    #[test]
    fn test_definition_without_children_reports_none() {
        let def = ResourceDefinition::new().with_child("item");
        assert!(def.children().is_none());
        assert_eq!(def.child(), Some("item"));
    }

    #[test]
    fn test_with_pattern() {
        let def = ResourceDefinition::new().with_pattern("^[0-9]+$").unwrap();
        assert!(def.child_validate("42"));
        assert!(!def.child_validate("4a2"));

        assert!(ResourceDefinition::new().with_pattern("[unclosed").is_err());
    }

    #[test]
    fn test_static_children_batch() {
        let def = ResourceDefinition::new().with_static_children([("users", "users"), ("me", "profile")]);
        let children = def.children().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children.get("me").map(String::as_str), Some("profile"));
    }
}
