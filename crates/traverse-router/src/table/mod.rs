//! Path handler table
//!
//! Four-level lookup: resource type → path name → parent type → HTTP method,
//! each leaf holding an ordered, non-empty handler slice. Registration-time
//! validation lives in [`crate::Router`]; the table itself only stores and finds.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub mod handler;
pub use handler::{fallback, handler, BoxFuture, Fallback, Handler, HandlerSet, Next};

/// Default path name: the resource itself, with no trailing segment
pub const INDEX: &str = "index";

/// Wildcard bucket for parent type and method
pub const ALL: &str = "all";

/// Selector for a path entry; unset fields take their defaults
///
/// # Examples
///
/// ```
/// use traverse_router::PathOptions;
///
/// let options = PathOptions::new().name("edit").method("POST").parent("users");
/// assert_eq!(options.name_or_default(), "edit");
/// assert_eq!(options.method_key(), "post");
/// assert_eq!(options.parent_or_default(), "users");
///
/// let defaults = PathOptions::default();
/// assert_eq!(defaults.name_or_default(), "index");
/// assert_eq!(defaults.method_key(), "all");
/// assert_eq!(defaults.parent_or_default(), "all");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathOptions {
    pub parent: Option<String>,
    pub method: Option<String>,
    pub name: Option<String>,
}

impl PathOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or(INDEX)
    }

    pub fn parent_or_default(&self) -> &str {
        self.parent.as_deref().unwrap_or(ALL)
    }

    /// Lower-cased method, or the wildcard
    pub fn method_key(&self) -> String {
        self.method
            .as_deref()
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| ALL.to_string())
    }
}

type MethodMap<Req, Res> = HashMap<String, Arc<[Handler<Req, Res>]>>;
type ParentMap<Req, Res> = HashMap<String, MethodMap<Req, Res>>;
type NameMap<Req, Res> = HashMap<String, ParentMap<Req, Res>>;

/// Handler sequences keyed by (resource, name, parent, method)
pub struct PathTable<Req, Res> {
    paths: HashMap<String, NameMap<Req, Res>>,
}

impl<Req, Res> PathTable<Req, Res> {
    pub fn new() -> Self {
        Self {
            paths: HashMap::new(),
        }
    }

    /// Stores `handlers` under the options' key, replacing an existing entry
    pub fn insert(&mut self, resource: &str, options: &PathOptions, handlers: Vec<Handler<Req, Res>>) {
        self.paths
            .entry(resource.to_string())
            .or_default()
            .entry(options.name_or_default().to_string())
            .or_default()
            .entry(options.parent_or_default().to_string())
            .or_default()
            .insert(options.method_key(), handlers.into());
    }

    /// Finds the most specific handler sequence
    ///
    /// `name` must match exactly. Parent and method each try the exact key before
    /// the `all` bucket, in the order (parent, method), (parent, all),
    /// (all, method), (all, all).
    pub fn lookup(
        &self,
        resource: &str,
        name: &str,
        parent: &str,
        method: &str,
    ) -> Option<&Arc<[Handler<Req, Res>]>> {
        let parents = self.paths.get(resource)?.get(name)?;
        let method = method.to_ascii_lowercase();

        with_wildcard(parent)
            .filter_map(|p| parents.get(p))
            .find_map(|methods| with_wildcard(&method).find_map(|m| methods.get(m)))
    }

    /// Number of registered entries
    pub fn len(&self) -> usize {
        self.paths
            .values()
            .flat_map(|names| names.values())
            .flat_map(|parents| parents.values())
            .map(|methods| methods.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

/// Yields `key`, then `all` unless `key` already is the wildcard
fn with_wildcard(key: &str) -> impl Iterator<Item = &str> {
    std::iter::once(key).chain((key != ALL).then_some(ALL))
}

impl<Req, Res> Default for PathTable<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> fmt::Debug for PathTable<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathTable").field("entries", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    type Trail = Vec<String>;
    type Table = PathTable<Trail, Trail>;

    fn noop() -> Handler<Trail, Trail> {
        handler(|trail: Trail, next: Next<Trail, Trail>| next.run(trail))
    }

    /// Table plus the handler registered under each tag
    fn table() -> (Table, HashMap<&'static str, Handler<Trail, Trail>>) {
        let entries = [
            ("any", PathOptions::new()),
            ("get", PathOptions::new().method("GET")),
            ("users-any", PathOptions::new().parent("users")),
            ("users-delete", PathOptions::new().parent("users").method("delete")),
            ("edit", PathOptions::new().name("edit")),
        ];

        let mut table = Table::new();
        let mut tags = HashMap::new();
        for (tag, options) in entries {
            let h = noop();
            table.insert("user", &options, vec![Arc::clone(&h)]);
            tags.insert(tag, h);
        }
        (table, tags)
    }

    #[rstest]
    #[case("index", "users", "DELETE", Some("users-delete"))]
    #[case("index", "users", "get", Some("users-any"))]
    #[case("index", "team", "get", Some("get"))]
    #[case("index", "team", "post", Some("any"))]
    #[case("edit", "users", "patch", Some("edit"))]
    #[case("missing", "users", "get", None)]
    fn test_lookup_fallbacks(
        #[case] name: &str,
        #[case] parent: &str,
        #[case] method: &str,
        #[case] expected: Option<&str>,
    ) {
        let (table, tags) = table();
        let found = table.lookup("user", name, parent, method);

        match (found, expected) {
            (Some(handlers), Some(tag)) => assert!(Arc::ptr_eq(&handlers[0], &tags[tag])),
            (None, None) => {}
            (found, expected) => panic!("found {:?}, expected {:?}", found.map(|h| h.len()), expected),
        }
    }

    #[test]
    fn test_unknown_resource() {
        assert!(table().0.lookup("task", INDEX, ALL, ALL).is_none());
    }

    #[test]
    fn test_parent_bucket_without_method_falls_to_all_parent() {
        let mut table = Table::new();
        table.insert("user", &PathOptions::new().parent("users").method("post"), vec![noop()]);
        table.insert("user", &PathOptions::new().method("get"), vec![noop()]);

        assert!(table.lookup("user", INDEX, "users", "get").is_some());
        assert!(table.lookup("user", INDEX, "users", "put").is_none());
    }

    #[test]
    fn test_insert_overwrites_and_counts() {
        let (mut table, _) = table();
        assert_eq!(table.len(), 5);

        table.insert("user", &PathOptions::new().method("get"), vec![noop(), noop()]);
        assert_eq!(table.len(), 5);
        assert_eq!(table.lookup("user", INDEX, ALL, "GET").unwrap().len(), 2);

        table.clear();
        assert!(table.is_empty());
    }
}
