// File: src/config.rs
// Purpose: Declarative routing configuration from a TOML file

use crate::error::RouterError;
use crate::resource::ResourceDefinition;
use crate::router::Router;
use crate::table::{HandlerSet, PathOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Resource tree and path table described as data
///
/// ```toml
/// root = "root"
///
/// [resources.root]
/// children = { users = "users" }
///
/// [resources.users]
/// child = "user"
///
/// [resources.user]
/// pattern = "^[0-9]+$"
///
/// [[paths]]
/// resource = "user"
/// method = "get"
/// handlers = ["load_user", "show_user"]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Entry resource type
    #[serde(default)]
    pub root: Option<String>,

    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfig>,

    #[serde(default)]
    pub paths: Vec<PathConfig>,
}

/// One resource type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Dynamically keyed child type
    #[serde(default)]
    pub child: Option<String>,

    /// Literal segment → child type
    #[serde(default)]
    pub children: BTreeMap<String, String>,

    /// Regex a segment must match for this type to be built as a dynamic child
    #[serde(default)]
    pub pattern: Option<String>,
}

/// One path entry; handlers are named entries of a [`HandlerSet`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    pub resource: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub parent: Option<String>,

    #[serde(default)]
    pub method: Option<String>,

    #[serde(default)]
    pub handlers: Vec<String>,
}

impl ResourceConfig {
    /// Builds the resource definition this entry describes
    pub fn to_definition(&self, id: &str) -> Result<ResourceDefinition, RouterError> {
        let mut definition = ResourceDefinition::new().with_static_children(self.children.clone());

        if let Some(child) = &self.child {
            definition = definition.with_child(child.clone());
        }

        match &self.pattern {
            Some(pattern) => definition.with_pattern(pattern).map_err(|source| RouterError::InvalidPattern {
                resource: id.to_string(),
                source,
            }),
            None => Ok(definition),
        }
    }
}

impl PathConfig {
    pub fn options(&self) -> PathOptions {
        PathOptions {
            parent: self.parent.clone(),
            method: self.method.clone(),
            name: self.name.clone(),
        }
    }
}

impl RoutingConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing or empty file yields the empty default configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read routing config: {:?}", path))?;

        Self::from_toml(&content).with_context(|| format!("Failed to parse routing config: {:?}", path))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(toml::from_str(content)?)
    }

    /// Registers everything this configuration declares into `router`
    ///
    /// Resources first, then the root, then a full reference check, then paths,
    /// so the first error reported is the earliest configuration mistake.
    pub fn apply<Req, Res>(
        &self,
        router: &mut Router<Req, Res>,
        handlers: &HandlerSet<Req, Res>,
    ) -> Result<(), RouterError> {
        for (id, resource) in &self.resources {
            router.register_resource(id.clone(), resource.to_definition(id)?);
        }

        if let Some(root) = &self.root {
            router.set_root_resource(root)?;
        }

        router.registry().validate()?;

        for path in &self.paths {
            router.register_named_path(&path.resource, path.options(), path.handlers.as_slice(), handlers)?;
        }

        Ok(())
    }
}
