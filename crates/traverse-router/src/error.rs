// File: src/error.rs
// Purpose: Configuration-time errors raised by registration and traversal

use thiserror::Error;

/// Errors raised while building or consulting the router configuration.
///
/// All variants are configuration mistakes, not transient failures: they are
/// reported synchronously and are expected to abort startup. A path segment that
/// no resource claims, or a request with no matching handler entry, is *not* an
/// error; those fall through to the host's fallback continuation.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A child, parent, root or path target names a resource type that was never registered
    #[error("resource type `{0}` is not registered")]
    UnregisteredResource(String),

    /// Path registration attempted before `set_root_resource`
    #[error("root resource type is not set")]
    RootNotSet,

    /// Path registration with an empty handler list
    #[error("path `{name}` on resource `{resource}` was registered without handlers")]
    MissingHandlers { resource: String, name: String },

    /// A handler reference that does not resolve to a callable handler
    #[error("handler `{name}` is not a registered handler")]
    InvalidHandler { name: String },

    /// A declarative child validator whose pattern does not compile
    #[error("invalid child pattern for resource `{resource}`")]
    InvalidPattern {
        resource: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T, E = RouterError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RouterError::UnregisteredResource("task".into()).to_string(),
            "resource type `task` is not registered"
        );
        assert_eq!(RouterError::RootNotSet.to_string(), "root resource type is not set");
        assert_eq!(
            RouterError::MissingHandlers {
                resource: "user".into(),
                name: "index".into()
            }
            .to_string(),
            "path `index` on resource `user` was registered without handlers"
        );
    }
}
