//! Path utilities for splitting request paths and joining resource keys
//!
//! All functions are **pure**: given same input, always produce same output with no side effects.

/// Splits a request path into its non-empty segments
///
/// Leading, trailing and repeated slashes collapse, so `//users/42/` and
/// `/users/42` yield the same segments. Segments are returned verbatim; no
/// percent-decoding is performed.
///
/// # Examples
///
/// ```
/// use traverse_router::path::split_segments;
///
/// assert_eq!(split_segments("/users/42/edit"), vec!["users", "42", "edit"]);
/// assert_eq!(split_segments("//users///42/"), vec!["users", "42"]);
/// assert!(split_segments("/").is_empty());
/// ```
pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Joins keys into an absolute URL path
///
/// Empty keys are skipped, so the root sentinel never produces a double slash.
/// An empty key list yields `/`.
///
/// # Examples
///
/// ```
/// use traverse_router::path::join_segments;
///
/// assert_eq!(join_segments(["users", "42"]), "/users/42");
/// assert_eq!(join_segments(["", "users"]), "/users");
/// assert_eq!(join_segments(Vec::<&str>::new()), "/");
/// ```
pub fn join_segments<I, S>(keys: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = keys
        .into_iter()
        .filter(|k| !k.as_ref().is_empty())
        .fold(String::new(), |mut acc, key| {
            acc.push('/');
            acc.push_str(key.as_ref());
            acc
        });

    if joined.is_empty() {
        "/".to_string()
    } else {
        joined
    }
}
