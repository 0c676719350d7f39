//! Handler callbacks and the continuation that links them
//!
//! A matched path entry is an ordered slice of handlers. Rather than nesting
//! closures, the chain is driven by [`Next`]: a cursor holding the shared slice,
//! the index of the handler to run next, and the host's fallback. Calling
//! [`Next::run`] either invokes the handler at the cursor (handing it a `Next`
//! advanced by one) or, once the slice is exhausted, the fallback.

use crate::error::{Result, RouterError};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A path handler: receives the request and the continuation to the rest of the chain
pub type Handler<Req, Res> =
    Arc<dyn Fn(Req, Next<Req, Res>) -> BoxFuture<'static, Res> + Send + Sync>;

/// The host's "proceed to next system" continuation
pub type Fallback<Req, Res> = Arc<dyn Fn(Req) -> BoxFuture<'static, Res> + Send + Sync>;

/// Boxes an async closure into a [`Handler`]
///
/// # Examples
///
/// ```
/// use traverse_router::{handler, Handler, Next};
///
/// type Trail = Vec<&'static str>;
///
/// let log: Handler<Trail, Trail> = handler(|mut trail: Trail, next: Next<Trail, Trail>| async move {
///     trail.push("log");
///     next.run(trail).await
/// });
/// ```
pub fn handler<Req, Res, F, Fut>(f: F) -> Handler<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
    F: Fn(Req, Next<Req, Res>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
{
    Arc::new(move |req: Req, next: Next<Req, Res>| -> BoxFuture<'static, Res> {
        Box::pin(f(req, next))
    })
}

/// Boxes an async closure into a [`Fallback`]
pub fn fallback<Req, Res, F, Fut>(f: F) -> Fallback<Req, Res>
where
    Req: Send + 'static,
    Res: Send + 'static,
    F: Fn(Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Res> + Send + 'static,
{
    Arc::new(move |req: Req| -> BoxFuture<'static, Res> { Box::pin(f(req)) })
}

/// Continuation handed to each handler
///
/// Consuming `run` is the only way forward; a handler that drops its `Next`
/// ends the chain with its own response. A handler that never resolves stalls
/// the chain; no timeout is applied here.
pub struct Next<Req, Res> {
    handlers: Arc<[Handler<Req, Res>]>,
    index: usize,
    fallback: Fallback<Req, Res>,
}

impl<Req, Res> Next<Req, Res> {
    pub(crate) fn new(handlers: Arc<[Handler<Req, Res>]>, fallback: Fallback<Req, Res>) -> Self {
        Self {
            handlers,
            index: 0,
            fallback,
        }
    }

    /// Invokes the next handler, or the fallback once the chain is exhausted
    pub fn run(self, req: Req) -> BoxFuture<'static, Res> {
        let Next {
            handlers,
            index,
            fallback,
        } = self;

        match handlers.get(index).cloned() {
            Some(current) => {
                let next = Next {
                    handlers,
                    index: index + 1,
                    fallback,
                };
                current(req, next)
            }
            None => fallback(req),
        }
    }

    /// True when `run` will call the fallback rather than another handler
    pub fn is_fallback(&self) -> bool {
        self.index >= self.handlers.len()
    }

    /// Handlers still ahead of this continuation
    pub fn remaining(&self) -> usize {
        self.handlers.len().saturating_sub(self.index)
    }
}

impl<Req, Res> fmt::Debug for Next<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("index", &self.index)
            .field("len", &self.handlers.len())
            .finish()
    }
}

/// Handlers addressable by name, for declarative path registration
pub struct HandlerSet<Req, Res> {
    handlers: HashMap<String, Handler<Req, Res>>,
}

impl<Req, Res> HandlerSet<Req, Res> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Adds or replaces a named handler
    pub fn with_handler(mut self, name: impl Into<String>, handler: Handler<Req, Res>) -> Self {
        self.insert(name, handler);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, handler: Handler<Req, Res>) {
        self.handlers.insert(name.into(), handler);
    }

    pub fn get(&self, name: &str) -> Option<&Handler<Req, Res>> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Resolves names to handlers, preserving order
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidHandler`] for the first name with no handler behind it.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Handler<Req, Res>>> {
        names
            .iter()
            .map(|name| {
                self.get(name.as_ref())
                    .cloned()
                    .ok_or_else(|| RouterError::InvalidHandler {
                        name: name.as_ref().to_string(),
                    })
            })
            .collect()
    }
}

impl<Req, Res> Default for HandlerSet<Req, Res> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Res> fmt::Debug for HandlerSet<Req, Res> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.handlers.keys().collect();
        names.sort();
        f.debug_struct("HandlerSet").field("handlers", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Trail = Vec<String>;

    fn step(label: &'static str) -> Handler<Trail, Trail> {
        handler(move |mut trail: Trail, next: Next<Trail, Trail>| async move {
            trail.push(label.to_string());
            next.run(trail).await
        })
    }

    fn terminal() -> Fallback<Trail, Trail> {
        fallback(|mut trail: Trail| async move {
            trail.push("fallback".to_string());
            trail
        })
    }

    #[tokio::test]
    async fn test_next_walks_handlers_then_fallback() {
        let handlers: Arc<[Handler<Trail, Trail>]> = vec![step("a"), step("b")].into();
        let trail = Next::new(handlers, terminal()).run(Vec::new()).await;
        assert_eq!(trail, vec!["a", "b", "fallback"]);
    }

    #[tokio::test]
    async fn test_handler_can_short_circuit() {
        let stop: Handler<Trail, Trail> = handler(|mut trail: Trail, _next| async move {
            trail.push("stop".to_string());
            trail
        });
        let handlers: Arc<[Handler<Trail, Trail>]> = vec![step("a"), stop, step("never")].into();

        let trail = Next::new(handlers, terminal()).run(Vec::new()).await;
        assert_eq!(trail, vec!["a", "stop"]);
    }

    #[test]
    fn test_next_position() {
        let handlers: Arc<[Handler<Trail, Trail>]> = vec![step("a")].into();
        let next = Next::new(Arc::clone(&handlers), terminal());
        assert!(!next.is_fallback());
        assert_eq!(next.remaining(), 1);

        let empty: Arc<[Handler<Trail, Trail>]> = Vec::new().into();
        assert!(Next::new(empty, terminal()).is_fallback());
    }

    #[test]
    fn test_handler_set_resolve() {
        let set = HandlerSet::new().with_handler("a", step("a")).with_handler("b", step("b"));
        assert_eq!(set.len(), 2);
        assert!(set.contains("a"));
        assert!(!set.contains("missing"));
        assert_eq!(set.resolve(&["b", "a"]).unwrap().len(), 2);

        match set.resolve(&["a", "missing"]) {
            Err(RouterError::InvalidHandler { name }) => assert_eq!(name, "missing"),
            other => panic!("unexpected: {:?}", other.map(|h| h.len())),
        }
    }
}
