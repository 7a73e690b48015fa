//! The handler chain contract shared by the route engine (which stores it)
//! and the middleware pipeline (which executes it). Kept outside both so
//! neither module depends on the other.

use crate::middleware::{Context, Request, Response};
use std::fmt;
use std::sync::Arc;

/// A single link in a route's handler chain: zero or more middlewares
/// followed by a mandatory terminal handler.
#[async_trait::async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, req: &mut Request, res: &mut Response, ctx: &mut Context);
}

pub type BoxHandler = Arc<dyn Handler>;

/// An ordered, non-empty, immutable handler chain compiled once at route
/// registration time. The last entry is the terminal handler; any preceding
/// entries are middlewares.
#[derive(Clone)]
pub struct HandlerChain {
    handlers: Arc<[BoxHandler]>,
}

impl fmt::Debug for HandlerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerChain")
            .field("len", &self.handlers.len())
            .finish()
    }
}

impl HandlerChain {
    /// Builds a chain from `middlewares` followed by `terminal`. Returns
    /// `None` if no terminal handler is supplied -- a chain without a
    /// terminal handler is not a valid registration.
    pub fn new(middlewares: Vec<BoxHandler>, terminal: BoxHandler) -> Self {
        let mut all = middlewares;
        all.push(terminal);
        Self {
            handlers: Arc::from(all),
        }
    }

    pub fn single(terminal: BoxHandler) -> Self {
        Self::new(Vec::new(), terminal)
    }

    pub fn handlers(&self) -> &[BoxHandler] {
        &self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// Adapts a plain async closure into a [`Handler`], mirroring the way the
/// pipeline's built-in handlers are registered.
pub struct FnHandler<F>(pub F);

#[async_trait::async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(&mut Request, &mut Response, &mut Context) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = ()> + Send,
{
    async fn call(&self, req: &mut Request, res: &mut Response, ctx: &mut Context) {
        (self.0)(req, res, ctx).await;
    }
}
