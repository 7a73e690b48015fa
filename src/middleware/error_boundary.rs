//! Catches handler panics so one broken handler cannot take down the worker
//! process, and records the failure site for the configured error handler.

use super::{Context, Request, Response};
use crate::handler::BoxHandler;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;

#[derive(Debug, Clone)]
pub struct HandlerFailure {
    pub route_path: String,
    pub handler_index: usize,
    pub message: String,
}

/// A component-level error handler invoked when a handler panics. The
/// default implementation writes a 500 with no body detail leaked to the
/// client; plugins may intercept via [`crate::plugin`] hooks before this runs.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, failure: &HandlerFailure, res: &mut Response);
}

#[derive(Debug, Default)]
pub struct DefaultErrorHandler;

impl ErrorHandler for DefaultErrorHandler {
    fn handle(&self, failure: &HandlerFailure, res: &mut Response) {
        tracing::error!(
            route = %failure.route_path,
            handler_index = failure.handler_index,
            error = %failure.message,
            "handler panicked; responding 500"
        );
        res.send_json(
            500,
            &serde_json::json!({ "error": "internal_error", "route": failure.route_path }),
        );
    }
}

/// Runs one handler under `catch_unwind`, returning `Err` with the recorded
/// failure site if it panicked.
pub async fn run_guarded(
    handler: &BoxHandler,
    index: usize,
    route_path: &str,
    req: &mut Request,
    res: &mut Response,
    ctx: &mut Context,
) -> Result<(), HandlerFailure> {
    let result = AssertUnwindSafe(handler.call(req, res, ctx)).catch_unwind().await;
    result.map_err(|panic| HandlerFailure {
        route_path: route_path.to_string(),
        handler_index: index,
        message: panic_message(&panic),
    })
}

fn panic_message(panic: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked with a non-string payload".to_string()
    }
}
