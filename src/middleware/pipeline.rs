use super::error_boundary::{DefaultErrorHandler, ErrorHandler, run_guarded};
use super::{Context, Request, Response};
use crate::handler::HandlerChain;
use std::sync::Arc;

/// Executes a compiled handler chain in registration order, short-circuiting
/// once a handler commits the response and routing any panic to the
/// configured [`ErrorHandler`].
pub struct Pipeline {
    error_handler: Arc<dyn ErrorHandler>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            error_handler: Arc::new(DefaultErrorHandler),
        }
    }
}

impl Pipeline {
    pub fn new(error_handler: Arc<dyn ErrorHandler>) -> Self {
        Self { error_handler }
    }

    pub async fn execute(&self, chain: &HandlerChain, req: &mut Request, res: &mut Response, ctx: &mut Context) {
        for (index, handler) in chain.handlers().iter().enumerate() {
            ctx.handler_index = index;
            match run_guarded(handler, index, &ctx.route_path, req, res, ctx).await {
                Ok(()) => {}
                Err(failure) => {
                    self.error_handler.handle(&failure, res);
                    return;
                }
            }
            if res.is_committed() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::HttpMethod;
    use crate::handler::{FnHandler, HandlerChain};

    #[tokio::test]
    async fn stops_after_response_committed() {
        let first = Arc::new(FnHandler(|_req: &mut Request, res: &mut Response, _ctx: &mut Context| async move {
            res.send(200, b"ok".to_vec());
        }));
        let second = Arc::new(FnHandler(|_req: &mut Request, res: &mut Response, _ctx: &mut Context| async move {
            res.set_header("x-second", "ran");
        }));
        let chain = HandlerChain::new(vec![first], second);
        let pipeline = Pipeline::default();
        let mut req = Request::new(HttpMethod::Get, "/x");
        let mut res = Response::new();
        let mut ctx = Context::new("/x".into(), HttpMethod::Get, 0);

        pipeline.execute(&chain, &mut req, &mut res, &mut ctx).await;

        assert_eq!(res.status, 200);
        assert!(!res.headers.contains_key("x-second"));
    }

    #[tokio::test]
    async fn panicking_handler_is_isolated_and_yields_500() {
        let boom = Arc::new(FnHandler(|_req: &mut Request, _res: &mut Response, _ctx: &mut Context| async move {
            panic!("boom");
        }));
        let chain = HandlerChain::single(boom);
        let pipeline = Pipeline::default();
        let mut req = Request::new(HttpMethod::Get, "/x");
        let mut res = Response::new();
        let mut ctx = Context::new("/x".into(), HttpMethod::Get, 0);

        pipeline.execute(&chain, &mut req, &mut res, &mut ctx).await;

        assert_eq!(res.status, 500);
    }
}
