mod context;
mod error_boundary;
mod pipeline;
mod request;
mod response;

pub use context::Context;
pub use error_boundary::{DefaultErrorHandler, ErrorHandler, HandlerFailure};
pub use pipeline::Pipeline;
pub use request::Request;
pub use response::Response;
