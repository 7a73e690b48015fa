mod errors;
mod options;
mod service;

pub use errors::{RouterError, RouterResult};
pub use options::RouterOptions;
pub use service::{Router, RouteSpec};
