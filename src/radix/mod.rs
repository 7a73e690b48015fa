mod error;
mod node;
mod route;
mod tree;

pub use error::{RadixError, RadixResult};
pub use route::{CompiledRoute, RouteParam};
pub use tree::{RadixStats, RadixTree};
