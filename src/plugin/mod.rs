mod hook;
mod registry;

pub use hook::{Plugin, RateLimitInfo};
pub use registry::PluginRegistry;
