mod concurrency;
mod config;
mod error;
mod lifecycle;
mod manager;
mod network_quality;

pub use concurrency::{ConcurrencySlot, ConcurrencyTracker};
pub use config::{NetworkQualityConfig, RequestManagerConfig};
pub use error::{RejectionReason, RequestError, TIMEOUT_STATUS};
pub use lifecycle::{LifecycleStage, LifecycleTracker};
pub use manager::{AdmittedRequest, RequestManager};
pub use network_quality::NetworkQualityGate;
