mod bus;
mod event;
mod subscriber;

pub use bus::TelemetryBus;
pub use event::TelemetryEvent;
pub use subscriber::init_tracing;
