mod external;
mod panel;

pub use external::{ExternalComponentStatus, ExternalStatusRegistry};
pub use panel::AdminPanel;
