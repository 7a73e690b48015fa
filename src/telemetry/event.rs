use std::time::Duration;

/// Structured events surfaced alongside `tracing` output, for consumers that
/// want to subscribe programmatically (e.g. the admin metrics endpoint)
/// instead of scraping logs.
#[derive(Debug, Clone)]
pub enum TelemetryEvent {
    /// A request-lifecycle stage took longer than its configured warning
    /// threshold. Non-fatal: the request is not failed because of this.
    StageThresholdExceeded {
        stage: &'static str,
        elapsed: Duration,
        threshold: Duration,
    },
    /// A request was rejected by the Request Manager before reaching the
    /// handler chain.
    RequestRejected { reason: &'static str, status: u16 },
    /// A plugin hook raised an error; isolated to that plugin.
    PluginHookFailed { plugin: String, hook: &'static str },
}
