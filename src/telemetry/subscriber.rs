use tracing_subscriber::{EnvFilter, fmt};

/// Installs the process-wide `tracing` subscriber. Honors `RUST_LOG`,
/// defaulting to `info` when unset. Safe to call once per process; a worker
/// process re-execed by the cluster supervisor calls this again in its own
/// address space.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(true).try_init();
}
