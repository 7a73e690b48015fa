use super::error::{ConfigError, ConfigResult};
use crate::cache::CacheConfig;
use crate::cluster::{ClusterConfig, WorkerBootConfig};
use crate::pool::WorkerTaskPoolConfig;
use crate::request::RequestManagerConfig;
use std::path::Path;

const DEFAULT_CONFIG_PATH: &str = "./xypriss.config.json";
const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeEnv {
    Development,
    Production,
    Worker,
}

impl NodeEnv {
    pub fn from_env() -> Self {
        match std::env::var("NODE_ENV").as_deref() {
            Ok("production") => NodeEnv::Production,
            Ok("worker") => NodeEnv::Worker,
            _ => NodeEnv::Development,
        }
    }
}

/// The full, ambient configuration surface: one section per subsystem. Any
/// field absent from a loaded JSON file falls back to that subsystem's
/// default.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct XyPrissConfig {
    #[serde(default = "NodeEnv::from_env")]
    pub node_env: NodeEnv,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub pool: WorkerTaskPoolConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub request: RequestManagerConfig,
}

impl Default for XyPrissConfig {
    fn default() -> Self {
        Self {
            node_env: NodeEnv::from_env(),
            cache: CacheConfig::default(),
            pool: WorkerTaskPoolConfig::default(),
            cluster: ClusterConfig::default(),
            request: RequestManagerConfig::default(),
        }
    }
}

/// Loads configuration the way a master process does: from a JSON file,
/// path validated against traversal and an oversized-file attack, falling
/// back to defaults if no file is present at the resolved path.
pub fn load() -> ConfigResult<XyPrissConfig> {
    let config_path = std::env::var("XYPRISS_CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let path = Path::new(&config_path);

    if !path.exists() {
        tracing::debug!(path = %config_path, "no config file found; using defaults");
        return Ok(XyPrissConfig::default());
    }

    let canonical = path.canonicalize()?;
    let current_dir = std::env::current_dir()?;
    if !canonical.starts_with(&current_dir) {
        return Err(ConfigError::PathTraversal(config_path));
    }

    let metadata = std::fs::metadata(&canonical)?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::TooLarge { len: metadata.len(), max: MAX_CONFIG_FILE_SIZE });
    }

    let raw = std::fs::read_to_string(&canonical)?;
    let config: XyPrissConfig = serde_json::from_str(&raw)?;
    tracing::info!(path = %config_path, "loaded configuration");
    Ok(config)
}

/// Loads configuration the way a re-execed worker does: the supervisor
/// pushes it inline as JSON over `XYPRISS_SERVER_CONFIG` rather than a file
/// on disk. Returns `None` when the variable is absent (e.g. running
/// standalone, outside a cluster).
pub fn load_worker_boot_config() -> ConfigResult<Option<WorkerBootConfig>> {
    match std::env::var("XYPRISS_SERVER_CONFIG") {
        Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        Err(_) => Ok(None),
    }
}

pub fn is_cluster_worker() -> bool {
    std::env::var("CLUSTER_MODE").as_deref() == Ok("true")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Guards tests that mutate process-wide env vars; `cargo test` runs
    // tests in this module on multiple threads by default.
    static ENV_GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn default_config_round_trips_through_json() {
        let config = XyPrissConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored: XyPrissConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.node_env, config.node_env);
    }

    #[test]
    fn missing_fields_fall_back_to_subsystem_defaults() {
        let config: XyPrissConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.pool.max_concurrent_tasks, WorkerTaskPoolConfig::default().max_concurrent_tasks);
    }

    #[test]
    fn node_env_from_env_defaults_to_development() {
        let _guard = ENV_GUARD.lock().unwrap();
        unsafe {
            std::env::remove_var("NODE_ENV");
        }
        assert_eq!(NodeEnv::from_env(), NodeEnv::Development);
    }

    #[test]
    fn node_env_from_env_reads_production() {
        let _guard = ENV_GUARD.lock().unwrap();
        unsafe {
            std::env::set_var("NODE_ENV", "production");
        }
        assert_eq!(NodeEnv::from_env(), NodeEnv::Production);
        unsafe {
            std::env::remove_var("NODE_ENV");
        }
    }

    #[test]
    fn is_cluster_worker_reads_cluster_mode() {
        let _guard = ENV_GUARD.lock().unwrap();
        unsafe {
            std::env::remove_var("CLUSTER_MODE");
        }
        assert!(!is_cluster_worker());
        unsafe {
            std::env::set_var("CLUSTER_MODE", "true");
        }
        assert!(is_cluster_worker());
        unsafe {
            std::env::remove_var("CLUSTER_MODE");
        }
    }

    #[test]
    fn load_worker_boot_config_parses_xypriss_server_config() {
        let _guard = ENV_GUARD.lock().unwrap();
        let boot = WorkerBootConfig {
            worker_id: 3,
            port: 3003,
            cache: None,
            ipc_key: None,
        };
        unsafe {
            std::env::set_var("XYPRISS_SERVER_CONFIG", serde_json::to_string(&boot).unwrap());
        }
        let loaded = load_worker_boot_config().unwrap().unwrap();
        assert_eq!(loaded.worker_id, 3);
        assert_eq!(loaded.port, 3003);
        unsafe {
            std::env::remove_var("XYPRISS_SERVER_CONFIG");
        }
    }

    #[test]
    fn load_worker_boot_config_absent_is_none() {
        let _guard = ENV_GUARD.lock().unwrap();
        unsafe {
            std::env::remove_var("XYPRISS_SERVER_CONFIG");
        }
        assert!(load_worker_boot_config().unwrap().is_none());
    }
}
