use std::env;
use std::path::PathBuf;

use corelog_core::Config as LogConfig;

/// Server configuration, loaded from environment variables with sensible
/// defaults — a placeholder for a richer `config`-crate-backed loader.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_config: LogConfig,
}

impl ServerConfig {
    /// Reads `COMMITLOG_HOST`, `COMMITLOG_PORT`, `COMMITLOG_DATA_DIR`,
    /// `COMMITLOG_MAX_STORE_BYTES`, and `COMMITLOG_MAX_INDEX_BYTES` from the
    /// environment, falling back to defaults for anything unset or
    /// unparsable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        ServerConfig {
            host: env::var("COMMITLOG_HOST").unwrap_or(defaults.host),
            port: env::var("COMMITLOG_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            data_dir: env::var("COMMITLOG_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            log_config: LogConfig {
                max_store_bytes: env::var("COMMITLOG_MAX_STORE_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.log_config.max_store_bytes),
                max_index_bytes: env::var("COMMITLOG_MAX_INDEX_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.log_config.max_index_bytes),
                initial_offset: defaults.log_config.initial_offset,
            },
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            data_dir: PathBuf::from("./commitlog_data"),
            log_config: LogConfig {
                max_store_bytes: 1024 * 1024,
                max_index_bytes: 1024 * 1024,
                initial_offset: 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 3000);
        assert!(cfg.log_config.max_store_bytes > 0);
        assert!(cfg.log_config.max_index_bytes > 0);
    }

    // Regression: the server's own advertised defaults must actually open a
    // log, not just look plausible — max_index_bytes = 1 MiB is not a
    // multiple of ENT_W (12), so this only holds because `Log::open` rounds
    // down rather than rejecting non-multiples (corelog-core's config.rs).
    #[test]
    fn defaults_open_a_log_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ServerConfig::default();
        assert!(corelog_core::Log::open(dir.path(), cfg.log_config).is_ok());
    }
}
