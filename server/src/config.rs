//! Server configuration, loaded from TOML.
//!
//! Example:
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8787"
//! max_body_bytes = 262144
//! cors = true
//!
//! [audit]
//! ledger_id = "prod-eu-1"
//! max_entries = 100000
//!
//! [logging]
//! filter = "complyr=debug,tower_http=info"
//! ```
//!
//! Every table and key is optional.

use std::path::Path;

use serde::Deserialize;

use complyr_contracts::error::{ComplyrError, ComplyrResult};

pub const DEFAULT_LISTEN: &str = "127.0.0.1:8787";
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
pub const DEFAULT_MAX_AUDIT_ENTRIES: usize = 100_000;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,
    #[serde(default)]
    pub audit: AuditConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
    /// Bodies larger than this are refused with 413.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Answer browser preflights with a permissive CORS policy.
    #[serde(default)]
    pub cors: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            max_body_bytes: default_max_body_bytes(),
            cors: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Identifier baked into every ledger hash. A random one is generated
    /// per process when unset.
    #[serde(default)]
    pub ledger_id: Option<String>,
    /// Oldest entries are evicted past this many.
    #[serde(default = "default_max_audit_entries")]
    pub max_entries: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            ledger_id: None,
            max_entries: default_max_audit_entries(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_string()
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

fn default_max_audit_entries() -> usize {
    DEFAULT_MAX_AUDIT_ENTRIES
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl ServerConfig {
    /// Parse a TOML document.
    ///
    /// Returns `ComplyrError::Config` if the document is not valid TOML, has
    /// unknown keys, or sets `max_body_bytes` or `max_entries` to zero.
    pub fn from_toml_str(s: &str) -> ComplyrResult<Self> {
        let config: ServerConfig = toml::from_str(s).map_err(|e| ComplyrError::Config {
            reason: format!("failed to parse server config: {e}"),
        })?;
        if config.server.max_body_bytes == 0 {
            return Err(ComplyrError::Config {
                reason: "server.max_body_bytes must be greater than zero".to_string(),
            });
        }
        if config.audit.max_entries == 0 {
            return Err(ComplyrError::Config {
                reason: "audit.max_entries must be greater than zero".to_string(),
            });
        }
        Ok(config)
    }

    /// Read and parse the TOML file at `path`.
    pub fn from_file(path: &Path) -> ComplyrResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ComplyrError::Config {
            reason: format!("failed to read config file '{}': {e}", path.display()),
        })?;
        Self::from_toml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use complyr_contracts::error::ComplyrError;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = ServerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.server.listen, DEFAULT_LISTEN);
        assert_eq!(config.server.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert!(!config.server.cors);
        assert!(config.audit.ledger_id.is_none());
        assert_eq!(config.audit.max_entries, DEFAULT_MAX_AUDIT_ENTRIES);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = ServerConfig::from_toml_str(
            r#"
            [server]
            cors = true

            [audit]
            ledger_id = "prod-eu-1"
            "#,
        )
        .unwrap();

        assert!(config.server.cors);
        assert_eq!(config.server.listen, DEFAULT_LISTEN);
        assert_eq!(config.audit.ledger_id.as_deref(), Some("prod-eu-1"));
    }

    #[test]
    fn unknown_key_is_a_config_error() {
        let err = ServerConfig::from_toml_str("[server]\nport = 80\n").unwrap_err();
        assert!(matches!(err, ComplyrError::Config { .. }));
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let err = ServerConfig::from_toml_str("[server]\nmax_body_bytes = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_body_bytes"));
    }

    #[test]
    fn audit_retention_is_configurable_but_not_zero() {
        let config = ServerConfig::from_toml_str("[audit]\nmax_entries = 500\n").unwrap();
        assert_eq!(config.audit.max_entries, 500);

        let err = ServerConfig::from_toml_str("[audit]\nmax_entries = 0\n").unwrap_err();
        assert!(err.to_string().contains("audit.max_entries"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = ServerConfig::from_file(Path::new("/nonexistent/complyr.toml")).unwrap_err();
        match err {
            ComplyrError::Config { reason } => assert!(reason.contains("/nonexistent/complyr.toml")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }
}
