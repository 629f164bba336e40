//! Connection configuration types for pgvec.
//!
//! `PgvecConfig` mirrors the optional `pgvec.toml` file. Every field has a
//! default, so an empty file (or no file) is a valid configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration for connecting to a pgvector-enabled database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PgvecConfig {
    /// PostgreSQL connection URL. When absent, the environment decides.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection before giving up.
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Run `CREATE EXTENSION IF NOT EXISTS vector` when the pool opens.
    #[serde(default = "default_create_extension")]
    pub create_extension: bool,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_create_extension() -> bool {
    true
}

impl Default for PgvecConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout_secs(),
            create_extension: default_create_extension(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = PgvecConfig::default();
        assert!(config.database_url.is_none());
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.acquire_timeout_secs, 5);
        assert!(config.create_extension);
    }

    #[test]
    fn test_config_deserialize_empty_uses_defaults() {
        let config: PgvecConfig = toml::from_str("").unwrap();
        assert_eq!(config, PgvecConfig::default());
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let toml_str = r#"
database_url = "postgres://localhost/embeddings"
max_connections = 12
create_extension = false
"#;
        let config: PgvecConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/embeddings")
        );
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.acquire_timeout_secs, 5);
        assert!(!config.create_extension);
    }
}
