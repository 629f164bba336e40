//! Application state for commands that talk to the database.

use std::path::Path;

use anyhow::Context;

use pgvec_core::TypeRegistry;
use pgvec_infra::config::{load_config, resolve_database_url};
use pgvec_infra::{DatabasePool, PgExecutor};
use pgvec_types::PgvecConfig;

/// Connected pool, statement executor, and the registry used for reflection.
pub struct AppState {
    pub config: PgvecConfig,
    pub executor: PgExecutor,
    pub registry: TypeRegistry,
}

impl AppState {
    /// Load config from `config_path`, apply the URL override, and connect.
    pub async fn init(config_path: &Path, database_url: Option<&str>) -> anyhow::Result<Self> {
        let mut config = load_config(config_path).await;
        config.database_url = Some(resolve_database_url(&config, database_url));

        let pool = DatabasePool::connect(&config)
            .await
            .context("Failed to connect to PostgreSQL")?;

        Ok(Self {
            config,
            executor: PgExecutor::new(pool),
            registry: TypeRegistry::with_vector(),
        })
    }

    pub fn pool(&self) -> &DatabasePool {
        self.executor.pool()
    }
}
