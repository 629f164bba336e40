//! PostgreSQL connection pool.
//!
//! Connecting optionally runs `CREATE EXTENSION IF NOT EXISTS vector` so the
//! `vector` type exists before any table uses it.

use std::str::FromStr;
use std::time::Duration;

use pgvec_types::PgvecConfig;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

/// Fallback when neither `PGVEC_DATABASE_URL` nor `DATABASE_URL` is set.
const FALLBACK_DATABASE_URL: &str = "postgres://localhost/pgvec";

/// SQLSTATEs raised when two sessions race to create the same extension.
const EXTENSION_RACE_CODES: &[&str] = &["23505", "42710"];

#[derive(Clone, Debug)]
pub struct DatabasePool {
    pub pool: PgPool,
}

impl DatabasePool {
    /// Connect with default pool settings and ensure the extension exists.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let config = PgvecConfig {
            database_url: Some(database_url.to_string()),
            ..PgvecConfig::default()
        };
        Self::connect(&config).await
    }

    /// Connect using `config`.
    ///
    /// A missing `database_url` falls back to [`default_database_url`].
    pub async fn connect(config: &PgvecConfig) -> Result<Self, sqlx::Error> {
        let url = config
            .database_url
            .clone()
            .unwrap_or_else(default_database_url);
        let options = PgConnectOptions::from_str(&url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        tracing::debug!(
            "Connected to PostgreSQL (max_connections={})",
            config.max_connections
        );

        let pool = Self { pool };
        if config.create_extension {
            pool.ensure_extension().await?;
        }
        Ok(pool)
    }

    /// `CREATE EXTENSION IF NOT EXISTS vector`.
    ///
    /// Concurrent sessions can still collide on the catalog insert; that
    /// collision means the extension now exists and is treated as success.
    pub async fn ensure_extension(&self) -> Result<(), sqlx::Error> {
        match sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await
        {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(err))
                if err
                    .code()
                    .is_some_and(|code| EXTENSION_RACE_CODES.contains(&&*code)) =>
            {
                tracing::debug!("vector extension created concurrently: {err}");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Installed version of the `vector` extension, if any.
    pub async fn extension_version(&self) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT extversion FROM pg_extension WHERE extname = 'vector'")
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(version,)| version))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Database URL from `PGVEC_DATABASE_URL`, then `DATABASE_URL`, then
/// `postgres://localhost/pgvec`.
pub fn default_database_url() -> String {
    resolve_database_url(
        std::env::var("PGVEC_DATABASE_URL").ok(),
        std::env::var("DATABASE_URL").ok(),
    )
}

fn resolve_database_url(pgvec: Option<String>, generic: Option<String>) -> String {
    pgvec
        .filter(|url| !url.is_empty())
        .or_else(|| generic.filter(|url| !url.is_empty()))
        .unwrap_or_else(|| FALLBACK_DATABASE_URL.to_string())
}
