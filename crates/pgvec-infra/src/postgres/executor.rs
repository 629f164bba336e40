//! Executes built statements and schema DDL against a [`DatabasePool`].

use pgvec_core::schema::quote_ident;
use pgvec_core::{BuiltStatement, Catalog, Index, Table};
use pgvec_types::BindValue;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::Postgres;

use super::pgvector::PgVector;
use super::pool::DatabasePool;
use crate::error::DbError;

/// Runs statements produced by `pgvec-core` builders.
#[derive(Clone, Debug)]
pub struct PgExecutor {
    pool: DatabasePool,
}

impl PgExecutor {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Execute a statement, returning the number of affected rows.
    pub async fn execute(&self, statement: &BuiltStatement) -> Result<u64, DbError> {
        tracing::debug!("Executing: {}", statement.sql);
        let result = bind_params(sqlx::query(&statement.sql), &statement.params)
            .execute(&self.pool.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn fetch_all(&self, statement: &BuiltStatement) -> Result<Vec<PgRow>, DbError> {
        tracing::debug!("Fetching: {}", statement.sql);
        let rows = bind_params(sqlx::query(&statement.sql), &statement.params)
            .fetch_all(&self.pool.pool)
            .await?;
        Ok(rows)
    }

    pub async fn fetch_optional(
        &self,
        statement: &BuiltStatement,
    ) -> Result<Option<PgRow>, DbError> {
        tracing::debug!("Fetching one: {}", statement.sql);
        let row = bind_params(sqlx::query(&statement.sql), &statement.params)
            .fetch_optional(&self.pool.pool)
            .await?;
        Ok(row)
    }

    pub async fn fetch_one(&self, statement: &BuiltStatement) -> Result<PgRow, DbError> {
        tracing::debug!("Fetching one: {}", statement.sql);
        let row = bind_params(sqlx::query(&statement.sql), &statement.params)
            .fetch_one(&self.pool.pool)
            .await?;
        Ok(row)
    }

    pub async fn create_table(&self, table: &Table) -> Result<(), DbError> {
        let sql = table.create_if_not_exists_sql()?;
        self.run_ddl(&sql).await?;
        tracing::info!("Created table {}", table.name());
        Ok(())
    }

    pub async fn drop_table(&self, table: &Table) -> Result<(), DbError> {
        self.run_ddl(&table.drop_if_exists_sql()).await?;
        tracing::info!("Dropped table {}", table.name());
        Ok(())
    }

    /// Create every table in the catalog inside one transaction.
    pub async fn create_all(&self, catalog: &Catalog) -> Result<(), DbError> {
        let statements = catalog.create_all_sql()?;
        self.run_ddl_batch(&statements).await?;
        tracing::info!("Created {} table(s)", statements.len());
        Ok(())
    }

    /// Drop every table in the catalog, in reverse declaration order.
    pub async fn drop_all(&self, catalog: &Catalog) -> Result<(), DbError> {
        let statements = catalog.drop_all_sql();
        self.run_ddl_batch(&statements).await?;
        tracing::info!("Dropped {} table(s)", statements.len());
        Ok(())
    }

    pub async fn create_index(&self, index: &Index) -> Result<(), DbError> {
        let sql = index.create_sql()?;
        self.run_ddl(&sql).await?;
        tracing::info!("Created index {} on {}", index.name(), index.table().name());
        Ok(())
    }

    /// `DROP INDEX [IF EXISTS] <name>`.
    pub async fn drop_index(&self, name: &str, if_exists: bool) -> Result<(), DbError> {
        let sql = if if_exists {
            format!("DROP INDEX IF EXISTS {}", quote_ident(name))
        } else {
            format!("DROP INDEX {}", quote_ident(name))
        };
        self.run_ddl(&sql).await?;
        tracing::info!("Dropped index {name}");
        Ok(())
    }

    async fn run_ddl(&self, sql: &str) -> Result<(), DbError> {
        tracing::debug!("DDL: {sql}");
        sqlx::query(sql).execute(&self.pool.pool).await?;
        Ok(())
    }

    async fn run_ddl_batch(&self, statements: &[String]) -> Result<(), DbError> {
        let mut tx = self.pool.pool.begin().await?;
        for sql in statements {
            tracing::debug!("DDL: {sql}");
            sqlx::query(sql).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

/// Attach statement parameters in placeholder order.
fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [BindValue],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            BindValue::Bool(v) => query.bind(*v),
            BindValue::Int4(v) => query.bind(*v),
            BindValue::Int8(v) => query.bind(*v),
            BindValue::Float4(v) => query.bind(*v),
            BindValue::Float8(v) => query.bind(*v),
            BindValue::Text(v) => query.bind(v.as_deref()),
            BindValue::Vector(v) => query.bind(v.clone().map(PgVector::from)),
        };
    }
    query
}
