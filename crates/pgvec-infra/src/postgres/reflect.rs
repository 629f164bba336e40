//! Table reflection from the PostgreSQL catalog.
//!
//! Column types come from `format_type(atttypid, atttypmod)`, which prints
//! `vector(3)` for a dimensioned vector column, and are resolved through a
//! [`TypeRegistry`]. A registry without the vector factory reflects such
//! columns as [`ColumnType::Unknown`].

use pgvec_core::{Column, ColumnType, Table, TypeRegistry};
use sqlx::Row;

use super::pool::DatabasePool;
use crate::error::DbError;

const COLUMNS_QUERY: &str = "\
SELECT a.attname::text AS name,
       format_type(a.atttypid, a.atttypmod) AS type_name,
       a.attnotnull AS not_null,
       EXISTS (
           SELECT 1 FROM pg_index i
           WHERE i.indrelid = a.attrelid AND i.indisprimary AND a.attnum = ANY(i.indkey)
       ) AS primary_key
FROM pg_attribute a
WHERE a.attrelid = to_regclass($1) AND a.attnum > 0 AND NOT a.attisdropped
ORDER BY a.attnum";

/// A reflected column before type resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub type_name: String,
    pub not_null: bool,
    pub primary_key: bool,
}

impl ColumnInfo {
    fn from_row(row: &sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            name: row.try_get("name")?,
            type_name: row.try_get("type_name")?,
            not_null: row.try_get("not_null")?,
            primary_key: row.try_get("primary_key")?,
        })
    }

    fn into_column(self, registry: &TypeRegistry) -> Result<Column, DbError> {
        let column_type: ColumnType = registry.resolve(&self.type_name)?;
        let mut column = Column::new(self.name, column_type);
        if self.primary_key {
            column = column.primary_key();
        } else if self.not_null {
            column = column.not_null();
        }
        Ok(column)
    }
}

/// Raw column metadata for `table`, in attribute order. Empty when the
/// table does not exist.
pub async fn column_info(pool: &DatabasePool, table: &str) -> Result<Vec<ColumnInfo>, DbError> {
    let rows = sqlx::query(COLUMNS_QUERY)
        .bind(table)
        .fetch_all(&pool.pool)
        .await?;

    rows.iter()
        .map(|row| ColumnInfo::from_row(row).map_err(DbError::from))
        .collect()
}

/// Reflect `table` into a [`Table`] whose column types are resolved by
/// `registry`.
pub async fn reflect_table(
    pool: &DatabasePool,
    registry: &TypeRegistry,
    table: &str,
) -> Result<Table, DbError> {
    let columns = column_info(pool, table).await?;
    if columns.is_empty() {
        return Err(DbError::TableNotFound(table.to_string()));
    }

    tracing::debug!("Reflected {} column(s) from {table}", columns.len());
    columns
        .into_iter()
        .try_fold(Table::new(table), |reflected, info| {
            Ok(reflected.column(info.into_column(registry)?))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: &str, type_name: &str, not_null: bool, primary_key: bool) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            type_name: type_name.to_string(),
            not_null,
            primary_key,
        }
    }

    #[test]
    fn test_vector_column_resolves_with_registry() {
        let registry = TypeRegistry::with_vector();
        let column = info("embedding", "vector(3)", false, false)
            .into_column(&registry)
            .unwrap();
        assert_eq!(
            column.column_type().as_vector().unwrap().dimensions(),
            Some(3)
        );
        assert!(column.is_nullable());
    }

    #[test]
    fn test_vector_column_is_opaque_without_registration() {
        let registry = TypeRegistry::builtin();
        let column = info("embedding", "vector(3)", false, false)
            .into_column(&registry)
            .unwrap();
        assert_eq!(
            column.column_type(),
            &ColumnType::Unknown("vector(3)".to_string())
        );
    }

    #[test]
    fn test_typmod_before_suffix_does_not_fail_reflection() {
        let registry = TypeRegistry::with_vector();
        let created_at = info("created_at", "timestamp(3) with time zone", true, false)
            .into_column(&registry)
            .unwrap();
        assert_eq!(
            created_at.column_type(),
            &ColumnType::Unknown("timestamp(3) with time zone".to_string())
        );

        let tags = info("tags", "character varying(20)[]", false, false)
            .into_column(&registry)
            .unwrap();
        assert_eq!(
            tags.column_type(),
            &ColumnType::Unknown("character varying(20)[]".to_string())
        );
    }

    #[test]
    fn test_primary_key_and_not_null_flags() {
        let registry = TypeRegistry::builtin();
        let id = info("id", "integer", true, true)
            .into_column(&registry)
            .unwrap();
        assert!(id.is_primary_key());
        assert!(!id.is_nullable());

        let title = info("title", "text", true, false)
            .into_column(&registry)
            .unwrap();
        assert!(!title.is_primary_key());
        assert!(!title.is_nullable());
    }
}
