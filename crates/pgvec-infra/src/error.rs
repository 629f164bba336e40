//! Errors raised while talking to PostgreSQL.

use pgvec_types::{SchemaError, StatementError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// The statement failed to build; nothing was sent.
    #[error(transparent)]
    Statement(#[from] StatementError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to decode column '{column}': {source}")]
    Decode {
        column: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("table '{0}' does not exist")]
    TableNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgvec_types::{BindError, VectorError};
    use std::error::Error as _;

    #[test]
    fn test_statement_error_keeps_vector_cause() {
        let err = DbError::from(StatementError::Bind {
            statement: "INSERT INTO t (v) VALUES ($1)".to_string(),
            column: "v".to_string(),
            source: BindError::Vector(VectorError::DimensionMismatch {
                expected: 3,
                actual: 2,
            }),
        });
        assert!(err.to_string().contains("expected 3 dimensions, not 2"));

        let DbError::Statement(statement) = &err else {
            panic!("expected statement error, got {err:?}");
        };
        assert!(statement.vector_error().is_some());
        assert!(err.source().is_some());
    }

    #[test]
    fn test_table_not_found_message() {
        assert_eq!(
            DbError::TableNotFound("items".to_string()).to_string(),
            "table 'items' does not exist"
        );
    }
}
