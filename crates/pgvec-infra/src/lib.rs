//! Infrastructure layer for pgvec.
//!
//! Executes what `pgvec-core` builds: a PostgreSQL connection pool that
//! ensures the `vector` extension, the sqlx binding for vector values,
//! statement and DDL execution, catalog reflection, and the TOML config
//! loader.

pub mod config;
pub mod error;
pub mod postgres;

pub use error::DbError;
pub use postgres::executor::PgExecutor;
pub use postgres::pgvector::{PgVector, try_get_vector};
pub use postgres::pool::{DatabasePool, default_database_url};
pub use postgres::reflect::{ColumnInfo, column_info, reflect_table};
