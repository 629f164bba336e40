//! PostgreSQL storage layer.
//!
//! Connection pooling, the sqlx binding for `vector`, statement execution,
//! and catalog reflection.

pub mod executor;
pub mod pgvector;
pub mod pool;
pub mod reflect;
