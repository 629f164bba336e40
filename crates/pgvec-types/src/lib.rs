//! Shared domain types for pgvec.
//!
//! Vectors and the host shapes accepted as vector input, bindable values,
//! the error taxonomy, and connection configuration.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, ndarray, thiserror.

pub mod config;
pub mod error;
pub mod value;
pub mod vector;

pub use config::PgvecConfig;
pub use error::{BindError, SchemaError, StatementError, VectorError};
pub use value::{BindValue, Value};
pub use vector::{DistanceMetric, MAX_DIMENSIONS, Vector, VectorInput};
