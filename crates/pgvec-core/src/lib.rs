//! Vector column support for PostgreSQL's `vector` extension.
//!
//! This crate holds the codec, the column type, the type registry used for
//! reflection, and a small schema and statement layer that renders SQL with
//! distance operators. It depends only on `pgvec-types`, never on a database
//! driver; `pgvec-infra` executes what this crate builds.

pub mod codec;
pub mod column;
pub mod expr;
pub mod index;
pub mod registry;
pub mod schema;
pub mod statement;

pub use column::{ColumnType, VectorType};
pub use expr::{Expr, OrderBy};
pub use index::{AccessMethod, Index, IndexParam, OperatorClass};
pub use registry::{TypeRegistry, register_vector};
pub use schema::{Catalog, Column, ColumnRef, Table};
pub use statement::{BuiltStatement, Delete, Insert, Select};
