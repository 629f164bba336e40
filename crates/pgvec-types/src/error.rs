use thiserror::Error;

/// Validation and parsing failures for vector values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorError {
    #[error("expected ndim to be 1, not {ndim}")]
    Shape { ndim: usize },

    #[error("dtype must be numeric, not {dtype}")]
    Type { dtype: String },

    #[error("expected {expected} dimensions, not {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("vector must have at least 1 dimension")]
    Empty,

    #[error("vector cannot have more than {max} dimensions, not {actual}")]
    TooManyDimensions { max: usize, actual: usize },

    #[error("{value} not allowed in vector")]
    NonFinite { value: f64 },

    #[error("invalid input syntax for type vector: \"{0}\"")]
    Parse(String),

    #[error("malformed binary vector: {0}")]
    Malformed(String),
}

/// Errors from schema definition: tables, columns, indexes, and type names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("vector dimensions must be between 1 and {max}, not {dimensions}")]
    InvalidDimension { dimensions: i64, max: usize },

    #[error("column '{column}' not found on table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("column '{column}' is defined twice on table '{table}'")]
    DuplicateColumn { table: String, column: String },

    #[error("index '{0}' has no columns")]
    EmptyIndex(String),

    #[error("index '{index}' names an operator class for '{column}', which it does not index")]
    OperatorClassForUnindexedColumn { index: String, column: String },

    #[error("invalid type name: '{0}'")]
    InvalidTypeName(String),
}

/// Failure to turn a host value into a wire value for a particular column.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("{0}")]
    Vector(#[from] VectorError),

    #[error("expected a {expected} value, not {found}")]
    Incompatible { expected: String, found: String },
}

/// Errors raised while building a statement.
///
/// Value validation failures are wrapped in [`StatementError::Bind`]; the
/// original [`BindError`] (and any [`VectorError`] inside it) stays reachable
/// through `source()` and by pattern matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatementError {
    #[error("({source}) [SQL: {statement}]")]
    Bind {
        statement: String,
        column: String,
        #[source]
        source: BindError,
    },

    #[error("column '{column}' not found on table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("cannot compile statement: {0}")]
    Compile(String),
}

impl StatementError {
    /// The vector validation failure behind this error, if that is what it is.
    pub fn vector_error(&self) -> Option<&VectorError> {
        match self {
            StatementError::Bind {
                source: BindError::Vector(err),
                ..
            } => Some(err),
            _ => None,
        }
    }
}
