//! Column type descriptors.
//!
//! [`VectorType`] is the `vector(N)` column type: it owns the declared
//! dimensionality and routes values through the codec in both directions.
//! [`ColumnType`] is the closed set of column types the schema layer knows how
//! to render and bind.

use std::fmt;

use pgvec_types::{
    BindError, BindValue, MAX_DIMENSIONS, SchemaError, Value, Vector, VectorError, VectorInput,
};

use crate::codec;

/// The `vector` column type, optionally constrained to a fixed dimensionality.
///
/// Immutable once built; copy it freely between tables and threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VectorType {
    dimensions: Option<usize>,
}

impl VectorType {
    /// SQL type name registered by the extension.
    pub const NAME: &'static str = "vector";

    /// A `vector(dimensions)` column type.
    pub fn new(dimensions: usize) -> Result<Self, SchemaError> {
        if dimensions == 0 || dimensions > MAX_DIMENSIONS {
            return Err(SchemaError::InvalidDimension {
                dimensions: dimensions as i64,
                max: MAX_DIMENSIONS,
            });
        }
        Ok(Self {
            dimensions: Some(dimensions),
        })
    }

    /// A `vector` column without a type modifier; any dimensionality is accepted.
    pub fn unconstrained() -> Self {
        Self { dimensions: None }
    }

    /// Build from the type modifiers reported by the catalog, e.g. `[3]` for `vector(3)`.
    pub fn from_modifiers(modifiers: &[i64]) -> Result<Self, SchemaError> {
        match modifiers {
            [] => Ok(Self::unconstrained()),
            [dimensions] if *dimensions > 0 => Self::new(*dimensions as usize),
            [dimensions] => Err(SchemaError::InvalidDimension {
                dimensions: *dimensions,
                max: MAX_DIMENSIONS,
            }),
            _ => Err(SchemaError::InvalidTypeName(format!(
                "{}({})",
                Self::NAME,
                modifiers
                    .iter()
                    .map(|m| m.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            ))),
        }
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// DDL spelling: `vector(3)` or `vector`.
    pub fn sql_type(&self) -> String {
        match self.dimensions {
            Some(n) => format!("{}({n})", Self::NAME),
            None => Self::NAME.to_string(),
        }
    }

    /// Validate host input against this column's dimensionality.
    pub fn to_vector(&self, input: &VectorInput) -> Result<Vector, VectorError> {
        codec::to_vector(input, self.dimensions)
    }

    /// Host to wire text. Absent input encodes to `None` (SQL NULL) unchecked.
    pub fn encode(&self, input: Option<&VectorInput>) -> Result<Option<String>, VectorError> {
        match input {
            None => Ok(None),
            Some(input) if input.is_absent() => Ok(None),
            Some(input) => self.to_vector(input).map(|v| Some(codec::encode_text(&v))),
        }
    }

    /// Wire text to host. SQL NULL decodes to `None`, never to an empty vector.
    pub fn decode(&self, text: Option<&str>) -> Result<Option<Vector>, VectorError> {
        text.map(codec::decode_text).transpose()
    }

    /// Bind a host value for a parameter of this type.
    pub fn bind(&self, value: &Value) -> Result<BindValue, BindError> {
        match value {
            Value::Null => Ok(BindValue::Vector(None)),
            Value::Vector(input) if input.is_absent() => Ok(BindValue::Vector(None)),
            Value::Vector(input) => Ok(BindValue::Vector(Some(self.to_vector(input)?))),
            other => Err(BindError::Incompatible {
                expected: self.sql_type(),
                found: other.kind().to_string(),
            }),
        }
    }
}

impl fmt::Display for VectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_type())
    }
}

/// Column types understood by the schema and statement layers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Integer,
    BigInt,
    Serial,
    BigSerial,
    Real,
    Double,
    Boolean,
    Text,
    Vector(VectorType),
    /// A reflected type no registry entry claimed; carries the catalog spelling.
    Unknown(String),
}

impl ColumnType {
    /// Convenience for `ColumnType::Vector(VectorType::new(dimensions)?)`.
    pub fn vector(dimensions: usize) -> Result<Self, SchemaError> {
        VectorType::new(dimensions).map(ColumnType::Vector)
    }

    pub fn sql_type(&self) -> String {
        match self {
            ColumnType::Integer => "integer".to_string(),
            ColumnType::BigInt => "bigint".to_string(),
            ColumnType::Serial => "serial".to_string(),
            ColumnType::BigSerial => "bigserial".to_string(),
            ColumnType::Real => "real".to_string(),
            ColumnType::Double => "double precision".to_string(),
            ColumnType::Boolean => "boolean".to_string(),
            ColumnType::Text => "text".to_string(),
            ColumnType::Vector(vector) => vector.sql_type(),
            ColumnType::Unknown(name) => name.clone(),
        }
    }

    pub fn as_vector(&self) -> Option<&VectorType> {
        match self {
            ColumnType::Vector(vector) => Some(vector),
            _ => None,
        }
    }

    /// Bind a host value for a column of this type.
    pub fn bind(&self, value: &Value) -> Result<BindValue, BindError> {
        let incompatible = || BindError::Incompatible {
            expected: self.sql_type(),
            found: value.kind().to_string(),
        };

        match (self, value) {
            (ColumnType::Vector(vector), _) => vector.bind(value),

            (ColumnType::Integer | ColumnType::Serial, Value::Null) => Ok(BindValue::Int4(None)),
            (ColumnType::Integer | ColumnType::Serial, Value::Int(v)) => i32::try_from(*v)
                .map(|v| BindValue::Int4(Some(v)))
                .map_err(|_| BindError::Incompatible {
                    expected: self.sql_type(),
                    found: format!("out-of-range integer {v}"),
                }),

            (ColumnType::BigInt | ColumnType::BigSerial, Value::Null) => Ok(BindValue::Int8(None)),
            (ColumnType::BigInt | ColumnType::BigSerial, Value::Int(v)) => {
                Ok(BindValue::Int8(Some(*v)))
            }

            (ColumnType::Real, Value::Null) => Ok(BindValue::Float4(None)),
            (ColumnType::Real, Value::Float(v)) => Ok(BindValue::Float4(Some(*v as f32))),
            (ColumnType::Real, Value::Int(v)) => Ok(BindValue::Float4(Some(*v as f32))),

            (ColumnType::Double, Value::Null) => Ok(BindValue::Float8(None)),
            (ColumnType::Double, Value::Float(v)) => Ok(BindValue::Float8(Some(*v))),
            (ColumnType::Double, Value::Int(v)) => Ok(BindValue::Float8(Some(*v as f64))),

            (ColumnType::Boolean, Value::Null) => Ok(BindValue::Bool(None)),
            (ColumnType::Boolean, Value::Bool(v)) => Ok(BindValue::Bool(Some(*v))),

            (ColumnType::Text | ColumnType::Unknown(_), Value::Null) => Ok(BindValue::Text(None)),
            (ColumnType::Text | ColumnType::Unknown(_), Value::Text(v)) => {
                Ok(BindValue::Text(Some(v.clone())))
            }

            _ => Err(incompatible()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_type())
    }
}

impl From<VectorType> for ColumnType {
    fn from(vector: VectorType) -> Self {
        ColumnType::Vector(vector)
    }
}

/// Bind a free-standing operand (no column context) by its natural type.
///
/// Returns `None` for SQL NULL, which is rendered inline rather than bound.
pub fn bind_literal(value: &Value) -> Result<Option<BindValue>, BindError> {
    match value {
        Value::Null => Ok(None),
        Value::Bool(v) => Ok(Some(BindValue::Bool(Some(*v)))),
        Value::Int(v) => Ok(Some(BindValue::Int8(Some(*v)))),
        Value::Float(v) => Ok(Some(BindValue::Float8(Some(*v)))),
        Value::Text(v) => Ok(Some(BindValue::Text(Some(v.clone())))),
        Value::Vector(input) if input.is_absent() => Ok(None),
        Value::Vector(input) => Ok(Some(BindValue::Vector(Some(
            VectorType::unconstrained().to_vector(input)?,
        )))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use serde_json::json;

    #[test]
    fn test_vector_type_sql() {
        assert_eq!(VectorType::new(3).unwrap().sql_type(), "vector(3)");
        assert_eq!(VectorType::unconstrained().sql_type(), "vector");
        assert_eq!(ColumnType::vector(1536).unwrap().to_string(), "vector(1536)");
    }

    #[test]
    fn test_vector_type_rejects_bad_dimensions() {
        assert!(matches!(
            VectorType::new(0),
            Err(SchemaError::InvalidDimension { dimensions: 0, .. })
        ));
        assert!(VectorType::new(MAX_DIMENSIONS + 1).is_err());
        assert!(VectorType::new(MAX_DIMENSIONS).is_ok());
    }

    #[test]
    fn test_from_modifiers() {
        assert_eq!(
            VectorType::from_modifiers(&[3]).unwrap().dimensions(),
            Some(3)
        );
        assert_eq!(VectorType::from_modifiers(&[]).unwrap().dimensions(), None);
        assert!(VectorType::from_modifiers(&[-1]).is_err());
        assert!(VectorType::from_modifiers(&[3, 4]).is_err());
    }

    #[test]
    fn test_encode_and_decode() {
        let column = VectorType::new(3).unwrap();
        let input = VectorInput::from(vec![1.5_f64, 2.0, 3.0]);
        assert_eq!(
            column.encode(Some(&input)).unwrap().as_deref(),
            Some("[1.5,2,3]")
        );

        let decoded = column.decode(Some("[1.5,2,3]")).unwrap().unwrap();
        assert_eq!(decoded.as_slice(), &[1.5, 2.0, 3.0]);
    }

    #[test]
    fn test_absent_value_skips_validation() {
        let column = VectorType::new(3).unwrap();
        assert_eq!(column.encode(None).unwrap(), None);
        assert_eq!(
            column.encode(Some(&VectorInput::Json(json!(null)))).unwrap(),
            None
        );
        assert_eq!(column.decode(None).unwrap(), None);
        assert_eq!(column.bind(&Value::Null).unwrap(), BindValue::Vector(None));
    }

    #[test]
    fn test_bind_validates_dimensions() {
        let column = ColumnType::vector(3).unwrap();
        let err = column.bind(&Value::from(vec![1_i32, 2])).unwrap_err();
        assert_eq!(
            err,
            BindError::Vector(VectorError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_bind_validates_shape() {
        let column = ColumnType::vector(3).unwrap();
        let err = column
            .bind(&Value::from(arr2(&[[1.0_f64, 2.0, 3.0]])))
            .unwrap_err();
        assert!(err.to_string().contains("expected ndim to be 1"));
    }

    #[test]
    fn test_bind_rejects_scalar_for_vector_column() {
        let column = ColumnType::vector(3).unwrap();
        let err = column.bind(&Value::Int(1)).unwrap_err();
        assert!(matches!(err, BindError::Incompatible { .. }));
    }

    #[test]
    fn test_bind_scalar_types() {
        assert_eq!(
            ColumnType::Integer.bind(&Value::Int(7)).unwrap(),
            BindValue::Int4(Some(7))
        );
        assert_eq!(
            ColumnType::BigInt.bind(&Value::Int(7)).unwrap(),
            BindValue::Int8(Some(7))
        );
        assert_eq!(
            ColumnType::Double.bind(&Value::Int(2)).unwrap(),
            BindValue::Float8(Some(2.0))
        );
        assert_eq!(
            ColumnType::Text.bind(&Value::Null).unwrap(),
            BindValue::Text(None)
        );
        assert!(ColumnType::Integer.bind(&Value::Int(i64::MAX)).is_err());
        assert!(ColumnType::Boolean.bind(&Value::from("yes")).is_err());
    }

    #[test]
    fn test_bind_literal() {
        assert_eq!(bind_literal(&Value::Null).unwrap(), None);
        assert_eq!(
            bind_literal(&Value::Float(0.5)).unwrap(),
            Some(BindValue::Float8(Some(0.5)))
        );
        let bound = bind_literal(&Value::from(vec![1.0_f32, 2.0])).unwrap();
        assert_eq!(
            bound,
            Some(BindValue::Vector(Some(Vector::new(vec![1.0, 2.0]))))
        );
    }
}
