//! Host-side values and their wire-ready counterparts.
//!
//! A [`Value`] is what callers hand to a statement builder. Binding it against
//! a column type produces a [`BindValue`], which carries the exact PostgreSQL
//! parameter type (including typed NULLs) the driver should send.

use ndarray::{Array, Dimension};

use crate::vector::{Vector, VectorInput};

/// A value supplied by the caller for a column or an expression operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Vector(VectorInput),
}

impl Value {
    /// Short name of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Vector(_) => "vector",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<VectorInput> for Value {
    fn from(v: VectorInput) -> Self {
        Value::Vector(v)
    }
}

impl From<Vector> for Value {
    fn from(v: Vector) -> Self {
        Value::Vector(VectorInput::Vector(v))
    }
}

impl From<Vec<f32>> for Value {
    fn from(v: Vec<f32>) -> Self {
        Value::Vector(v.into())
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::Vector(v.into())
    }
}

impl From<Vec<i32>> for Value {
    fn from(v: Vec<i32>) -> Self {
        Value::Vector(v.into())
    }
}

impl From<Vec<i64>> for Value {
    fn from(v: Vec<i64>) -> Self {
        Value::Vector(v.into())
    }
}

impl<D: Dimension> From<Array<f64, D>> for Value {
    fn from(v: Array<f64, D>) -> Self {
        Value::Vector(v.into())
    }
}

impl<D: Dimension> From<Array<f32, D>> for Value {
    fn from(v: Array<f32, D>) -> Self {
        Value::Vector(v.into())
    }
}

impl<D: Dimension> From<Array<i64, D>> for Value {
    fn from(v: Array<i64, D>) -> Self {
        Value::Vector(v.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// A parameter ready to hand to the driver, typed for its target column.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Bool(Option<bool>),
    Int4(Option<i32>),
    Int8(Option<i64>),
    Float4(Option<f32>),
    Float8(Option<f64>),
    Text(Option<String>),
    Vector(Option<Vector>),
}

impl BindValue {
    pub fn is_null(&self) -> bool {
        match self {
            BindValue::Bool(v) => v.is_none(),
            BindValue::Int4(v) => v.is_none(),
            BindValue::Int8(v) => v.is_none(),
            BindValue::Float4(v) => v.is_none(),
            BindValue::Float8(v) => v.is_none(),
            BindValue::Text(v) => v.is_none(),
            BindValue::Vector(v) => v.is_none(),
        }
    }
}
