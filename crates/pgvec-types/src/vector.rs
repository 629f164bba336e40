//! Vector values and the host shapes accepted as vector input.
//!
//! [`Vector`] is the decoded, wire-ready form: a sequence of `f32` components.
//! [`VectorInput`] is the closed set of host representations a caller may hand
//! to a vector column. Conversion and validation from input to vector lives in
//! `pgvec-core::codec`.

use ndarray::{Array, Array1, ArrayD, Dimension};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Largest dimensionality the `vector` extension type accepts.
pub const MAX_DIMENSIONS: usize = 16_000;

/// A dense vector of 32-bit floats, as stored by the `vector` column type.
///
/// Construction does not validate; values headed for the database go through
/// the codec, which enforces dimensionality and finiteness.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector(Vec<f32>);

impl Vector {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Number of components.
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }

    /// Copy the components into a one-dimensional `ndarray` array.
    pub fn to_array(&self) -> Array1<f32> {
        Array1::from(self.0.clone())
    }
}

impl From<Vec<f32>> for Vector {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl From<Array1<f32>> for Vector {
    fn from(array: Array1<f32>) -> Self {
        Self(array.to_vec())
    }
}

impl From<Vector> for Vec<f32> {
    fn from(vector: Vector) -> Self {
        vector.0
    }
}

/// A host value offered for a vector column or as a distance target.
///
/// Only these shapes are accepted. Lists and arrays of integers are widened
/// to `f64` and downcast to `f32` on encode, like every other input.
#[derive(Debug, Clone, PartialEq)]
pub enum VectorInput {
    /// An ordered list of numbers.
    List(Vec<f64>),
    /// An already-built `f32` vector.
    Vector(Vector),
    /// A native n-dimensional numeric array. Only one-dimensional arrays encode.
    Array(ArrayD<f64>),
    /// Dynamically-typed input, e.g. a JSON request body. `null` means absent.
    Json(serde_json::Value),
}

impl VectorInput {
    /// Whether this input stands for SQL NULL.
    pub fn is_absent(&self) -> bool {
        matches!(self, VectorInput::Json(serde_json::Value::Null))
    }
}

impl From<Vector> for VectorInput {
    fn from(vector: Vector) -> Self {
        VectorInput::Vector(vector)
    }
}

impl From<&Vector> for VectorInput {
    fn from(vector: &Vector) -> Self {
        VectorInput::Vector(vector.clone())
    }
}

impl From<Vec<f32>> for VectorInput {
    fn from(values: Vec<f32>) -> Self {
        VectorInput::Vector(Vector::new(values))
    }
}

impl From<&[f32]> for VectorInput {
    fn from(values: &[f32]) -> Self {
        VectorInput::Vector(Vector::new(values.to_vec()))
    }
}

impl<const N: usize> From<[f32; N]> for VectorInput {
    fn from(values: [f32; N]) -> Self {
        VectorInput::Vector(Vector::new(values.to_vec()))
    }
}

impl From<Vec<f64>> for VectorInput {
    fn from(values: Vec<f64>) -> Self {
        VectorInput::List(values)
    }
}

impl From<&[f64]> for VectorInput {
    fn from(values: &[f64]) -> Self {
        VectorInput::List(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for VectorInput {
    fn from(values: [f64; N]) -> Self {
        VectorInput::List(values.to_vec())
    }
}

impl From<Vec<i32>> for VectorInput {
    fn from(values: Vec<i32>) -> Self {
        VectorInput::List(values.into_iter().map(f64::from).collect())
    }
}

impl From<Vec<i64>> for VectorInput {
    fn from(values: Vec<i64>) -> Self {
        VectorInput::List(values.into_iter().map(|v| v as f64).collect())
    }
}

impl<D: Dimension> From<Array<f64, D>> for VectorInput {
    fn from(array: Array<f64, D>) -> Self {
        VectorInput::Array(array.into_dyn())
    }
}

impl<D: Dimension> From<Array<f32, D>> for VectorInput {
    fn from(array: Array<f32, D>) -> Self {
        VectorInput::Array(array.mapv(f64::from).into_dyn())
    }
}

impl<D: Dimension> From<Array<i64, D>> for VectorInput {
    fn from(array: Array<i64, D>) -> Self {
        VectorInput::Array(array.mapv(|v| v as f64).into_dyn())
    }
}

impl From<serde_json::Value> for VectorInput {
    fn from(value: serde_json::Value) -> Self {
        VectorInput::Json(value)
    }
}

/// Distance functions provided by the `vector` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Euclidean distance.
    L2,
    /// Negative inner product. The extension negates the inner product so that
    /// ascending order ranks the largest inner product first.
    InnerProduct,
    /// Cosine distance (1 - cosine similarity).
    Cosine,
    /// Taxicab distance.
    L1,
}

impl DistanceMetric {
    /// The SQL operator the extension defines for this metric.
    pub fn operator(&self) -> &'static str {
        match self {
            DistanceMetric::L2 => "<->",
            DistanceMetric::InnerProduct => "<#>",
            DistanceMetric::Cosine => "<=>",
            DistanceMetric::L1 => "<+>",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::L2 => write!(f, "l2"),
            DistanceMetric::InnerProduct => write!(f, "ip"),
            DistanceMetric::Cosine => write!(f, "cosine"),
            DistanceMetric::L1 => write!(f, "l1"),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "l2" | "euclidean" => Ok(DistanceMetric::L2),
            "ip" | "inner_product" => Ok(DistanceMetric::InnerProduct),
            "cosine" => Ok(DistanceMetric::Cosine),
            "l1" | "taxicab" => Ok(DistanceMetric::L1),
            other => Err(format!("invalid distance metric: '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_vector_to_array() {
        let vector = Vector::new(vec![1.5, 2.0, 3.0]);
        let array = vector.to_array();
        assert_eq!(array, arr1(&[1.5_f32, 2.0, 3.0]));
        assert_eq!(vector.dimensions(), 3);
    }

    #[test]
    fn test_integer_list_widens_to_floats() {
        let input = VectorInput::from(vec![4_i64, 5, 6]);
        assert_eq!(input, VectorInput::List(vec![4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_matrix_keeps_its_shape() {
        let input = VectorInput::from(arr2(&[[1.0_f64, 2.0, 3.0]]));
        match input {
            VectorInput::Array(array) => assert_eq!(array.ndim(), 2),
            other => panic!("expected array input, got {other:?}"),
        }
    }

    #[test]
    fn test_json_null_is_absent() {
        assert!(VectorInput::from(serde_json::Value::Null).is_absent());
        assert!(!VectorInput::from(serde_json::json!([1, 2])).is_absent());
    }

    #[test]
    fn test_distance_metric_operators() {
        assert_eq!(DistanceMetric::L2.operator(), "<->");
        assert_eq!(DistanceMetric::InnerProduct.operator(), "<#>");
        assert_eq!(DistanceMetric::Cosine.operator(), "<=>");
        assert_eq!(DistanceMetric::L1.operator(), "<+>");
    }

    #[test]
    fn test_distance_metric_from_str_roundtrip() {
        for metric in [
            DistanceMetric::L2,
            DistanceMetric::InnerProduct,
            DistanceMetric::Cosine,
            DistanceMetric::L1,
        ] {
            let parsed: DistanceMetric = metric.to_string().parse().unwrap();
            assert_eq!(parsed, metric);
        }
        assert!("hamming".parse::<DistanceMetric>().is_err());
    }
}
