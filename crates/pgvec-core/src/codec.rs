//! Vector value codec.
//!
//! Converts host input into validated [`Vector`]s and between vectors and the
//! `vector` extension's two wire representations:
//!
//! - text: `[1.5,2,3]`, each component written as the shortest decimal that
//!   round-trips the `f32`, no whitespace.
//! - binary (send/recv): `u16` dimension count, `u16` reserved (zero), then the
//!   components as `f32`, all big-endian.
//!
//! SQL NULL never reaches the codec; absence is `None` at every call site.

use pgvec_types::{MAX_DIMENSIONS, Vector, VectorError, VectorInput};

/// Validate `input` and convert it to a vector of exactly `dimensions`
/// components (any non-zero count when `dimensions` is `None`).
///
/// Checks run in this order: shape, element type, dimension count, finiteness.
/// `f64` components are downcast to `f32`.
pub fn to_vector(input: &VectorInput, dimensions: Option<usize>) -> Result<Vector, VectorError> {
    let components = match input {
        VectorInput::Vector(vector) => vector.as_slice().to_vec(),
        VectorInput::List(values) => values.iter().map(|v| *v as f32).collect(),
        VectorInput::Array(array) => {
            if array.ndim() != 1 {
                return Err(VectorError::Shape { ndim: array.ndim() });
            }
            array.iter().map(|v| *v as f32).collect()
        }
        VectorInput::Json(value) => json_components(value)?,
    };

    check_dimensions(components.len(), dimensions)?;

    if let Some(bad) = components.iter().find(|v| !v.is_finite()) {
        return Err(VectorError::NonFinite {
            value: f64::from(*bad),
        });
    }

    Ok(Vector::new(components))
}

fn check_dimensions(actual: usize, expected: Option<usize>) -> Result<(), VectorError> {
    match expected {
        Some(expected) if expected != actual => {
            Err(VectorError::DimensionMismatch { expected, actual })
        }
        _ if actual == 0 => Err(VectorError::Empty),
        _ if actual > MAX_DIMENSIONS => Err(VectorError::TooManyDimensions {
            max: MAX_DIMENSIONS,
            actual,
        }),
        _ => Ok(()),
    }
}

fn json_components(value: &serde_json::Value) -> Result<Vec<f32>, VectorError> {
    let ndim = json_ndim(value);
    let serde_json::Value::Array(items) = value else {
        return Err(VectorError::Shape { ndim });
    };
    if ndim != 1 {
        return Err(VectorError::Shape { ndim });
    }

    items
        .iter()
        .map(|item| match item {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(|v| v as f32)
                .ok_or_else(|| VectorError::Type {
                    dtype: "number".to_string(),
                }),
            other => Err(VectorError::Type {
                dtype: json_dtype(other).to_string(),
            }),
        })
        .collect()
}

/// Nesting depth of a JSON value, counting scalars as zero-dimensional.
fn json_ndim(value: &serde_json::Value) -> usize {
    match value {
        serde_json::Value::Array(items) => 1 + items.iter().map(json_ndim).max().unwrap_or(0),
        _ => 0,
    }
}

fn json_dtype(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "str",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Render a vector in the extension's text format.
pub fn encode_text(vector: &Vector) -> String {
    let components: Vec<String> = vector.as_slice().iter().map(|v| format_component(*v)).collect();
    format!("[{}]", components.join(","))
}

/// Shortest round-tripping spelling of `v`, switching to the server's
/// exponent form (`3.4028235e+38`, `1e-30`) when that is shorter.
fn format_component(v: f32) -> String {
    let plain = v.to_string();
    let scientific = format!("{v:e}");
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return plain;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return plain;
    };

    let sign = if exponent < 0 { '-' } else { '+' };
    let scientific = format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs());
    if scientific.len() < plain.len() {
        scientific
    } else {
        plain
    }
}

/// Parse the extension's text format. Whitespace around components is accepted.
pub fn decode_text(text: &str) -> Result<Vector, VectorError> {
    let invalid = || VectorError::Parse(text.to_string());

    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(invalid)?;

    if inner.trim().is_empty() {
        return Err(VectorError::Empty);
    }

    let components = inner
        .split(',')
        .map(|part| part.trim().parse::<f32>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    check_dimensions(components.len(), None)?;
    Ok(Vector::new(components))
}

/// Render a vector in the extension's binary format.
pub fn encode_binary(vector: &Vector) -> Result<Vec<u8>, VectorError> {
    let dim = vector.dimensions();
    check_dimensions(dim, None)?;

    let mut buf = Vec::with_capacity(4 + dim * 4);
    buf.extend_from_slice(&(dim as u16).to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes());
    for v in vector.as_slice() {
        buf.extend_from_slice(&v.to_be_bytes());
    }
    Ok(buf)
}

/// Parse the extension's binary format.
pub fn decode_binary(bytes: &[u8]) -> Result<Vector, VectorError> {
    if bytes.len() < 4 {
        return Err(VectorError::Malformed(format!(
            "header needs 4 bytes, got {}",
            bytes.len()
        )));
    }

    let dim = u16::from_be_bytes([bytes[0], bytes[1]]) as usize;
    check_dimensions(dim, None)?;

    let body = &bytes[4..];
    if body.len() != dim * 4 {
        return Err(VectorError::Malformed(format!(
            "{dim} dimensions need {} bytes, got {}",
            dim * 4,
            body.len()
        )));
    }

    let components = body
        .chunks_exact(4)
        .map(|chunk| f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    Ok(Vector::new(components))
}
