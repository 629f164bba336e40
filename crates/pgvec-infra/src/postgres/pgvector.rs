//! sqlx binding for the `vector` type.
//!
//! [`PgVector`] wraps [`Vector`] so it can implement sqlx's `Type`, `Encode`
//! and `Decode` for Postgres. Parameters are sent in the binary send/recv
//! format; results are read in whichever format the server used.

use pgvec_core::codec;
use pgvec_types::Vector;
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::postgres::{
    PgArgumentBuffer, PgHasArrayType, PgRow, PgTypeInfo, PgValueFormat, PgValueRef, Postgres,
};
use sqlx::{Decode, Encode, Row, Type};

use crate::error::DbError;

#[derive(Debug, Clone, PartialEq)]
pub struct PgVector(pub Vector);

impl PgVector {
    pub fn into_inner(self) -> Vector {
        self.0
    }
}

impl From<Vector> for PgVector {
    fn from(vector: Vector) -> Self {
        Self(vector)
    }
}

impl From<PgVector> for Vector {
    fn from(vector: PgVector) -> Self {
        vector.0
    }
}

impl Type<Postgres> for PgVector {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("vector")
    }
}

impl PgHasArrayType for PgVector {
    fn array_type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("_vector")
    }
}

impl Encode<'_, Postgres> for PgVector {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> Result<IsNull, BoxDynError> {
        let bytes = codec::encode_binary(&self.0)?;
        buf.extend_from_slice(&bytes);
        Ok(IsNull::No)
    }
}

impl<'r> Decode<'r, Postgres> for PgVector {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let vector = match value.format() {
            PgValueFormat::Binary => codec::decode_binary(value.as_bytes()?)?,
            PgValueFormat::Text => codec::decode_text(value.as_str()?)?,
        };
        Ok(Self(vector))
    }
}

/// Read a nullable `vector` column from a result row.
///
/// SQL NULL comes back as `None`, never as an empty vector.
pub fn try_get_vector(row: &PgRow, column: &str) -> Result<Option<Vector>, DbError> {
    row.try_get::<Option<PgVector>, _>(column)
        .map(|value| value.map(Vector::from))
        .map_err(|source| DbError::Decode {
            column: column.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::TypeInfo;

    #[test]
    fn test_type_names() {
        assert_eq!(PgVector::type_info().name(), "vector");
        assert_eq!(PgVector::array_type_info().name(), "_vector");
    }

    #[test]
    fn test_encode_writes_binary_format() {
        let mut buf = PgArgumentBuffer::default();
        let is_null = PgVector(Vector::new(vec![1.0, 2.0, 3.0]))
            .encode_by_ref(&mut buf)
            .unwrap();
        assert!(matches!(is_null, IsNull::No));

        let bytes: &[u8] = &buf;
        assert_eq!(&bytes[..4], &[0, 3, 0, 0]);
        assert_eq!(&bytes[4..8], &1.0f32.to_be_bytes());
        assert_eq!(
            codec::decode_binary(bytes).unwrap().as_slice(),
            &[1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn test_encode_rejects_empty_vector() {
        let mut buf = PgArgumentBuffer::default();
        assert!(PgVector(Vector::new(Vec::new())).encode_by_ref(&mut buf).is_err());
    }

    #[test]
    fn test_conversions() {
        let vector = Vector::new(vec![0.5, -1.5]);
        let wrapped = PgVector::from(vector.clone());
        assert_eq!(Vector::from(wrapped.clone()), vector);
        assert_eq!(wrapped.into_inner(), vector);
    }
}
