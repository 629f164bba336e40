//! Type registry for resolving catalog type names into column types.
//!
//! Reflection reads type names the way PostgreSQL's `format_type()` prints
//! them (`integer`, `double precision`, `vector(3)`). The registry maps the
//! base name to a factory that receives the parenthesised modifiers. Custom
//! types are opt-in: the `vector` factory is added by [`register_vector`].

use std::collections::HashMap;

use pgvec_types::SchemaError;

use crate::column::{ColumnType, VectorType};

/// Builds a column type from its type modifiers (`[3]` for `vector(3)`).
pub type TypeFactory = fn(&[i64]) -> Result<ColumnType, SchemaError>;

/// Maps SQL type names to column type factories.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    factories: HashMap<String, TypeFactory>,
}

impl TypeRegistry {
    /// An empty registry. Every name resolves to [`ColumnType::Unknown`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry that knows PostgreSQL's scalar types used by the schema layer.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for name in ["integer", "int", "int4"] {
            registry.register(name, |_| Ok(ColumnType::Integer));
        }
        for name in ["bigint", "int8"] {
            registry.register(name, |_| Ok(ColumnType::BigInt));
        }
        registry.register("serial", |_| Ok(ColumnType::Serial));
        registry.register("bigserial", |_| Ok(ColumnType::BigSerial));
        for name in ["real", "float4"] {
            registry.register(name, |_| Ok(ColumnType::Real));
        }
        for name in ["double precision", "float8"] {
            registry.register(name, |_| Ok(ColumnType::Double));
        }
        for name in ["boolean", "bool"] {
            registry.register(name, |_| Ok(ColumnType::Boolean));
        }
        for name in ["text", "character varying", "varchar"] {
            registry.register(name, |_| Ok(ColumnType::Text));
        }
        registry
    }

    /// The builtin registry plus the `vector` type.
    pub fn with_vector() -> Self {
        let mut registry = Self::builtin();
        register_vector(&mut registry);
        registry
    }

    /// Register (or replace) the factory for a base type name.
    pub fn register(&mut self, name: &str, factory: TypeFactory) {
        self.factories.insert(name.to_lowercase(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(&name.to_lowercase())
    }

    /// Resolve a full type spelling such as `vector(3)` or
    /// `timestamp(3) with time zone`.
    ///
    /// Unregistered or unparsable names resolve to [`ColumnType::Unknown`]
    /// carrying the original spelling. Only a blank name is an error.
    pub fn resolve(&self, type_name: &str) -> Result<ColumnType, SchemaError> {
        let parsed = match parse_type_name(type_name) {
            Ok(parsed) => Some(parsed),
            Err(err) if type_name.trim().is_empty() => return Err(err),
            Err(_) => None,
        };
        match parsed.and_then(|(base, modifiers)| Some((self.factories.get(&base)?, modifiers))) {
            Some((factory, modifiers)) => factory(&modifiers),
            None => {
                tracing::warn!("No column type registered for '{type_name}', treating as opaque");
                Ok(ColumnType::Unknown(type_name.trim().to_string()))
            }
        }
    }
}

/// Register the `vector` column type with `registry`.
pub fn register_vector(registry: &mut TypeRegistry) {
    registry.register(VectorType::NAME, |modifiers| {
        VectorType::from_modifiers(modifiers).map(ColumnType::Vector)
    });
}

/// Split `name(m1,m2)suffix` into a lower-cased base name and integer
/// modifiers. The suffix is kept on the base, so `timestamp(3) with time zone`
/// has base `timestamp with time zone` and `character varying(20)[]` has base
/// `character varying[]`.
fn parse_type_name(type_name: &str) -> Result<(String, Vec<i64>), SchemaError> {
    let invalid = || SchemaError::InvalidTypeName(type_name.to_string());
    let trimmed = type_name.trim();
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let Some(open) = trimmed.find('(') else {
        return Ok((trimmed.to_lowercase(), Vec::new()));
    };
    let close = trimmed[open..]
        .find(')')
        .map(|offset| open + offset)
        .ok_or_else(invalid)?;

    let prefix = trimmed[..open].trim();
    let suffix = trimmed[close + 1..].trim();
    if prefix.is_empty() || suffix.contains(['(', ')']) {
        return Err(invalid());
    }

    let modifiers = trimmed[open + 1..close]
        .split(',')
        .map(|m| m.trim().parse::<i64>().map_err(|_| invalid()))
        .collect::<Result<Vec<_>, _>>()?;

    let base = if suffix.is_empty() {
        prefix.to_string()
    } else if suffix.starts_with('[') {
        format!("{prefix}{suffix}")
    } else {
        format!("{prefix} {suffix}")
    };
    Ok((base.to_lowercase(), modifiers))
}
