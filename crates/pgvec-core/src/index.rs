//! Index declarations with access methods, operator classes, and storage
//! parameters.
//!
//! Renders `CREATE INDEX <name> ON <table> USING <method> (<col> <opclass>)
//! WITH (<params>)`. Whether the operator class matches the distance metric
//! the queries use is not checked here; a mismatch shows up as an index the
//! planner never picks.

use std::fmt;

use pgvec_types::{DistanceMetric, SchemaError};

use crate::schema::{Table, quote_ident};

/// Index access method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessMethod {
    /// Inverted-file index; needs `lists` and data present at build time.
    Ivfflat,
    /// Hierarchical navigable small world graph.
    Hnsw,
    Other(String),
}

impl AccessMethod {
    pub fn as_str(&self) -> &str {
        match self {
            AccessMethod::Ivfflat => "ivfflat",
            AccessMethod::Hnsw => "hnsw",
            AccessMethod::Other(name) => name,
        }
    }
}

impl From<&str> for AccessMethod {
    fn from(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "ivfflat" => AccessMethod::Ivfflat,
            "hnsw" => AccessMethod::Hnsw,
            _ => AccessMethod::Other(name.to_string()),
        }
    }
}

impl fmt::Display for AccessMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operator class naming the comparison semantics an index serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorClass(String);

impl OperatorClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The extension's `vector` operator class for `metric`.
    ///
    /// `vector_l1_ops` is only implemented for `hnsw`.
    pub fn for_metric(metric: DistanceMetric) -> Self {
        let name = match metric {
            DistanceMetric::L2 => "vector_l2_ops",
            DistanceMetric::InnerProduct => "vector_ip_ops",
            DistanceMetric::Cosine => "vector_cosine_ops",
            DistanceMetric::L1 => "vector_l1_ops",
        };
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OperatorClass {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<DistanceMetric> for OperatorClass {
    fn from(metric: DistanceMetric) -> Self {
        Self::for_metric(metric)
    }
}

/// A storage parameter value in `WITH (...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexParam {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl IndexParam {
    fn to_sql(&self) -> String {
        match self {
            IndexParam::Int(v) => v.to_string(),
            IndexParam::Float(v) => v.to_string(),
            IndexParam::Bool(v) => v.to_string(),
            IndexParam::Text(v) => format!("'{}'", v.replace('\'', "''")),
        }
    }
}

impl From<i32> for IndexParam {
    fn from(v: i32) -> Self {
        IndexParam::Int(i64::from(v))
    }
}

impl From<i64> for IndexParam {
    fn from(v: i64) -> Self {
        IndexParam::Int(v)
    }
}

impl From<f64> for IndexParam {
    fn from(v: f64) -> Self {
        IndexParam::Float(v)
    }
}

impl From<bool> for IndexParam {
    fn from(v: bool) -> Self {
        IndexParam::Bool(v)
    }
}

impl From<&str> for IndexParam {
    fn from(v: &str) -> Self {
        IndexParam::Text(v.to_string())
    }
}

/// An index declaration over columns of one table.
#[derive(Debug, Clone)]
pub struct Index {
    name: String,
    table: Table,
    columns: Vec<String>,
    method: Option<AccessMethod>,
    ops: Vec<(String, OperatorClass)>,
    params: Vec<(String, IndexParam)>,
    if_not_exists: bool,
}

impl Index {
    pub fn new(name: impl Into<String>, table: &Table) -> Self {
        Self {
            name: name.into(),
            table: table.clone(),
            columns: Vec::new(),
            method: None,
            ops: Vec::new(),
            params: Vec::new(),
            if_not_exists: false,
        }
    }

    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.to_string());
        self
    }

    pub fn using(mut self, method: impl Into<AccessMethod>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Operator class for one indexed column.
    pub fn ops(mut self, column: &str, opclass: impl Into<OperatorClass>) -> Self {
        let opclass = opclass.into();
        match self.ops.iter_mut().find(|(name, _)| name == column) {
            Some(slot) => slot.1 = opclass,
            None => self.ops.push((column.to_string(), opclass)),
        }
        self
    }

    /// Access-method storage parameter, e.g. `lists` for ivfflat or `m` for hnsw.
    pub fn with(mut self, key: &str, value: impl Into<IndexParam>) -> Self {
        let value = value.into();
        match self.params.iter_mut().find(|(name, _)| name == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key.to_string(), value)),
        }
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn method(&self) -> Option<&AccessMethod> {
        self.method.as_ref()
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.columns.is_empty() {
            return Err(SchemaError::EmptyIndex(self.name.clone()));
        }
        for column in &self.columns {
            if self.table.get(column).is_none() {
                return Err(SchemaError::UnknownColumn {
                    table: self.table.name().to_string(),
                    column: column.clone(),
                });
            }
        }
        for (column, _) in &self.ops {
            if !self.columns.contains(column) {
                return Err(SchemaError::OperatorClassForUnindexedColumn {
                    index: self.name.clone(),
                    column: column.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn create_sql(&self) -> Result<String, SchemaError> {
        self.validate()?;

        let mut sql = String::from("CREATE INDEX ");
        if self.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&format!(
            "{} ON {}",
            quote_ident(&self.name),
            quote_ident(self.table.name())
        ));
        if let Some(method) = &self.method {
            sql.push_str(&format!(" USING {}", quote_ident(method.as_str())));
        }

        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                match self.ops.iter().find(|(name, _)| name == column) {
                    Some((_, opclass)) => {
                        format!("{} {}", quote_ident(column), quote_ident(opclass.as_str()))
                    }
                    None => quote_ident(column).into_owned(),
                }
            })
            .collect();
        sql.push_str(&format!(" ({})", columns.join(", ")));

        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .map(|(key, value)| format!("{} = {}", quote_ident(key), value.to_sql()))
                .collect();
            sql.push_str(&format!(" WITH ({})", params.join(", ")));
        }

        Ok(sql)
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP INDEX {}", quote_ident(&self.name))
    }

    pub fn drop_if_exists_sql(&self) -> String {
        format!("DROP INDEX IF EXISTS {}", quote_ident(&self.name))
    }
}
