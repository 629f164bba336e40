//! Table metadata and DDL rendering.
//!
//! Tables are declared explicitly with a builder and are immutable once handed
//! to statements. [`Catalog`] groups tables for `create_all` / `drop_all`.

use std::borrow::Cow;
use std::collections::HashSet;

use pgvec_types::{DistanceMetric, SchemaError, Value, VectorInput};

use crate::column::ColumnType;
use crate::expr::{Expr, OrderBy};

/// PostgreSQL's reserved and type/function-name keywords. Neither class is
/// accepted as a bare column or table name.
const RESERVED: &[&str] = &[
    // reserved
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric", "both",
    "case", "cast", "check", "collate", "column", "constraint", "create", "current_catalog",
    "current_date", "current_role", "current_time", "current_timestamp", "current_user",
    "default", "deferrable", "desc", "distinct", "do", "else", "end", "except", "false", "fetch",
    "for", "foreign", "from", "grant", "group", "having", "in", "initially", "intersect", "into",
    "lateral", "leading", "limit", "localtime", "localtimestamp", "not", "null", "offset", "on",
    "only", "or", "order", "placing", "primary", "references", "returning", "select",
    "session_user", "some", "symmetric", "system_user", "table", "then", "to", "trailing",
    "true", "union", "unique", "user", "using", "variadic", "when", "where", "window", "with",
    // type_func_name
    "authorization", "binary", "collation", "concurrently", "cross", "current_schema", "freeze",
    "full", "ilike", "inner", "is", "isnull", "join", "left", "like", "natural", "notnull",
    "outer", "overlaps", "right", "similar", "tablesample", "verbose",
];

/// Quote an identifier only when PostgreSQL would otherwise fold or reject it.
pub fn quote_ident(name: &str) -> Cow<'_, str> {
    let mut chars = name.chars();
    let plain = match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_')
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$')
        }
        None => false,
    };

    if plain && !RESERVED.contains(&name) {
        Cow::Borrowed(name)
    } else {
        Cow::Owned(format!("\"{}\"", name.replace('"', "\"\"")))
    }
}

/// A column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    column_type: ColumnType,
    primary_key: bool,
    nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: impl Into<ColumnType>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            primary_key: false,
            nullable: true,
        }
    }

    /// Mark as (part of) the primary key. Implies NOT NULL.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    fn ddl(&self) -> String {
        let mut ddl = format!("{} {}", quote_ident(&self.name), self.column_type.sql_type());
        if !self.nullable {
            ddl.push_str(" NOT NULL");
        }
        ddl
    }
}

/// A table definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// A reference to one of this table's columns, for use in expressions.
    pub fn col(&self, name: &str) -> Option<ColumnRef> {
        self.get(name).map(|column| ColumnRef {
            table: self.name.clone(),
            name: column.name.clone(),
            column_type: column.column_type.clone(),
        })
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn create_sql(&self) -> Result<String, SchemaError> {
        self.render_create(false)
    }

    pub fn create_if_not_exists_sql(&self) -> Result<String, SchemaError> {
        self.render_create(true)
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE {}", quote_ident(&self.name))
    }

    pub fn drop_if_exists_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_ident(&self.name))
    }

    fn render_create(&self, if_not_exists: bool) -> Result<String, SchemaError> {
        self.validate()?;

        let mut parts: Vec<String> = self.columns.iter().map(Column::ddl).collect();
        let primary_key: Vec<_> = self
            .columns
            .iter()
            .filter(|c| c.primary_key)
            .map(|c| quote_ident(&c.name))
            .collect();
        if !primary_key.is_empty() {
            parts.push(format!("PRIMARY KEY ({})", primary_key.join(", ")));
        }

        Ok(format!(
            "CREATE TABLE {}{} ({})",
            if if_not_exists { "IF NOT EXISTS " } else { "" },
            quote_ident(&self.name),
            parts.join(", ")
        ))
    }
}

/// A column bound to its table, the starting point for expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    table: String,
    name: String,
    column_type: ColumnType,
}

impl ColumnRef {
    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> &ColumnType {
        &self.column_type
    }

    /// `table.column`, quoted as needed.
    pub fn qualified(&self) -> String {
        format!("{}.{}", quote_ident(&self.table), quote_ident(&self.name))
    }

    pub fn expr(&self) -> Expr {
        Expr::Column(self.clone())
    }

    /// Distance from this column to `target` under `metric`.
    ///
    /// The target is validated against the column's dimensionality when the
    /// statement is built.
    pub fn distance(&self, metric: DistanceMetric, target: impl Into<VectorInput>) -> Expr {
        Expr::Distance {
            metric,
            column: self.clone(),
            target: target.into(),
        }
    }

    /// Euclidean distance (`<->`).
    pub fn l2_distance(&self, target: impl Into<VectorInput>) -> Expr {
        self.distance(DistanceMetric::L2, target)
    }

    /// Negative inner product (`<#>`).
    ///
    /// The extension returns `-(a · b)`, so ordering ascending by this
    /// expression ranks rows by decreasing inner product.
    pub fn max_inner_product(&self, target: impl Into<VectorInput>) -> Expr {
        self.distance(DistanceMetric::InnerProduct, target)
    }

    /// Cosine distance (`<=>`).
    pub fn cosine_distance(&self, target: impl Into<VectorInput>) -> Expr {
        self.distance(DistanceMetric::Cosine, target)
    }

    /// Taxicab distance (`<+>`).
    pub fn l1_distance(&self, target: impl Into<VectorInput>) -> Expr {
        self.distance(DistanceMetric::L1, target)
    }

    pub fn eq(&self, value: impl Into<Value>) -> Expr {
        self.expr().eq(Expr::Value(value.into()))
    }

    pub fn is_null(&self) -> Expr {
        self.expr().is_null()
    }

    pub fn is_not_null(&self) -> Expr {
        self.expr().is_not_null()
    }

    pub fn asc(&self) -> OrderBy {
        self.expr().asc()
    }

    pub fn desc(&self) -> OrderBy {
        self.expr().desc()
    }
}

/// A set of tables created and dropped together.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tables: Vec<Table>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn get(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// `CREATE TABLE IF NOT EXISTS` for every table, in declaration order.
    pub fn create_all_sql(&self) -> Result<Vec<String>, SchemaError> {
        self.tables
            .iter()
            .map(Table::create_if_not_exists_sql)
            .collect()
    }

    /// `DROP TABLE IF EXISTS` for every table, in reverse declaration order.
    pub fn drop_all_sql(&self) -> Vec<String> {
        self.tables
            .iter()
            .rev()
            .map(Table::drop_if_exists_sql)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_table() -> Table {
        Table::new("core_item")
            .column(Column::new("id", ColumnType::Serial).primary_key())
            .column(Column::new("factors", ColumnType::vector(3).unwrap()))
    }

    #[test]
    fn test_create_table_sql() {
        assert_eq!(
            item_table().create_sql().unwrap(),
            "CREATE TABLE core_item (id serial NOT NULL, factors vector(3), PRIMARY KEY (id))"
        );
    }

    #[test]
    fn test_drop_table_sql() {
        assert_eq!(item_table().drop_sql(), "DROP TABLE core_item");
        assert_eq!(
            item_table().drop_if_exists_sql(),
            "DROP TABLE IF EXISTS core_item"
        );
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let table = item_table().column(Column::new("id", ColumnType::Integer));
        assert!(matches!(
            table.create_sql(),
            Err(SchemaError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("factors"), "factors");
        assert_eq!(quote_ident("embedding_1"), "embedding_1");
        assert_eq!(quote_ident("Factors"), "\"Factors\"");
        assert_eq!(quote_ident("order"), "\"order\"");
        assert_eq!(quote_ident("current_user"), "\"current_user\"");
        assert_eq!(quote_ident("left"), "\"left\"");
        assert_eq!(quote_ident("lateral"), "\"lateral\"");
        assert_eq!(quote_ident("1abc"), "\"1abc\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(quote_ident(""), "\"\"");
    }

    #[test]
    fn test_keyword_columns_are_quoted_in_ddl() {
        let table = Table::new("t")
            .column(Column::new("current_user", ColumnType::Text))
            .column(Column::new("left", ColumnType::Integer))
            .column(Column::new("index", ColumnType::Integer));
        assert_eq!(
            table.create_sql().unwrap(),
            "CREATE TABLE t (\"current_user\" text, \"left\" integer, index integer)"
        );
    }

    #[test]
    fn test_column_ref_carries_type() {
        let table = item_table();
        let factors = table.col("factors").unwrap();
        assert_eq!(factors.qualified(), "core_item.factors");
        assert_eq!(
            factors.column_type().as_vector().unwrap().dimensions(),
            Some(3)
        );
        assert!(table.col("missing").is_none());
    }

    #[test]
    fn test_catalog_ordering() {
        let catalog = Catalog::new()
            .table(item_table())
            .table(Table::new("other").column(Column::new("id", ColumnType::BigSerial).primary_key()));

        let create = catalog.create_all_sql().unwrap();
        assert!(create[0].starts_with("CREATE TABLE IF NOT EXISTS core_item"));
        assert!(create[1].starts_with("CREATE TABLE IF NOT EXISTS other"));

        let drop = catalog.drop_all_sql();
        assert_eq!(
            drop,
            vec!["DROP TABLE IF EXISTS other", "DROP TABLE IF EXISTS core_item"]
        );
        assert!(catalog.get("other").is_some());
    }
}
