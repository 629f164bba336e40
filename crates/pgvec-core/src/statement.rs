//! Statement builders: SELECT, INSERT, DELETE.
//!
//! `build()` renders SQL with `$n` placeholders and binds every value against
//! its column type. Value validation failures surface as
//! [`StatementError::Bind`] before anything reaches the database.

use pgvec_types::{BindValue, StatementError, Value};

use crate::expr::{Expr, OrderBy, SqlWriter};
use crate::schema::{Table, quote_ident};

/// A rendered statement ready for execution.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltStatement {
    pub sql: String,
    pub params: Vec<BindValue>,
}

fn check_same_table(table: &Table, expr: &Expr) -> Result<(), StatementError> {
    for column in expr.columns() {
        if column.table() != table.name() {
            return Err(StatementError::Compile(format!(
                "column '{}.{}' does not belong to '{}'",
                column.table(),
                column.name(),
                table.name()
            )));
        }
    }
    Ok(())
}

fn unknown_column(table: &Table, column: &str) -> StatementError {
    StatementError::UnknownColumn {
        table: table.name().to_string(),
        column: column.to_string(),
    }
}

/// `SELECT ... FROM <table>`.
#[derive(Debug, Clone)]
pub struct Select {
    table: Table,
    columns: Vec<Expr>,
    filters: Vec<Expr>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Select {
    /// Select every column of `table` unless [`Select::column`] narrows it.
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            columns: Vec::new(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    pub fn column(mut self, expr: impl Into<Expr>) -> Self {
        self.columns.push(expr.into());
        self
    }

    /// Add a WHERE condition; multiple conditions are ANDed.
    pub fn filter(mut self, condition: Expr) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn order_by(mut self, ordering: impl Into<OrderBy>) -> Self {
        self.order_by.push(ordering.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn build(&self) -> Result<BuiltStatement, StatementError> {
        let table = quote_ident(self.table.name());
        let mut w = SqlWriter::new(format!("SELECT ... FROM {table}"));

        let columns: Vec<Expr> = if self.columns.is_empty() {
            self.table
                .columns()
                .iter()
                .filter_map(|c| self.table.col(c.name()))
                .map(Expr::from)
                .collect()
        } else {
            self.columns.clone()
        };
        if columns.is_empty() {
            return Err(StatementError::Compile(format!(
                "table '{}' has no columns to select",
                self.table.name()
            )));
        }

        w.push("SELECT ");
        for (i, expr) in columns.iter().enumerate() {
            check_same_table(&self.table, expr)?;
            if i > 0 {
                w.push(", ");
            }
            expr.render(&mut w)?;
        }
        w.push(&format!(" FROM {table}"));

        render_where(&self.table, &self.filters, &mut w)?;

        if !self.order_by.is_empty() {
            w.push(" ORDER BY ");
            for (i, ordering) in self.order_by.iter().enumerate() {
                check_same_table(&self.table, ordering.expr())?;
                if i > 0 {
                    w.push(", ");
                }
                ordering.render(&mut w)?;
            }
        }

        if let Some(limit) = self.limit {
            w.push(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            w.push(&format!(" OFFSET {offset}"));
        }

        let (sql, params) = w.finish();
        Ok(BuiltStatement { sql, params })
    }
}

fn render_where(table: &Table, filters: &[Expr], w: &mut SqlWriter) -> Result<(), StatementError> {
    let Some((first, rest)) = filters.split_first() else {
        return Ok(());
    };
    let condition = rest
        .iter()
        .cloned()
        .fold(first.clone(), |acc, next| acc.and(next));
    check_same_table(table, &condition)?;
    w.push(" WHERE ");
    condition.render(w)
}

/// `INSERT INTO <table> (...) VALUES (...)`.
#[derive(Debug, Clone)]
pub struct Insert {
    table: Table,
    values: Vec<(String, Value)>,
    returning: Vec<String>,
}

impl Insert {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            values: Vec::new(),
            returning: Vec::new(),
        }
    }

    /// Set a column value. Columns left unset take the database default.
    pub fn value(mut self, column: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.values.iter_mut().find(|(name, _)| name == column) {
            Some(slot) => slot.1 = value,
            None => self.values.push((column.to_string(), value)),
        }
        self
    }

    pub fn returning(mut self, column: &str) -> Self {
        self.returning.push(column.to_string());
        self
    }

    pub fn build(&self) -> Result<BuiltStatement, StatementError> {
        let mut columns = Vec::with_capacity(self.values.len());
        for (name, value) in &self.values {
            let column = self
                .table
                .get(name)
                .ok_or_else(|| unknown_column(&self.table, name))?;
            columns.push((column, value));
        }

        let mut sql = format!("INSERT INTO {}", quote_ident(self.table.name()));
        if columns.is_empty() {
            sql.push_str(" DEFAULT VALUES");
        } else {
            let names: Vec<_> = columns.iter().map(|(c, _)| quote_ident(c.name())).collect();
            let placeholders: Vec<_> = (1..=columns.len()).map(|i| format!("${i}")).collect();
            sql.push_str(&format!(
                " ({}) VALUES ({})",
                names.join(", "),
                placeholders.join(", ")
            ));
        }

        if !self.returning.is_empty() {
            let mut names = Vec::with_capacity(self.returning.len());
            for name in &self.returning {
                let column = self
                    .table
                    .get(name)
                    .ok_or_else(|| unknown_column(&self.table, name))?;
                names.push(quote_ident(column.name()));
            }
            sql.push_str(&format!(" RETURNING {}", names.join(", ")));
        }

        let mut params = Vec::with_capacity(columns.len());
        for (column, value) in columns {
            let bound = column
                .column_type()
                .bind(value)
                .map_err(|source| StatementError::Bind {
                    statement: sql.clone(),
                    column: column.name().to_string(),
                    source,
                })?;
            params.push(bound);
        }

        Ok(BuiltStatement { sql, params })
    }
}

/// `DELETE FROM <table> [WHERE ...]`.
#[derive(Debug, Clone)]
pub struct Delete {
    table: Table,
    filters: Vec<Expr>,
}

impl Delete {
    pub fn new(table: &Table) -> Self {
        Self {
            table: table.clone(),
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, condition: Expr) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn build(&self) -> Result<BuiltStatement, StatementError> {
        let table = quote_ident(self.table.name());
        let mut w = SqlWriter::new(format!("DELETE FROM {table}"));
        w.push(&format!("DELETE FROM {table}"));
        render_where(&self.table, &self.filters, &mut w)?;
        let (sql, params) = w.finish();
        Ok(BuiltStatement { sql, params })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;
    use crate::schema::Column;
    use ndarray::arr2;
    use pgvec_types::{BindError, Vector, VectorError, VectorInput};
    use serde_json::json;
    use std::error::Error as _;

    fn orm_item() -> Table {
        Table::new("orm_item")
            .column(Column::new("id", ColumnType::Serial).primary_key())
            .column(Column::new("factors", ColumnType::vector(3).unwrap()))
    }

    #[test]
    fn test_select_all_columns() {
        let built = Select::new(&orm_item()).build().unwrap();
        assert_eq!(built.sql, "SELECT orm_item.id, orm_item.factors FROM orm_item");
        assert!(built.params.is_empty());
    }

    #[test]
    fn test_order_by_distance() {
        let table = orm_item();
        let factors = table.col("factors").unwrap();
        let built = Select::new(&table)
            .order_by(factors.l2_distance(vec![1.0_f64, 1.0, 1.0]))
            .limit(5)
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT orm_item.id, orm_item.factors FROM orm_item \
             ORDER BY orm_item.factors <-> '[1,1,1]' LIMIT 5"
        );
    }

    #[test]
    fn test_select_distance_as_column() {
        let table = orm_item();
        let factors = table.col("factors").unwrap();
        let built = Select::new(&table)
            .column(factors.max_inner_product(vec![1.0_f32, 1.0, 1.0]))
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT orm_item.factors <#> '[1,1,1]' FROM orm_item"
        );
    }

    #[test]
    fn test_filter_and_order_desc() {
        let table = orm_item();
        let factors = table.col("factors").unwrap();
        let id = table.col("id").unwrap();
        let built = Select::new(&table)
            .column(id.clone())
            .filter(factors.cosine_distance(vec![1.0_f32, 0.0, 0.0]).lt(0.5_f64))
            .filter(factors.is_not_null())
            .order_by(id.desc())
            .offset(10)
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "SELECT orm_item.id FROM orm_item WHERE orm_item.factors <=> '[1,0,0]' < $1 \
             AND orm_item.factors IS NOT NULL ORDER BY orm_item.id DESC OFFSET 10"
        );
        assert_eq!(built.params, vec![BindValue::Float8(Some(0.5))]);
    }

    #[test]
    fn test_select_rejects_foreign_column() {
        let other = Table::new("other").column(Column::new("id", ColumnType::Integer));
        let built = Select::new(&orm_item())
            .column(other.col("id").unwrap())
            .build();
        assert!(matches!(built, Err(StatementError::Compile(_))));
    }

    #[test]
    fn test_insert_binds_vector() {
        let built = Insert::new(&orm_item())
            .value("factors", vec![1.5_f64, 2.0, 3.0])
            .returning("id")
            .build()
            .unwrap();
        assert_eq!(
            built.sql,
            "INSERT INTO orm_item (factors) VALUES ($1) RETURNING id"
        );
        assert_eq!(
            built.params,
            vec![BindValue::Vector(Some(Vector::new(vec![1.5, 2.0, 3.0])))]
        );
    }

    #[test]
    fn test_insert_without_vector_binds_null() {
        let built = Insert::new(&orm_item())
            .value("id", 3_i32)
            .value("factors", Value::Null)
            .build()
            .unwrap();
        assert_eq!(
            built.params,
            vec![BindValue::Int4(Some(3)), BindValue::Vector(None)]
        );

        let built = Insert::new(&orm_item()).build().unwrap();
        assert_eq!(built.sql, "INSERT INTO orm_item DEFAULT VALUES");
    }

    #[test]
    fn test_insert_bad_dimensions_is_statement_error() {
        let err = Insert::new(&orm_item())
            .value("factors", vec![1_i32, 2])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("expected 3 dimensions, not 2"));
        match &err {
            StatementError::Bind { column, source, .. } => {
                assert_eq!(column, "factors");
                assert_eq!(
                    source,
                    &BindError::Vector(VectorError::DimensionMismatch {
                        expected: 3,
                        actual: 2
                    })
                );
            }
            other => panic!("expected bind error, got {other:?}"),
        }
        assert!(err.source().unwrap().is::<BindError>());
    }

    #[test]
    fn test_insert_bad_ndim_is_statement_error() {
        let err = Insert::new(&orm_item())
            .value("factors", arr2(&[[1.0_f64, 2.0, 3.0]]))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("expected ndim to be 1"));
        assert_eq!(err.vector_error(), Some(&VectorError::Shape { ndim: 2 }));
    }

    #[test]
    fn test_insert_bad_dtype_is_statement_error() {
        let err = Insert::new(&orm_item())
            .value("factors", VectorInput::from(json!(["one", "two", "three"])))
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("dtype must be numeric"));
    }

    #[test]
    fn test_insert_unknown_column() {
        let err = Insert::new(&orm_item())
            .value("embedding", vec![1.0_f32, 2.0, 3.0])
            .build()
            .unwrap_err();
        assert!(matches!(err, StatementError::UnknownColumn { .. }));
    }

    #[test]
    fn test_insert_value_overrides_previous() {
        let built = Insert::new(&orm_item())
            .value("id", 1_i32)
            .value("id", 2_i32)
            .build()
            .unwrap();
        assert_eq!(built.params, vec![BindValue::Int4(Some(2))]);
    }

    #[test]
    fn test_delete() {
        let table = orm_item();
        assert_eq!(
            Delete::new(&table).build().unwrap().sql,
            "DELETE FROM orm_item"
        );

        let built = Delete::new(&table)
            .filter(table.col("id").unwrap().eq(2_i64))
            .build()
            .unwrap();
        assert_eq!(built.sql, "DELETE FROM orm_item WHERE orm_item.id = $1");
        assert_eq!(built.params, vec![BindValue::Int8(Some(2))]);
    }
}
