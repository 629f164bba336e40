//! Query expressions: column references, operands, distance operators, and
//! boolean predicates.
//!
//! Expressions are plain values composed with named methods and rendered by
//! the statement builders. A distance expression renders as
//! `<column> <op> '<wire_text>'`, leaving the computation to the database.

use pgvec_types::{BindError, BindValue, DistanceMetric, StatementError, Value, VectorInput};

use crate::codec;
use crate::column::bind_literal;
use crate::schema::ColumnRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    fn as_sql(&self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
        }
    }

    fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// A scalar or boolean SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnRef),
    Value(Value),
    Distance {
        metric: DistanceMetric,
        column: ColumnRef,
        target: VectorInput,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
}

impl Expr {
    pub fn value(value: impl Into<Value>) -> Self {
        Expr::Value(value.into())
    }

    fn binary(self, op: BinaryOp, right: impl Into<Expr>) -> Self {
        Expr::Binary {
            op,
            left: Box::new(self),
            right: Box::new(right.into()),
        }
    }

    pub fn eq(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    pub fn ne(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Ne, right)
    }

    pub fn lt(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Lt, right)
    }

    pub fn le(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Le, right)
    }

    pub fn gt(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    pub fn ge(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Ge, right)
    }

    pub fn and(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::And, right)
    }

    pub fn or(self, right: impl Into<Expr>) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Expr::Not(Box::new(self))
    }

    pub fn is_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    pub fn asc(self) -> OrderBy {
        OrderBy {
            expr: self,
            descending: false,
        }
    }

    pub fn desc(self) -> OrderBy {
        OrderBy {
            expr: self,
            descending: true,
        }
    }

    /// Every column this expression mentions.
    pub(crate) fn columns(&self) -> Vec<&ColumnRef> {
        match self {
            Expr::Column(column) => vec![column],
            Expr::Distance { column, .. } => vec![column],
            Expr::Value(_) => Vec::new(),
            Expr::Binary { left, right, .. } => {
                let mut columns = left.columns();
                columns.extend(right.columns());
                columns
            }
            Expr::Not(expr) | Expr::IsNull { expr, .. } => expr.columns(),
        }
    }

    pub(crate) fn render(&self, w: &mut SqlWriter) -> Result<(), StatementError> {
        match self {
            Expr::Column(column) => w.push(&column.qualified()),
            Expr::Value(value) => match bind_literal(value) {
                Ok(Some(bound)) => w.push_param(bound),
                Ok(None) => w.push("NULL"),
                Err(source) => return Err(w.bind_error("<literal>", source)),
            },
            Expr::Distance {
                metric,
                column,
                target,
            } => {
                let Some(vector_type) = column.column_type().as_vector() else {
                    return Err(StatementError::Compile(format!(
                        "{metric} distance needs a vector column, '{}' is {}",
                        column.name(),
                        column.column_type()
                    )));
                };
                let vector = vector_type
                    .to_vector(target)
                    .map_err(|e| w.bind_error(column.name(), BindError::Vector(e)))?;
                w.push(&format!(
                    "{} {} '{}'",
                    column.qualified(),
                    metric.operator(),
                    codec::encode_text(&vector)
                ));
            }
            Expr::Binary { op, left, right } => {
                render_operand(left, *op, w)?;
                w.push(&format!(" {} ", op.as_sql()));
                render_operand(right, *op, w)?;
            }
            Expr::Not(expr) => {
                w.push("NOT (");
                expr.render(w)?;
                w.push(")");
            }
            Expr::IsNull { expr, negated } => {
                let nested = matches!(**expr, Expr::Binary { .. } | Expr::Not(_));
                if nested {
                    w.push("(");
                }
                expr.render(w)?;
                if nested {
                    w.push(")");
                }
                w.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
        }
        Ok(())
    }
}

/// Parenthesize a logical operand that mixes AND/OR, and any compound operand
/// of a comparison.
fn render_operand(operand: &Expr, parent: BinaryOp, w: &mut SqlWriter) -> Result<(), StatementError> {
    let nested = match operand {
        Expr::Binary { op, .. } if parent.is_logical() => op.is_logical() && *op != parent,
        Expr::Binary { .. } | Expr::IsNull { .. } | Expr::Not(_) => !parent.is_logical(),
        _ => false,
    };
    if nested {
        w.push("(");
    }
    operand.render(w)?;
    if nested {
        w.push(")");
    }
    Ok(())
}

impl From<ColumnRef> for Expr {
    fn from(column: ColumnRef) -> Self {
        Expr::Column(column)
    }
}

impl From<&ColumnRef> for Expr {
    fn from(column: &ColumnRef) -> Self {
        Expr::Column(column.clone())
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(v: bool) -> Self {
        Expr::Value(v.into())
    }
}

impl From<i32> for Expr {
    fn from(v: i32) -> Self {
        Expr::Value(v.into())
    }
}

impl From<i64> for Expr {
    fn from(v: i64) -> Self {
        Expr::Value(v.into())
    }
}

impl From<f32> for Expr {
    fn from(v: f32) -> Self {
        Expr::Value(v.into())
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Value(v.into())
    }
}

impl From<&str> for Expr {
    fn from(v: &str) -> Self {
        Expr::Value(v.into())
    }
}

impl From<String> for Expr {
    fn from(v: String) -> Self {
        Expr::Value(v.into())
    }
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    expr: Expr,
    descending: bool,
}

impl OrderBy {
    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    pub(crate) fn render(&self, w: &mut SqlWriter) -> Result<(), StatementError> {
        self.expr.render(w)?;
        if self.descending {
            w.push(" DESC");
        }
        Ok(())
    }
}

impl From<Expr> for OrderBy {
    fn from(expr: Expr) -> Self {
        expr.asc()
    }
}

impl From<ColumnRef> for OrderBy {
    fn from(column: ColumnRef) -> Self {
        column.asc()
    }
}

/// Accumulates SQL text and positional parameters while a statement renders.
pub(crate) struct SqlWriter {
    sql: String,
    params: Vec<BindValue>,
    /// Statement summary quoted in bind errors.
    summary: String,
}

impl SqlWriter {
    pub(crate) fn new(summary: impl Into<String>) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            summary: summary.into(),
        }
    }

    pub(crate) fn push(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    pub(crate) fn push_param(&mut self, value: BindValue) {
        self.params.push(value);
        self.sql.push_str(&format!("${}", self.params.len()));
    }

    pub(crate) fn bind_error(&self, column: &str, source: BindError) -> StatementError {
        StatementError::Bind {
            statement: self.summary.clone(),
            column: column.to_string(),
            source,
        }
    }

    pub(crate) fn finish(self) -> (String, Vec<BindValue>) {
        (self.sql, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnType;
    use crate::schema::{Column, Table};
    use pgvec_types::VectorError;

    fn items() -> Table {
        Table::new("items")
            .column(Column::new("id", ColumnType::Integer).primary_key())
            .column(Column::new("embedding", ColumnType::vector(3).unwrap()))
            .column(Column::new("title", ColumnType::Text))
    }

    fn render(expr: &Expr) -> Result<(String, Vec<BindValue>), StatementError> {
        let mut w = SqlWriter::new("SELECT ... FROM items");
        expr.render(&mut w)?;
        Ok(w.finish())
    }

    #[test]
    fn test_distance_operators_render_inline_literal() {
        let embedding = items().col("embedding").unwrap();
        let target = vec![1.0_f64, 1.0, 1.0];

        let cases = [
            (embedding.l2_distance(target.clone()), "<->"),
            (embedding.max_inner_product(target.clone()), "<#>"),
            (embedding.cosine_distance(target.clone()), "<=>"),
            (embedding.l1_distance(target.clone()), "<+>"),
        ];
        for (expr, op) in cases {
            let (sql, params) = render(&expr).unwrap();
            assert_eq!(sql, format!("items.embedding {op} '[1,1,1]'"));
            assert!(params.is_empty());
        }
    }

    #[test]
    fn test_distance_target_validated_against_column() {
        let embedding = items().col("embedding").unwrap();
        let err = render(&embedding.l2_distance(vec![1.0_f64, 2.0])).unwrap_err();
        assert_eq!(
            err.vector_error(),
            Some(&VectorError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
        assert!(err.to_string().contains("expected 3 dimensions, not 2"));
    }

    #[test]
    fn test_distance_on_non_vector_column_fails() {
        let title = items().col("title").unwrap();
        let err = render(&title.cosine_distance(vec![1.0_f32, 2.0, 3.0])).unwrap_err();
        assert!(matches!(err, StatementError::Compile(_)));
    }

    #[test]
    fn test_distance_as_predicate() {
        let embedding = items().col("embedding").unwrap();
        let expr = embedding.l2_distance(vec![1.0_f32, 1.0, 1.0]).lt(1.5_f64);
        let (sql, params) = render(&expr).unwrap();
        assert_eq!(sql, "items.embedding <-> '[1,1,1]' < $1");
        assert_eq!(params, vec![BindValue::Float8(Some(1.5))]);
    }

    #[test]
    fn test_logical_composition_parenthesizes() {
        let table = items();
        let id = table.col("id").unwrap();
        let title = table.col("title").unwrap();

        let expr = id
            .expr()
            .gt(1_i32)
            .and(title.eq("x").or(title.is_null()))
            .and(id.expr().le(9_i32));
        let (sql, params) = render(&expr).unwrap();
        assert_eq!(
            sql,
            "items.id > $1 AND (items.title = $2 OR items.title IS NULL) AND items.id <= $3"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_not_and_null_literal() {
        let title = items().col("title").unwrap();
        let expr = title.expr().eq(Value::Null).not();
        let (sql, params) = render(&expr).unwrap();
        assert_eq!(sql, "NOT (items.title = NULL)");
        assert!(params.is_empty());
    }

    #[test]
    fn test_vector_literal_operand_is_bound() {
        let embedding = items().col("embedding").unwrap();
        let expr = embedding.expr().eq(Value::from(vec![1.0_f32, 2.0, 3.0]));
        let (sql, params) = render(&expr).unwrap();
        assert_eq!(sql, "items.embedding = $1");
        assert!(matches!(params[0], BindValue::Vector(Some(_))));
    }
}
