//! `pgvec create-index` and `pgvec drop-index`.

use anyhow::{Context, Result, bail};
use console::style;

use pgvec_core::{Index, IndexParam, OperatorClass};
use pgvec_infra::reflect_table;
use pgvec_types::DistanceMetric;

use crate::state::AppState;

/// Parse a `key=value` storage parameter. Integers, floats and booleans are
/// recognised; anything else is passed as quoted text.
pub fn parse_param(raw: &str) -> Result<(String, IndexParam), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }

    let param = if let Ok(v) = value.parse::<i64>() {
        IndexParam::Int(v)
    } else if let Ok(v) = value.parse::<f64>() {
        IndexParam::Float(v)
    } else if let Ok(v) = value.parse::<bool>() {
        IndexParam::Bool(v)
    } else {
        IndexParam::Text(value.to_string())
    };
    Ok((key.to_string(), param))
}

/// Options for `create-index`, as parsed from the command line.
pub struct CreateIndexArgs {
    pub name: String,
    pub table: String,
    pub column: String,
    pub method: String,
    pub metric: DistanceMetric,
    pub opclass: Option<String>,
    pub params: Vec<(String, IndexParam)>,
    pub if_not_exists: bool,
}

pub async fn create_index(state: &AppState, args: CreateIndexArgs, json: bool) -> Result<()> {
    let table = reflect_table(state.pool(), &state.registry, &args.table)
        .await
        .with_context(|| format!("Failed to reflect '{}'", args.table))?;

    let Some(column) = table.get(&args.column) else {
        bail!("Column '{}' not found on '{}'", args.column, args.table);
    };
    if column.column_type().as_vector().is_none() {
        bail!(
            "Column '{}' is {}, not a vector column",
            args.column,
            column.column_type()
        );
    }

    let opclass = match &args.opclass {
        Some(name) => OperatorClass::new(name.as_str()),
        None => OperatorClass::for_metric(args.metric),
    };

    let mut index = Index::new(&args.name, &table)
        .column(&args.column)
        .using(args.method.as_str())
        .ops(&args.column, opclass.clone());
    for (key, value) in args.params {
        index = index.with(&key, value);
    }
    if args.if_not_exists {
        index = index.if_not_exists();
    }

    let sql = index.create_sql()?;
    state
        .executor
        .create_index(&index)
        .await
        .with_context(|| format!("Failed to create index '{}'", args.name))?;

    if json {
        let result = serde_json::json!({
            "index": args.name,
            "table": args.table,
            "column": args.column,
            "opclass": opclass.as_str(),
            "sql": sql,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Created index '{}' on {}.{}",
            style("ok").green(),
            style(&args.name).cyan(),
            args.table,
            args.column,
        );
        println!("  {}", style(sql).dim());
        println!();
    }
    Ok(())
}

pub async fn drop_index(state: &AppState, name: &str, if_exists: bool, json: bool) -> Result<()> {
    state
        .executor
        .drop_index(name, if_exists)
        .await
        .with_context(|| format!("Failed to drop index '{name}'"))?;

    if json {
        let result = serde_json::json!({ "dropped": name });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!("  {} Dropped index '{}'", style("ok").green(), style(name).cyan());
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param_types() {
        assert_eq!(
            parse_param("lists=100").unwrap(),
            ("lists".to_string(), IndexParam::Int(100))
        );
        assert_eq!(
            parse_param("ratio = 0.5").unwrap(),
            ("ratio".to_string(), IndexParam::Float(0.5))
        );
        assert_eq!(
            parse_param("fastupdate=false").unwrap(),
            ("fastupdate".to_string(), IndexParam::Bool(false))
        );
        assert_eq!(
            parse_param("mode=fast").unwrap(),
            ("mode".to_string(), IndexParam::Text("fast".to_string()))
        );
    }

    #[test]
    fn test_parse_param_errors() {
        assert!(parse_param("lists").is_err());
        assert!(parse_param("=3").is_err());
    }
}
