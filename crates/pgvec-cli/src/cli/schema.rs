//! `pgvec init` and `pgvec columns`.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use pgvec_core::ColumnType;
use pgvec_infra::reflect_table;

use crate::state::AppState;

/// Ensure the extension exists and print its version.
pub async fn init(state: &AppState, json: bool) -> Result<()> {
    state
        .pool()
        .ensure_extension()
        .await
        .context("Failed to create the vector extension")?;
    let version = state.pool().extension_version().await?;

    if json {
        let result = serde_json::json!({
            "extension": "vector",
            "version": version,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} vector extension {}",
            style("ok").green(),
            style(version.as_deref().unwrap_or("unknown")).cyan(),
        );
        println!();
    }
    Ok(())
}

fn dimensions(column_type: &ColumnType) -> Option<usize> {
    column_type.as_vector().and_then(|vector| vector.dimensions())
}

/// Print the reflected columns of `table`.
pub async fn columns(state: &AppState, table: &str, json: bool) -> Result<()> {
    let reflected = reflect_table(state.pool(), &state.registry, table)
        .await
        .with_context(|| format!("Failed to reflect '{table}'"))?;

    if json {
        let columns: Vec<_> = reflected
            .columns()
            .iter()
            .map(|column| {
                serde_json::json!({
                    "name": column.name(),
                    "type": column.column_type().sql_type(),
                    "dimensions": dimensions(column.column_type()),
                    "nullable": column.is_nullable(),
                    "primary_key": column.is_primary_key(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&columns)?);
        return Ok(());
    }

    let mut output = Table::new();
    output.load_preset(presets::UTF8_FULL_CONDENSED);
    output.set_content_arrangement(ContentArrangement::Dynamic);
    output.set_header(vec![
        Cell::new("Column").fg(Color::White),
        Cell::new("Type").fg(Color::White),
        Cell::new("Dimensions").fg(Color::White),
        Cell::new("Nullable").fg(Color::White),
    ]);

    for column in reflected.columns() {
        let column_type = column.column_type();
        let type_color = match column_type {
            ColumnType::Vector(_) => Color::Green,
            ColumnType::Unknown(_) => Color::Yellow,
            _ => Color::White,
        };
        let name = if column.is_primary_key() {
            format!("{} (pk)", column.name())
        } else {
            column.name().to_string()
        };
        output.add_row(vec![
            Cell::new(name).fg(Color::Cyan),
            Cell::new(column_type.sql_type()).fg(type_color),
            Cell::new(
                dimensions(column_type)
                    .map(|d| d.to_string())
                    .unwrap_or_default(),
            ),
            Cell::new(if column.is_nullable() { "yes" } else { "no" }).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("  {}", style(reflected.name()).bold());
    println!("{output}");
    println!();
    Ok(())
}
