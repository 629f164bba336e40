//! `pgvec encode`: validate host input and print its wire form.

use anyhow::{Context, Result};

use pgvec_core::codec;
use pgvec_types::{Vector, VectorInput};

/// Parse `input` as JSON and validate it as a vector of `dim` dimensions.
pub fn parse_vector(input: &str, dim: Option<usize>) -> Result<Vector> {
    let value: serde_json::Value =
        serde_json::from_str(input).with_context(|| format!("'{input}' is not valid JSON"))?;
    let vector = codec::to_vector(&VectorInput::from(value), dim)?;
    Ok(vector)
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn encode(input: &str, dim: Option<usize>, binary: bool, json: bool) -> Result<()> {
    let vector = parse_vector(input, dim)?;
    let literal = codec::encode_text(&vector);
    let binary_hex = if binary {
        Some(hex(&codec::encode_binary(&vector)?))
    } else {
        None
    };

    if json {
        let result = serde_json::json!({
            "dimensions": vector.dimensions(),
            "text": literal,
            "binary": binary_hex,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match binary_hex {
        Some(hex) => println!("{hex}"),
        None => println!("{literal}"),
    }
    tracing::info!("Encoded {} dimension(s)", vector.dimensions());
    Ok(())
}
