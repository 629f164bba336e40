//! Configuration loader for pgvec.
//!
//! Reads a TOML file into [`PgvecConfig`]. Falls back to defaults when the
//! file is missing or malformed so a broken config never blocks the CLI.

use std::path::Path;

use pgvec_types::PgvecConfig;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "pgvec.toml";

/// Load configuration from `path`.
///
/// - Missing file: [`PgvecConfig::default()`].
/// - Unreadable or unparsable file: logs a warning and returns the default.
pub async fn load_config(path: &Path) -> PgvecConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config found at {}, using defaults", path.display());
            return PgvecConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return PgvecConfig::default();
        }
    };

    match toml::from_str::<PgvecConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            PgvecConfig::default()
        }
    }
}

/// Pick the database URL: explicit override, then the config file, then the
/// environment.
pub fn resolve_database_url(config: &PgvecConfig, cli_override: Option<&str>) -> String {
    cli_override
        .map(str::to_string)
        .or_else(|| config.database_url.clone())
        .unwrap_or_else(crate::postgres::pool::default_database_url)
}
