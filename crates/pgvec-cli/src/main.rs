//! pgvec command-line entry point.
//!
//! Binary name: `pgvec`
//!
//! Parses arguments, sets up tracing, then dispatches to a command handler.
//! `encode` works offline; every other command connects to PostgreSQL.

mod cli;
mod state;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::index::CreateIndexArgs;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,pgvec_core=debug,pgvec_infra=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Encoding needs no connection
    if let Commands::Encode { input, dim, binary } = &cli.command {
        return cli::encode::encode(input, *dim, *binary, cli.json);
    }

    let state = AppState::init(&cli.config, cli.database_url.as_deref()).await?;
    tracing::debug!(
        "Using pool of up to {} connection(s)",
        state.config.max_connections
    );

    match cli.command {
        Commands::Encode { .. } => unreachable!("handled above"),

        Commands::Init => {
            cli::schema::init(&state, cli.json).await?;
        }

        Commands::Columns { table } => {
            cli::schema::columns(&state, &table, cli.json).await?;
        }

        Commands::CreateIndex {
            name,
            table,
            column,
            method,
            metric,
            opclass,
            params,
            if_not_exists,
        } => {
            let args = CreateIndexArgs {
                name,
                table,
                column,
                method,
                metric,
                opclass,
                params,
                if_not_exists,
            };
            cli::index::create_index(&state, args, cli.json).await?;
        }

        Commands::DropIndex { name, if_exists } => {
            cli::index::drop_index(&state, &name, if_exists, cli.json).await?;
        }
    }

    state.pool().close().await;
    Ok(())
}
