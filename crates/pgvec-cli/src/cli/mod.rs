//! CLI command definitions for the `pgvec` binary.

pub mod encode;
pub mod index;
pub mod schema;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pgvec_types::DistanceMetric;

/// Inspect and manage pgvector columns and indexes.
#[derive(Parser)]
#[command(name = "pgvec", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = pgvec_infra::config::CONFIG_FILE_NAME)]
    pub config: PathBuf,

    /// PostgreSQL URL, overriding the config file and environment.
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a JSON array and print its vector literal.
    Encode {
        /// JSON array, e.g. '[1.5, 2, 3]'.
        input: String,

        /// Required number of dimensions.
        #[arg(long)]
        dim: Option<usize>,

        /// Print the binary wire format as hex instead of the text literal.
        #[arg(long)]
        binary: bool,
    },

    /// Create the `vector` extension if needed and report its version.
    Init,

    /// List the reflected columns of a table.
    Columns {
        /// Table name.
        table: String,
    },

    /// Create an index on a vector column.
    #[command(name = "create-index")]
    CreateIndex {
        /// Index name.
        name: String,

        /// Table to index.
        #[arg(long)]
        table: String,

        /// Column to index.
        #[arg(long)]
        column: String,

        /// Access method (ivfflat, hnsw).
        #[arg(long, default_value = "hnsw")]
        method: String,

        /// Distance metric the index serves (l2, ip, cosine, l1).
        #[arg(long, default_value = "l2")]
        metric: DistanceMetric,

        /// Explicit operator class, overriding --metric.
        #[arg(long)]
        opclass: Option<String>,

        /// Storage parameter as key=value (repeatable), e.g. lists=100.
        #[arg(long = "with", value_parser = index::parse_param)]
        params: Vec<(String, pgvec_core::IndexParam)>,

        /// Do nothing if the index already exists.
        #[arg(long)]
        if_not_exists: bool,
    },

    /// Drop an index.
    #[command(name = "drop-index")]
    DropIndex {
        /// Index name.
        name: String,

        /// Do nothing if the index does not exist.
        #[arg(long)]
        if_exists: bool,
    },
}
