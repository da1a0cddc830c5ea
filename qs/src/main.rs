//! qs: Query String - CLI for parsing and resolving REST query strings.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "qs")]
#[command(about = "Query String - parse REST query strings against an edge schema")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config and sample schema under EDGEQ_ROOT
    Init {
        /// Overwrite existing files
        #[arg(short = 'f', long)]
        force: bool,
    },

    /// Parse a query string against one edge
    #[command(visible_alias = "p")]
    Parse {
        /// Edge name (e.g., users)
        edge: String,

        /// Query string, with or without the leading '?'
        query: String,

        /// API version (default: first API in the schema)
        #[arg(short = 'V', long = "api-version")]
        version: Option<String>,

        /// Output format: json or text
        #[arg(short = 'o', long = "format", default_value = "json")]
        format: String,
    },

    /// Resolve a full request: method, path and query string
    #[command(visible_alias = "r")]
    Route {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,

        /// Request target, e.g. "/v1/users?sort=-age"
        target: String,

        /// Output format: json or text
        #[arg(short = 'o', long = "format", default_value = "json")]
        format: String,
    },

    /// List edges with their fields and relations
    Edges {
        /// Only show this API version
        #[arg(short = 'V', long = "api-version")]
        version: Option<String>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("EDGEQ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { force } => commands::init(force),
        Commands::Parse { edge, query, version, format } => {
            commands::parse(&edge, &query, version.as_deref(), &format)
        }
        Commands::Route { method, target, format } => commands::route(&method, &target, &format),
        Commands::Edges { version } => commands::edges(version.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {} {}", e.status(), e);
        std::process::exit(1);
    }
}
