//! oxide-route CLI
//!
//! Resolves requests against a JSON route table without serving them.

mod table;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_route::Method;

use crate::table::RouteTable;

/// Inspect how a route table resolves requests.
#[derive(Parser)]
#[command(name = "oxide-route")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Route table (JSON file).
    #[arg(short, long, env = "OXIDE_ROUTE_TABLE")]
    table: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve requests and print the responses.
    Resolve {
        /// HTTP method.
        method: String,

        /// Request targets, with optional query string.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// List the compiled routes.
    Routes,

    /// Generate the path of a named route.
    Url {
        /// Route name.
        name: String,

        /// Parameter values as KEY=VALUE.
        params: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let table = RouteTable::load(&cli.table)?;
    let (mux, registry) = table.build()?;
    info!(
        "Loaded {} routes from {}",
        table.routes.len(),
        cli.table.display()
    );

    match cli.command {
        Commands::Resolve { method, paths } => {
            let method: Method = method.parse()?;
            for path in &paths {
                print!("{}", table::resolve(&mux, &method, path));
            }
        }

        Commands::Routes => {
            print!("{}", table::list_routes(&mux));
        }

        Commands::Url { name, params } => {
            let params = table::parse_params(&params)?;
            println!("{}", registry.url_for(&name, &params)?);
        }
    }

    Ok(())
}
