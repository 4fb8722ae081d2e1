//! custos CLI - administrative maintenance for the hosted document
//! database and identity provider
//!
//! This CLI enables operators to:
//! - List and bulk-delete document collections in bounded batches
//! - Provision and deprovision privileged admin accounts

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod error;
mod interactive;
mod output;
mod progress;

use error::CliResult;

/// custos - hosted database and identity maintenance
#[derive(Parser)]
#[command(name = "custos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and purge document collections
    Collections(commands::collections::CollectionsArgs),

    /// Provision and deprovision admin accounts
    Admin(commands::admin::AdminArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            e.print();
            std::process::exit(e.exit_code());
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("CUSTOS_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> CliResult<()> {
    match cli.command {
        Commands::Collections(args) => commands::collections::execute(args).await,
        Commands::Admin(args) => commands::admin::execute(args).await,
    }
}
