//! Collection maintenance commands

use clap::{Args, Subcommand};

use custos_ops::CollectionPurger;
use custos_store::DocumentStore;

use crate::error::CliResult;
use crate::interactive::{confirm, is_interactive_terminal};
use crate::output::{print_info, print_success, truncate};
use crate::progress::PurgeProgress;

/// Collection maintenance commands
#[derive(Args, Debug)]
pub struct CollectionsArgs {
    #[command(subcommand)]
    pub command: CollectionsCommands,
}

#[derive(Subcommand, Debug)]
pub enum CollectionsCommands {
    /// List the documents in a collection
    List(ListArgs),
    /// Delete every document in a collection, in atomic batches of 500
    Purge(PurgeArgs),
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Collection name
    pub collection: String,

    /// Show at most this many documents
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the purge command
#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Collection name
    pub collection: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute collection commands
pub async fn execute(args: CollectionsArgs) -> CliResult<()> {
    match args.command {
        CollectionsCommands::List(a) => execute_list(a).await,
        CollectionsCommands::Purge(a) => execute_purge(a).await,
    }
}

async fn execute_list(args: ListArgs) -> CliResult<()> {
    let store = super::store_from_defaults()?;

    let documents = store.list_all(&args.collection).await?;
    let total = documents.len();
    let documents = apply_limit(documents, args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&documents)?);
        return Ok(());
    }

    if total == 0 {
        println!("Collection '{}' is empty.", args.collection);
        return Ok(());
    }

    println!("Found {} documents in '{}':\n", total, args.collection);
    for (index, doc) in documents.iter().enumerate() {
        let label = doc.get_str("name").unwrap_or("<unnamed>");
        println!("{}. {} (ID: {})", index + 1, truncate(label, 48), doc.id);
    }
    if documents.len() < total {
        println!("\nShowing {} of {} documents", documents.len(), total);
    }

    Ok(())
}

/// Cap the listing at `limit` documents, keeping enumeration order.
fn apply_limit(
    mut documents: Vec<custos_store::Document>,
    limit: Option<usize>,
) -> Vec<custos_store::Document> {
    if let Some(limit) = limit {
        documents.truncate(limit);
    }
    documents
}

async fn execute_purge(args: PurgeArgs) -> CliResult<()> {
    if !args.force && is_interactive_terminal() {
        let proceed = confirm(&format!(
            "Delete ALL documents in collection '{}'? This cannot be undone",
            args.collection
        ))?;
        if !proceed {
            print_info("Purge cancelled.");
            return Ok(());
        }
    }

    let store = super::store_from_defaults()?;
    let purger = CollectionPurger::new(&store);

    let progress = PurgeProgress::new(&format!("Purging '{}'", args.collection));
    let report = purger
        .purge_with_progress(&args.collection, |index, total| {
            progress.batch_committed(index, total);
        })
        .await;
    progress.finish_and_clear();
    let report = report?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.deleted == 0 {
        print_info(&format!("Collection '{}' was already empty.", args.collection));
    } else {
        print_success(&format!(
            "Deleted {} documents from '{}' in {} batches.",
            report.deleted, report.collection, report.batches
        ));
    }

    Ok(())
}
