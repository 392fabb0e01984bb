//! Walks a document-record corpus and builds the on-disk inverted index.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use webdex::config::IndexConfig;
use webdex::index;

#[derive(Parser)]
#[command(
    name = "index",
    about = "Build an inverted index over a corpus of document records"
)]
struct Args {
    /// Root directory to walk for document-record files.
    #[arg(default_value = "raw/DEV")]
    root: PathBuf,

    /// Optional JSON file overriding index config defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to write the index artifacts into.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Enable debug-level logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = IndexConfig::load(args.config.as_deref())
        .with_context(|| "loading index config")?;

    let index_dir = args.out.join("index");
    let doc_ids_path = args.out.join("doc_ids.json");

    let records = webdex::walk::walk_records(&args.root);

    let summary = index::build_index(records, &index_dir, &doc_ids_path, &config)
        .with_context(|| format!("building index under {}", args.out.display()))?;

    println!(
        "Processed {} documents, admitted {} ({} rejected as near-duplicates).",
        summary.processed_docs, summary.admitted_docs, summary.duplicate_rejections
    );
    println!("Indexed {} unique terms.", summary.unique_terms);
    println!(
        "Wrote {} bytes of index artifacts to {}.",
        summary.artifact_sizes.total(),
        index_dir.display()
    );

    Ok(())
}
