//! Interactive read-eval-print loop over a built index: each line is a query, `/quit` exits,
//! results print as `rank. url (score=…)` with an elapsed-time line.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Level;
use webdex::config::QueryConfig;
use webdex::query::QueryEvaluator;

#[derive(Parser)]
#[command(name = "search", about = "Interactively query a built index")]
struct Args {
    /// Directory holding doc_ids.json and the index/ subdirectory.
    #[arg(default_value = ".")]
    index_dir: PathBuf,

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

    let config = QueryConfig::default();
    let doc_ids_path = args.index_dir.join("doc_ids.json");
    let index_dir = args.index_dir.join("index");

    let evaluator = QueryEvaluator::open(&index_dir, &doc_ids_path, config.clone())
        .with_context(|| format!("opening index at {}", args.index_dir.display()))?;

    println!("Boolean query search engine.");
    println!("Supports 'AND', 'OR', 'NOT', and exact phrases in double quotes.");
    println!("Type a query, or '/quit' to exit.\n");

    let stdin = io::stdin();
    loop {
        print!("Search > ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();

        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("/quit") {
            break;
        }

        let start = Instant::now();
        let results = evaluator.eval_boolean(query, config.top_k)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        for (rank, (url, score)) in results.iter().enumerate() {
            println!("{}. {} (score={:.4})", rank + 1, url, score);
        }
        println!(
            "\nQuery returned {} results in {:.2} ms.\n",
            results.len(),
            elapsed_ms
        );
    }

    Ok(())
}
