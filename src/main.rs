use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use mltx_core::{IndexReader, InMemoryIndex, MltConfig, MoreLikeThis, SearchOptions};

/// Find documents similar to a seed document in a JSON corpus
#[derive(Parser, Debug)]
#[command(name = "mltx")]
#[command(about = "More-like-this document retrieval", long_about = None)]
struct Args {
    /// Path to the corpus: a JSON array of objects with a string "id" field
    #[arg(short, long)]
    corpus: PathBuf,

    /// Logical id of the seed document
    #[arg(short, long)]
    id: String,

    /// Comma-separated content fields to compare on
    #[arg(short, long, default_value = "body")]
    fields: String,

    /// Maximum number of similar documents to return
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// Minimum in-document term frequency
    #[arg(long, default_value_t = 2)]
    min_term_freq: u32,

    /// Minimum corpus document frequency
    #[arg(long, default_value_t = 5)]
    min_doc_freq: u64,

    /// Maximum number of query terms
    #[arg(long, default_value_t = 25)]
    max_query_terms: usize,

    /// Weight query terms by their score relative to the best term
    #[arg(long)]
    boost: bool,

    /// Print the selected terms instead of searching
    #[arg(long)]
    explain: bool,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting mltx v{}", env!("CARGO_PKG_VERSION"));
    info!("Corpus: {:?}", args.corpus);

    let raw = std::fs::read_to_string(&args.corpus)
        .with_context(|| format!("reading corpus {:?}", args.corpus))?;
    let docs: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("corpus is not a JSON array")?;

    let index = InMemoryIndex::new();
    for doc in &docs {
        let id = doc
            .get("id")
            .and_then(|v| v.as_str())
            .context("corpus document without a string \"id\"")?;
        index.add_json(id, doc);
    }
    info!("Indexed {} documents", index.len());

    let field_names: Vec<String> = args
        .fields
        .split(',')
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .collect();
    let config = MltConfig {
        field_names,
        min_term_freq: args.min_term_freq,
        min_doc_freq: args.min_doc_freq,
        max_query_terms: args.max_query_terms,
        boost: args.boost,
        ..Default::default()
    };
    let mlt = MoreLikeThis::new(&index, config)?;

    if args.explain {
        let doc = index
            .resolve(&args.id)
            .with_context(|| format!("seed document not found: {}", args.id))?;
        let terms = mlt.interesting_terms(doc, None);
        info!("Selected {} terms for {}", terms.len(), args.id);
        println!("{:<24} {:<16} {:>10}", "term", "field", "score");
        for term in &terms {
            println!("{:<24} {:<16} {:>10.4}", term.word, term.field, term.score);
        }
        return Ok(());
    }

    let options = SearchOptions {
        limit: args.limit,
        min_score: None,
        scope: None,
    };
    let hits = mlt.find_similar(&args.id, None, &options)?;
    info!("Found {} similar documents for {}", hits.len(), args.id);

    println!("{:>4}  {:<32} {:>10}", "rank", "id", "score");
    for (rank, hit) in hits.iter().enumerate() {
        println!("{:>4}  {:<32} {:>10.4}", rank + 1, hit.id, hit.score);
    }

    Ok(())
}
