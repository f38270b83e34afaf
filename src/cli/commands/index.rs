//! Index command implementation.

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::cli::output::{OutputFormat, print_index_summary};
use crate::models::Config;
use crate::services::vector_store::create_backend;
use crate::services::{
    BatchEmbedder, CollectionMode, GatewayClient, IndexSummary, IndexWriter, TranscriptPoint,
};
use crate::sources::load_processed_dir;
use crate::utils::cancel::CancelFlag;
use crate::utils::text::truncate_chars;

#[derive(Debug, Args)]
pub struct IndexArgs {
    #[arg(required = true, help = "Directory of processed transcript JSON files")]
    pub dir: PathBuf,

    #[arg(long, help = "Destroy and rebuild the collection before indexing")]
    pub recreate: bool,

    #[arg(long, short = 'y', help = "Skip the confirmation prompt for --recreate")]
    pub yes: bool,
}

pub async fn handle_index(args: IndexArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    config.validate()?;
    let start_time = Instant::now();

    let records = load_processed_dir(&args.dir).context("failed to load transcripts")?;
    if verbose {
        eprintln!("Loaded {} transcripts from {}", records.len(), args.dir.display());
    }

    let gateway = Arc::new(
        GatewayClient::from_config(&config.gateway).context("failed to build gateway")?,
    );
    if gateway.is_simulated() && verbose {
        eprintln!("Gateway in simulation mode; no real API calls will be made.");
    }

    let store: Arc<dyn crate::services::VectorStore> =
        Arc::from(create_backend(&config.vector_store)?);

    let mode = if args.recreate {
        if !args.yes && !confirm_recreate(&config.vector_store.collection)? {
            println!("Cancelled.");
            return Ok(());
        }
        CollectionMode::Recreate
    } else {
        CollectionMode::Update
    };

    let mut writer = IndexWriter::new(Arc::clone(&store), &config.indexing);
    writer
        .prepare_collection(u64::from(config.gateway.embedding_dimension), mode)
        .await
        .context("failed to prepare collection")?;

    // Ctrl-C requests a cooperative stop; the job finishes its in-flight
    // chunks and reports what landed.
    let cancel = CancelFlag::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nCancellation requested; finishing in-flight work...");
            signal_cancel.cancel();
        }
    });

    let embedder = BatchEmbedder::new(Arc::clone(&gateway), &config.indexing);
    let texts: Vec<String> = records.iter().map(|r| r.full_text.clone()).collect();

    let spinner = ProgressBar::new_spinner()
        .with_message(format!("Embedding {} transcripts...", texts.len()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(120));
    let outcomes = embedder.embed_all(&texts, &cancel).await;
    spinner.finish_and_clear();

    let progress = ProgressBar::new(records.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("#>-"),
    );

    let indexed_at = chrono::Utc::now().to_rfc3339();
    let max_stored = config.indexing.max_stored_chars as usize;
    let mut summary = IndexSummary::default();

    for (record, outcome) in records.into_iter().zip(outcomes) {
        progress.inc(1);
        match outcome.into_vector() {
            Some(vector) => {
                writer
                    .push(TranscriptPoint {
                        point_id: Uuid::new_v4().to_string(),
                        vector,
                        original_id: record.id,
                        full_text: truncate_chars(&record.full_text, max_stored).to_string(),
                        indexed_at: indexed_at.clone(),
                    })
                    .await;
                summary.indexed += 1;
            }
            None => summary.embedding_failures += 1,
        }
    }

    summary.upsert_failures = writer.finish().await;
    summary.indexed = summary.indexed.saturating_sub(summary.upsert_failures);
    summary.cancelled = cancel.is_cancelled();
    summary.duration_ms = start_time.elapsed().as_millis() as u64;
    progress.finish_and_clear();

    print_index_summary(&summary, &config.vector_store.collection, format);
    Ok(())
}

fn confirm_recreate(collection: &str) -> Result<bool> {
    println!(
        "Collection '{}' will be destroyed and rebuilt. ALL existing data will be lost. Continue? [y/N]",
        collection
    );
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
