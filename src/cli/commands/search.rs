//! Search command implementation.

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

use crate::cli::output::{OutputFormat, print_search};
use crate::models::{Config, SearchMode};
use crate::services::vector_store::create_backend;
use crate::services::{GatewayClient, SearchService};

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(required = true, help = "Search query text")]
    pub query: String,

    #[arg(
        long,
        short = 'm',
        default_value = "semantic",
        help = "Search mode: semantic or keyword"
    )]
    pub mode: SearchMode,

    #[arg(long, short = 'n', help = "Maximum number of results (1-20)")]
    pub top_n: Option<u64>,
}

pub async fn handle_search(args: SearchArgs, format: OutputFormat, verbose: bool) -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let top_n = args.top_n.unwrap_or(match args.mode {
        SearchMode::Semantic => config.search.semantic_top_n,
        SearchMode::Keyword => config.search.keyword_top_n,
    });

    if verbose {
        eprintln!("Query: \"{}\" ({} mode, top {})", args.query, args.mode, top_n);
    }

    let gateway = Arc::new(
        GatewayClient::from_config(&config.gateway).context("failed to build gateway")?,
    );
    let store: Arc<dyn crate::services::VectorStore> =
        Arc::from(create_backend(&config.vector_store)?);

    let service = SearchService::new(gateway, store);
    let response = service.search(&args.query, args.mode, top_n).await;

    print_search(&args.query, &response, format);
    Ok(())
}
