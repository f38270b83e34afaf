//! Status command implementation.

use anyhow::Result;
use console::style;
use serde::Serialize;

use crate::cli::output::OutputFormat;
use crate::models::Config;
use crate::services::vector_store::create_backend;

#[derive(Debug, Serialize)]
struct StatusReport {
    gateway_mode: &'static str,
    chat_model: String,
    embedding_model: String,
    embedding_dimension: u32,
    store_url: String,
    collection: String,
    store_healthy: bool,
    points_count: Option<u64>,
}

pub async fn handle_status(format: OutputFormat) -> Result<()> {
    let config = Config::load()?;

    let store = create_backend(&config.vector_store)?;
    let store_healthy = store.health_check().await.unwrap_or(false);
    let points_count = if store_healthy {
        store
            .get_collection_info()
            .await
            .ok()
            .flatten()
            .map(|info| info.points_count)
    } else {
        None
    };

    let report = StatusReport {
        gateway_mode: if config.gateway.enable_real_calls {
            "live"
        } else {
            "simulated"
        },
        chat_model: config.gateway.chat_model.clone(),
        embedding_model: config.gateway.embedding_model.clone(),
        embedding_dimension: config.gateway.embedding_dimension,
        store_url: config.vector_store.url.clone(),
        collection: config.vector_store.collection.clone(),
        store_healthy,
        points_count,
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("Gateway:");
            println!("  Mode:            {}", report.gateway_mode);
            println!("  Chat model:      {}", report.chat_model);
            println!(
                "  Embedding model: {} (dim {})",
                report.embedding_model, report.embedding_dimension
            );
            println!("Vector store:");
            println!("  URL:             {}", report.store_url);
            println!("  Collection:      {}", report.collection);
            if report.store_healthy {
                println!("  Health:          {}", style("ok").green());
                match report.points_count {
                    Some(count) => println!("  Points:          {}", count),
                    None => println!("  Points:          collection not created yet"),
                }
            } else {
                println!("  Health:          {}", style("unreachable").red());
            }
        }
    }

    Ok(())
}
