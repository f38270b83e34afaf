//! Analyze command implementation.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::sync::Arc;

use crate::cli::output::{OutputFormat, print_classification, print_topics};
use crate::models::Config;
use crate::services::vector_store::create_backend;
use crate::services::{AnalysisOrchestrator, GatewayClient};

#[derive(Debug, Subcommand)]
pub enum AnalyzeCommand {
    /// Extract the main topics of a transcript
    Topics(AnalyzeTarget),

    /// Classify a transcript into the fixed category set
    Classify(AnalyzeTarget),
}

/// What to analyze: an indexed transcript by business id, or raw text.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct AnalyzeTarget {
    #[arg(long, help = "Business id of an indexed transcript")]
    pub id: Option<String>,

    #[arg(long, help = "Raw transcript text to analyze")]
    pub text: Option<String>,
}

pub async fn handle_analyze(cmd: AnalyzeCommand, format: OutputFormat) -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let gateway = Arc::new(
        GatewayClient::from_config(&config.gateway).context("failed to build gateway")?,
    );
    let orchestrator = AnalysisOrchestrator::new(gateway);

    let target = match &cmd {
        AnalyzeCommand::Topics(target) | AnalyzeCommand::Classify(target) => target,
    };

    let Some(text) = resolve_text(target, &config).await? else {
        // Lookup miss is an outcome, not an error.
        println!(
            "Transcript not found: {}",
            target.id.as_deref().unwrap_or_default()
        );
        return Ok(());
    };

    match cmd {
        AnalyzeCommand::Topics(_) => {
            let topics = orchestrator.extract_topics(&text).await;
            print_topics(&topics, format);
        }
        AnalyzeCommand::Classify(_) => {
            let classification = orchestrator.classify(&text).await;
            print_classification(classification.as_ref(), format);
        }
    }

    Ok(())
}

async fn resolve_text(target: &AnalyzeTarget, config: &Config) -> Result<Option<String>> {
    if let Some(text) = &target.text {
        return Ok(Some(text.clone()));
    }

    let id = target.id.as_deref().unwrap_or_default();
    let store = create_backend(&config.vector_store)?;
    let stored = store
        .get_by_original_id(id)
        .await
        .context("transcript lookup failed")?;

    Ok(stored.map(|t| t.full_text))
}
