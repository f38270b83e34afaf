//! CLI module for the transcript analysis CLI.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

use output::OutputFormat;

/// Call-transcript retrieval and analysis over an LLM gateway and a
/// vector store.
#[derive(Debug, Parser)]
#[command(name = "callscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(
        long,
        short = 'f',
        global = true,
        help = "Output format: text or json"
    )]
    pub format: Option<OutputFormat>,

    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check gateway mode and vector store health
    Status,

    /// Embed and index processed transcripts into the vector store
    Index(commands::IndexArgs),

    /// Search indexed transcripts (semantic or keyword)
    Search(commands::SearchArgs),

    /// Analyze a transcript with the language model
    #[command(subcommand)]
    Analyze(commands::AnalyzeCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::ConfigCommand),
}
