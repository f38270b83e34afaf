use anyhow::Result;
use clap::Parser;

use callscope::cli::commands::{
    handle_analyze, handle_config, handle_index, handle_search, handle_status,
};
use callscope::cli::output::OutputFormat;
use callscope::cli::{Cli, Commands};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "callscope=debug"
    } else {
        "callscope=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = cli.format.unwrap_or(OutputFormat::Text);

    match cli.command {
        Commands::Status => handle_status(format).await,
        Commands::Index(args) => handle_index(args, format, cli.verbose).await,
        Commands::Search(args) => handle_search(args, format, cli.verbose).await,
        Commands::Analyze(cmd) => handle_analyze(cmd, format).await,
        Commands::Config(cmd) => handle_config(cmd).await,
    }
}
