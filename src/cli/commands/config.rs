//! Config command implementation.

use anyhow::Result;
use clap::Subcommand;

use crate::models::Config;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration
    Show,

    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub async fn handle_config(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let config = Config::load()?;
            if let Some(path) = Config::config_path() {
                println!("# {}", path.display());
            }
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
        ConfigCommand::Init { force } => {
            if let Some(path) = Config::config_path()
                && path.exists()
                && !force
            {
                anyhow::bail!(
                    "config file already exists at {} (use --force to overwrite)",
                    path.display()
                );
            }

            let config = Config::default();
            config.save()?;
            if let Some(path) = Config::config_path() {
                println!("Wrote default config to {}", path.display());
            }
            Ok(())
        }
    }
}
