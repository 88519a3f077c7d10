use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use claimstore::ClaimStore;
use claimstore::cli::{Cli, Command};
use claimstore::config::Config;

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!("claimstore starting");

    match cli.command {
        Command::Put { id, file } => {
            let store = ClaimStore::open(&config.db_path)?;
            let content = std::fs::read_to_string(&file)
                .context(format!("Failed to read {}", file.display()))?;
            let doc: serde_json::Value = serde_json::from_str(&content).context("Invalid JSON document")?;
            store.put(&id, &doc)?;
            println!("{} Stored claim: {}", "✓".green(), id.cyan());
        }
        Command::Get { id } => {
            let store = ClaimStore::open(&config.db_path)?;
            match store.get(&id)? {
                Some(doc) => println!("{}", serde_json::to_string_pretty(&doc)?),
                None => println!("Claim not found: {}", id.yellow()),
            }
        }
        Command::List => {
            let store = ClaimStore::open(&config.db_path)?;
            let summaries = store.list()?;
            if summaries.is_empty() {
                println!("No claims found");
            } else {
                for s in summaries {
                    println!(
                        "{}  {}  {}  {}",
                        s.id.cyan(),
                        s.status.yellow(),
                        s.updated_at.dimmed(),
                        s.title
                    );
                }
            }
        }
        Command::Delete { id } => {
            let store = ClaimStore::open(&config.db_path)?;
            store.delete(&id)?;
            println!("{} Deleted claim: {}", "✓".green(), id);
        }
    }

    Ok(())
}
