use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};

use pricewatch::domain::check::{FixedDelayPacer, PriceCheckEngine};
use pricewatch::infrastructure::catalog::RetailCatalogClient;
use pricewatch::infrastructure::mail::HttpMailClient;
use pricewatch::infrastructure::store::JsonFileStore;
use pricewatch::shared::config::Config;
use pricewatch::WatchBatch;

#[derive(Parser, Debug)]
#[command(version, about = "Purchase price-drop watcher")]
struct Args {
    /// Path to config file
    #[arg(long, default_value = "Config.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// On-demand price check for one user; prints the report as JSON
    Check {
        /// User id to check
        #[arg(long)]
        user_id: String,
    },
    /// Check every qualifying user and email detected drops (cron target)
    Batch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let config = Config::from_file(&args.config)?;

    let store = Arc::new(JsonFileStore::load(&config.watch.store_path)?);
    let catalog = Arc::new(RetailCatalogClient::new(&config.catalog)?);
    let pacer = Arc::new(FixedDelayPacer::from_millis(config.watch.pace_ms));
    let engine = PriceCheckEngine::new(catalog, store.clone(), pacer);

    match args.command {
        Command::Check { user_id } => {
            let report = engine.run_for_user(&user_id, Utc::now()).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Batch => {
            let mail = Arc::new(HttpMailClient::new(&config.mail)?);
            let batch = WatchBatch::new(
                engine,
                store.clone(),
                store,
                mail,
                config.mail.from.clone(),
            );
            batch.run(Utc::now()).await;
        }
    }

    Ok(())
}
