use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use reddit_client::{Credentials, RedditClient};
use therapy_qa_common::{Config, ScrapeConfig, DEFAULT_TAXONOMY};
use therapy_qa_scout::driver::Collector;
use therapy_qa_scout::export::export_collection;
use therapy_qa_store::QaStore;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let scrape = ScrapeConfig::default();
    init_logging(&scrape.log_path)?;

    info!("Therapy QA collector starting...");

    if let Err(e) = run(scrape).await {
        error!("Fatal error in main execution: {e:#}");
        return Err(e);
    }
    Ok(())
}

/// Log to stdout and append to the log file, both filtered by `RUST_LOG`.
fn init_logging(log_path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::from_default_env()
        .add_directive("therapy_qa=info".parse()?)
        .add_directive("reddit_client=info".parse()?);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();

    Ok(())
}

async fn run(scrape: ScrapeConfig) -> Result<()> {
    let config = Config::from_env()?;

    let store = QaStore::connect(&config.database_url)
        .await
        .context("Postgres connection error")?;
    store.migrate().await.context("Failed to set up qa_records table")?;

    let reddit = RedditClient::connect(Credentials {
        client_id: config.reddit_client_id.clone(),
        client_secret: config.reddit_client_secret.clone(),
        user_agent: config.reddit_user_agent.clone(),
    })
    .await
    .context("Reddit API connection error")?;
    info!("Successfully connected to Reddit API");

    let export_path = scrape.export_path.clone();
    let collector = Collector::new(
        Arc::new(reddit),
        Arc::new(store.clone()),
        scrape,
        &DEFAULT_TAXONOMY,
    );

    let report = collector.run().await;
    info!("{report}");

    match export_collection(&store, &export_path).await {
        Ok(count) => info!(count, path = %export_path.display(), "Successfully exported data"),
        Err(e) => error!(error = %e, "Error exporting data"),
    }

    info!("Data collection completed successfully");
    Ok(())
}
