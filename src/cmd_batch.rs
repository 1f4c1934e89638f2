//! Batch subcommand handler.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use somark_browser::batch::{run_batch, BatchOptions};
use somark_browser::BrowserManager;
use somark_config::Config;

/// Mark every document of the configured window.
pub(crate) async fn handle_batch(
    config: &Config,
    urls_path: &Path,
    save_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = BatchOptions::from_config(config, urls_path, save_dir);
    let manager = Arc::new(BrowserManager::new((&config.browser).into()));

    let result = run_batch(manager.clone(), &options).await;
    if let Err(e) = manager.shutdown_chrome().await {
        warn!("Failed to shut down Chrome: {}", e);
    }
    let report = result?;

    for outcome in report.outcomes.iter().filter(|o| !o.succeeded()) {
        info!(
            "{} {:?}: {}",
            outcome.name,
            outcome.status,
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }
    println!("{}", report.summary());
    Ok(())
}
