//! Single-page subcommand handlers: mark, capture and analyze.

use std::path::Path;

use tracing::{info, warn};

use somark_browser::batch::{load_document, write_json_atomic, FIXED_VIEWPORT};
use somark_browser::cdp::ScreenshotFormat;
use somark_browser::{capture_document, BrowserError, BrowserManager, PageOverlay, PageSession};
use somark_config::Config;
use somark_core::{AnalysisError, Annotation, LabelMode, Marker, MemoryOverlay, StaticDocument};

/// Open a page on `url`, run `f` on it and clean up whatever happens.
async fn with_page<T, F, Fut>(config: &Config, url: &str, f: F) -> Result<T, Box<dyn std::error::Error>>
where
    F: FnOnce(PageSession) -> Fut,
    Fut: std::future::Future<Output = (PageSession, Result<T, BrowserError>)>,
{
    let manager = BrowserManager::new((&config.browser).into());
    let (width, height) = FIXED_VIEWPORT;

    let result = async {
        let session = manager.open_page(width, height).await?;
        let loaded = load_document(
            &session,
            url,
            std::time::Duration::from_millis(config.batch.settle_ms),
        )
        .await;
        let (session, result) = match loaded {
            Ok(()) => f(session).await,
            Err(e) => (session, Err(e)),
        };
        if let Err(e) = manager.close_page(&session).await {
            warn!("Failed to close page: {}", e);
        }
        result
    }
    .await;

    if let Err(e) = manager.shutdown_chrome().await {
        warn!("Failed to shut down Chrome: {}", e);
    }
    Ok(result?)
}

/// Mark a live page and print the annotation records.
pub(crate) async fn handle_mark(
    config: &Config,
    url: &str,
    screenshot: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let depth = config.marking.depth;
    let annotations = with_page(config, url, |session| async move {
        let result = mark_live(&session, depth, screenshot).await;
        (session, result)
    })
    .await?;

    info!("Marked {} element(s) on {}", annotations.len(), url);
    println!("{}", serde_json::to_string_pretty(&annotations)?);
    Ok(())
}

async fn mark_live(
    session: &PageSession,
    depth: i64,
    screenshot: Option<&Path>,
) -> Result<Vec<Annotation>, BrowserError> {
    let doc = capture_document(session).await?;
    let mut marker = Marker::new();
    marker.aggregate(&doc)?;

    let mut overlay = PageOverlay::new(session);
    let annotations = marker.mark(&mut overlay, depth, LabelMode::IndexAndTypes).await;
    let saved = match (&annotations, screenshot) {
        (Ok(_), Some(path)) => match session.screenshot(ScreenshotFormat::Png).await {
            Ok(png) => tokio::fs::write(path, png).await.map_err(BrowserError::from),
            Err(e) => Err(e.into()),
        },
        _ => Ok(()),
    };
    if let Err(e) = marker.unmark(&mut overlay).await {
        warn!("Failed to clear overlay: {}", e);
    }
    saved?;
    Ok(annotations?)
}

/// Save the snapshot of a live page, recorded hit tests included.
pub(crate) async fn handle_capture(
    config: &Config,
    url: &str,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = with_page(config, url, |session| async move {
        let result = capture_document(&session).await;
        (session, result)
    })
    .await?;

    write_json_atomic(output, doc.snapshot())?;
    info!(
        "Saved {} element(s) and {} hit test(s) to {}",
        doc.len(),
        doc.recorded_hits(),
        output.display()
    );
    Ok(())
}

/// Run the analysis on a snapshot file and print the annotation records.
pub(crate) async fn handle_analyze(config: &Config, snapshot: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = tokio::fs::read_to_string(snapshot).await?;
    let annotations = analyze_snapshot(&json, config.marking.depth).await?;
    info!("{} element(s) selected from {}", annotations.len(), snapshot.display());
    println!("{}", serde_json::to_string_pretty(&annotations)?);
    Ok(())
}

pub(crate) async fn analyze_snapshot(json: &str, depth: i64) -> Result<Vec<Annotation>, AnalysisError> {
    let doc = StaticDocument::from_json(json)?;
    let mut marker = Marker::new();
    marker.aggregate(&doc)?;
    marker.mark(&mut MemoryOverlay::new(), depth, LabelMode::IndexAndTypes).await
}
