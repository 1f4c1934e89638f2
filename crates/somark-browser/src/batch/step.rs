//! Loading one document and taking its captures.

use std::path::Path;
use std::time::Duration;

use somark_core::{Annotation, LabelMode, Marker};
use tracing::{debug, info, warn};
use url::Url;

use crate::capture::{capture_document, page_meta, PageOverlay};
use crate::cdp::{PageSession, ScreenshotFormat};
use crate::manager::BrowserError;
use crate::scroll::scroll_plan;

use super::output::{write_json_atomic, DocumentRecord, SaveDirs};

/// Timing and depth knobs shared by every document of a batch.
#[derive(Debug, Clone)]
pub struct DocumentSettings {
    /// Depth passed to mark selection.
    pub depth: i64,
    /// Wait after the load event.
    pub settle: Duration,
    /// Wait after each scroll.
    pub scroll_settle: Duration,
    /// Upper bound on one document, load included.
    pub timeout: Duration,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            depth: 99,
            settle: Duration::from_millis(2000),
            scroll_settle: Duration::from_millis(1500),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Only network schemes are expected to report a main document response.
fn expects_response(url: &str) -> bool {
    Url::parse(url)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(true)
}

/// Navigate to `url`, require a 2xx document response and let the page settle.
pub async fn load_document(session: &PageSession, url: &str, settle: Duration) -> Result<(), BrowserError> {
    let navigation = session.navigate(url).await?;
    match navigation.status() {
        Some(status) if (200..300).contains(&status) => {}
        Some(status) => {
            return Err(BrowserError::HttpStatus {
                status,
                url: url.to_string(),
            });
        }
        None if expects_response(url) => return Err(BrowserError::NoResponse(url.to_string())),
        None => {}
    }
    tokio::time::sleep(settle).await;
    Ok(())
}

async fn save_screenshot(session: &PageSession, path: &Path) -> Result<(), BrowserError> {
    let png = session.screenshot(ScreenshotFormat::Png).await?;
    tokio::fs::write(path, png).await?;
    Ok(())
}

async fn shoot_variants(
    session: &PageSession,
    marker: &Marker,
    overlay: &mut PageOverlay<'_>,
    dirs: &SaveDirs,
    name: &str,
    depth: i64,
) -> Result<Vec<Annotation>, BrowserError> {
    let elements = marker.mark(overlay, depth, LabelMode::IndexAndTypes).await?;
    if elements.is_empty() {
        return Err(BrowserError::CaptureFailed(format!("{}: nothing to mark", name)));
    }
    save_screenshot(session, &dirs.marked(name)).await?;

    marker.mark(overlay, depth, LabelMode::IndexOnly).await?;
    save_screenshot(session, &dirs.som(name)).await?;

    marker.unmark(overlay).await?;
    save_screenshot(session, &dirs.raw(name)).await?;
    Ok(elements)
}

/// Capture the page as currently scrolled under `name`.
///
/// Writes the three screenshots, then the annotation record. Returns the
/// number of marked elements. The overlay is gone when this returns, whatever
/// the outcome, and a failed capture leaves no screenshots behind.
pub async fn capture_step(
    session: &PageSession,
    dirs: &SaveDirs,
    name: &str,
    viewport: (u32, u32),
    depth: i64,
) -> Result<usize, BrowserError> {
    let result = write_capture(session, dirs, name, viewport, depth).await;
    if result.is_err() {
        if let Err(e) = dirs.discard_images(name) {
            warn!("Failed to remove screenshots of {}: {}", name, e);
        }
    }
    result
}

async fn write_capture(
    session: &PageSession,
    dirs: &SaveDirs,
    name: &str,
    viewport: (u32, u32),
    depth: i64,
) -> Result<usize, BrowserError> {
    let meta = page_meta(session).await?;
    let doc = capture_document(session).await?;
    let mut marker = Marker::new();
    marker.aggregate(&doc)?;

    let mut overlay = PageOverlay::new(session);
    let shot = shoot_variants(session, &marker, &mut overlay, dirs, name, depth).await;
    if let Err(e) = marker.unmark(&mut overlay).await {
        warn!("Failed to clear overlay of {}: {}", name, e);
    }
    let elements = shot?;

    let count = elements.len();
    let record = DocumentRecord::new(meta, name, viewport, elements);
    write_json_atomic(&dirs.anno(name), &record)?;
    debug!("Saved {} with {} marks", name, count);
    Ok(count)
}

/// Take every capture the document's height calls for.
///
/// Succeeds when at least one capture succeeded and returns how many did.
pub async fn mark_document(
    session: &PageSession,
    dirs: &SaveDirs,
    name: &str,
    viewport: (u32, u32),
    settings: &DocumentSettings,
) -> Result<usize, BrowserError> {
    let full_height = session.scroll_height().await?;
    let plan = scroll_plan(full_height, f64::from(viewport.1));
    debug!("{} is {}px tall, {} capture(s)", name, full_height, plan.len());

    let mut captured = 0;
    let mut last_error = None;
    for capture in &plan {
        if let Some(y) = capture.scroll_to {
            session.scroll_to(y).await?;
            tokio::time::sleep(settings.scroll_settle).await;
        }
        let capture_name = capture.name(name);
        match capture_step(session, dirs, &capture_name, viewport, settings.depth).await {
            Ok(_) => captured += 1,
            Err(e) => {
                warn!("Capture {} failed: {}", capture_name, e);
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) if captured == 0 => Err(e),
        _ => {
            info!("Marked {} ({}/{} captures)", name, captured, plan.len());
            Ok(captured)
        }
    }
}
