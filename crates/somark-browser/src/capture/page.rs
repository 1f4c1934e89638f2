//! Snapshot, hit resolution and metadata.

use serde::{Deserialize, Serialize};
use somark_core::{probe_points, DocumentSnapshot, NodeId, StaticDocument};
use tracing::debug;

use crate::cdp::PageSession;
use crate::manager::BrowserError;

use super::script::{invoke, CAPTURE_SCRIPT};

/// Document-level metadata written next to the annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    pub url: String,
    pub title: String,
    pub description: String,
    pub keywords: String,
}

/// Make sure the current document has the page script.
pub async fn install_script(session: &PageSession) -> Result<(), BrowserError> {
    session.evaluate(CAPTURE_SCRIPT).await?;
    Ok(())
}

/// URL, title and the `description` / `keywords` meta tags.
pub async fn page_meta(session: &PageSession) -> Result<PageMeta, BrowserError> {
    install_script(session).await?;
    let value = session.evaluate(&invoke("meta", "")).await?;
    Ok(serde_json::from_value(value)?)
}

/// Capture the page as it is rendered now.
///
/// Clears any overlay and strips render-irrelevant elements first.
pub async fn capture_document(session: &PageSession) -> Result<StaticDocument, BrowserError> {
    install_script(session).await?;

    let value = session.evaluate(&invoke("snapshot", "")).await?;
    let snapshot: DocumentSnapshot = serde_json::from_value(value)?;
    let mut doc = StaticDocument::new(snapshot)?;

    let points = probe_points(&doc)?;
    let encoded: Vec<[f64; 2]> = points.iter().map(|&(x, y)| [x, y]).collect();
    let value = session
        .evaluate(&invoke("resolve", &serde_json::to_string(&encoded)?))
        .await?;
    let hits: Vec<Option<usize>> = serde_json::from_value(value)?;
    if hits.len() != points.len() {
        return Err(BrowserError::CaptureFailed(format!(
            "resolved {} of {} points",
            hits.len(),
            points.len()
        )));
    }

    for ((x, y), hit) in points.into_iter().zip(hits) {
        doc.record_hit(x, y, hit.map(NodeId));
    }
    debug!(
        elements = doc.len(),
        hits = doc.recorded_hits(),
        "Captured document"
    );
    Ok(doc)
}
