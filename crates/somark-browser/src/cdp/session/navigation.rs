//! Loading a URL into the tab.

use std::time::Duration;

use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{CdpMessage, NetworkResponse, ResponseReceived};

use super::core::PageSession;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// A navigation that reached the load event.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub frame_id: String,
    /// Main document response. Schemes without a network request have none.
    pub response: Option<NetworkResponse>,
}

impl Navigation {
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

/// Last `Document` response for `frame_id` among `events`. Redirects
/// produce several; the final one is the page that loaded.
pub(super) fn document_response(events: &[CdpMessage], frame_id: &str) -> Option<NetworkResponse> {
    events
        .iter()
        .filter(|event| event.is_event("Network.responseReceived"))
        .filter_map(|event| event.params.clone())
        .filter_map(|params| serde_json::from_value::<ResponseReceived>(params).ok())
        .filter(|event| event.resource_type == "Document")
        .filter(|event| event.frame_id.as_deref().is_none_or(|id| id == frame_id))
        .map(|event| event.response)
        .last()
}

impl PageSession {
    /// Navigate and wait for `Page.loadEventFired`.
    pub async fn navigate(&self, url: &str) -> Result<Navigation, CdpError> {
        let mut events = self.events.lock().await;
        // Leftovers belong to the previous document.
        while events.try_recv().is_ok() {}

        let result = self.call("Page.navigate", Some(json!({"url": url}))).await?;
        if let Some(reason) = result.get("errorText").and_then(|e| e.as_str()) {
            return Err(CdpError::Navigation {
                url: url.to_string(),
                reason: reason.to_string(),
            });
        }
        let frame_id = result["frameId"].as_str().unwrap_or_default().to_string();

        let mut seen = Vec::new();
        let wait_for_load = async {
            while let Some(event) = events.recv().await {
                let loaded = event.is_event("Page.loadEventFired");
                seen.push(event);
                if loaded {
                    return Ok(());
                }
            }
            Err(CdpError::Closed)
        };
        tokio::time::timeout(LOAD_TIMEOUT, wait_for_load)
            .await
            .map_err(|_| CdpError::Timeout(format!("load event of {}", url)))??;

        let response = document_response(&seen, &frame_id);
        debug!(
            "Loaded {} ({})",
            url,
            response.as_ref().map_or("no response".to_string(), |r| r.status.to_string())
        );
        Ok(Navigation { frame_id, response })
    }
}
