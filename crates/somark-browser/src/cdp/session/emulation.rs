//! Viewport, scrolling and screenshots for CDP page session.

use base64::Engine;
use serde_json::json;
use tracing::debug;

use crate::cdp::error::CdpError;
use crate::cdp::protocol::{DeviceMetrics, ScreenshotFormat};

use super::core::PageSession;

impl PageSession {
    /// Resize the page's layout viewport.
    pub async fn set_viewport(&self, width: u32, height: u32) -> Result<(), CdpError> {
        let params = serde_json::to_value(DeviceMetrics::desktop(width, height))?;
        self.call("Emulation.setDeviceMetricsOverride", Some(params)).await?;
        debug!("Viewport of {} set to {}x{}", self.target_id, width, height);
        Ok(())
    }

    /// `document.documentElement.scrollHeight`.
    pub async fn scroll_height(&self) -> Result<f64, CdpError> {
        let value = self.evaluate("document.documentElement.scrollHeight").await?;
        value
            .as_f64()
            .ok_or_else(|| CdpError::Unexpected(format!("scrollHeight is {}", value)))
    }

    /// Scroll the window to vertical offset `y`.
    pub async fn scroll_to(&self, y: f64) -> Result<(), CdpError> {
        self.evaluate(&format!("window.scrollTo(0, {})", y)).await?;
        Ok(())
    }

    /// Capture the visible viewport.
    pub async fn screenshot(&self, format: ScreenshotFormat) -> Result<Vec<u8>, CdpError> {
        let result = self
            .call(
                "Page.captureScreenshot",
                Some(json!({
                    "format": format,
                    "captureBeyondViewport": false,
                })),
            )
            .await?;

        let data = result["data"]
            .as_str()
            .ok_or_else(|| CdpError::Unexpected("Missing screenshot data".to_string()))?;
        Ok(base64::engine::general_purpose::STANDARD.decode(data)?)
    }
}
