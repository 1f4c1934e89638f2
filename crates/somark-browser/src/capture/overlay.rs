//! Overlay drawn into the live page.

use async_trait::async_trait;
use somark_core::{AnalysisError, OverlayMark, OverlaySurface};

use crate::cdp::PageSession;

use super::script::invoke;

/// Draws marks as fixed-position boxes inside one group element of the page.
pub struct PageOverlay<'a> {
    session: &'a PageSession,
}

impl<'a> PageOverlay<'a> {
    pub fn new(session: &'a PageSession) -> Self {
        Self { session }
    }
}

fn overlay_error(e: impl std::fmt::Display) -> AnalysisError {
    AnalysisError::Overlay(e.to_string())
}

#[async_trait]
impl OverlaySurface for PageOverlay<'_> {
    async fn draw(&mut self, marks: &[OverlayMark]) -> Result<(), AnalysisError> {
        super::install_script(self.session).await.map_err(overlay_error)?;
        let payload = serde_json::to_string(marks)?;
        self.session
            .evaluate(&invoke("draw", &payload))
            .await
            .map_err(overlay_error)?;
        Ok(())
    }

    async fn clear(&mut self) -> Result<(), AnalysisError> {
        super::install_script(self.session).await.map_err(overlay_error)?;
        self.session
            .evaluate(&invoke("clear", ""))
            .await
            .map_err(overlay_error)?;
        Ok(())
    }
}
