//! Page lifecycle.

use std::sync::atomic::Ordering;

use tracing::debug;

use crate::cdp::PageSession;
use super::{BrowserError, BrowserManager};

impl BrowserManager {
    /// Open a blank tab with a `width`x`height` layout viewport.
    pub async fn open_page(&self, width: u32, height: u32) -> Result<PageSession, BrowserError> {
        let client = self.client().await?;
        let session = client.new_page().await?;
        self.open_pages.fetch_add(1, Ordering::SeqCst);

        if let Err(e) = session.set_viewport(width, height).await {
            let _ = self.close_page(&session).await;
            return Err(e.into());
        }
        debug!("Opened {} at {}x{}", session.target_id(), width, height);
        Ok(session)
    }

    /// Close a tab from [`open_page`](Self::open_page). The page counts as
    /// closed even when Chrome fails to confirm.
    pub async fn close_page(&self, session: &PageSession) -> Result<(), BrowserError> {
        self.open_pages.fetch_sub(1, Ordering::SeqCst);
        self.connected().await?.close_page(session).await?;
        debug!("Closed {}", session.target_id());
        Ok(())
    }

    /// Tabs opened and not closed yet.
    pub fn open_pages(&self) -> usize {
        self.open_pages.load(Ordering::SeqCst)
    }
}
