//! Worker pool handler for one document.

use std::sync::Arc;

use async_trait::async_trait;
use somark_workqueue::{QueueError, Task, TaskHandler};
use tracing::{info, warn};

use crate::cdp::PageSession;
use crate::manager::{BrowserError, BrowserManager};

use super::output::SaveDirs;
use super::step::{load_document, mark_document, DocumentSettings};

/// Payload of a document task. The task name is the document name.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentJob {
    pub url: String,
    pub viewport: (u32, u32),
}

/// Opens a page per document, marks it and always closes the page again.
pub struct DocumentHandler {
    manager: Arc<BrowserManager>,
    dirs: SaveDirs,
    settings: DocumentSettings,
}

impl DocumentHandler {
    pub fn new(manager: Arc<BrowserManager>, dirs: SaveDirs, settings: DocumentSettings) -> Self {
        Self {
            manager,
            dirs,
            settings,
        }
    }

    async fn process(&self, name: &str, job: &DocumentJob) -> Result<usize, BrowserError> {
        let (width, height) = job.viewport;
        let session = self.manager.open_page(width, height).await?;

        let result = tokio::time::timeout(self.settings.timeout, self.run(&session, name, job))
            .await
            .unwrap_or_else(|_| {
                // A capture cut short may have written screenshots already.
                if let Err(e) = self.dirs.discard_unrecorded(name) {
                    warn!("Failed to remove screenshots of {}: {}", name, e);
                }
                Err(BrowserError::Timeout(format!(
                    "{} after {}s",
                    job.url,
                    self.settings.timeout.as_secs()
                )))
            });

        if let Err(e) = self.manager.close_page(&session).await {
            warn!("Failed to close page for {}: {}", name, e);
        }
        result
    }

    async fn run(&self, session: &PageSession, name: &str, job: &DocumentJob) -> Result<usize, BrowserError> {
        load_document(session, &job.url, self.settings.settle).await?;
        mark_document(session, &self.dirs, name, job.viewport, &self.settings).await
    }
}

#[async_trait]
impl TaskHandler<DocumentJob> for DocumentHandler {
    async fn handle(&self, task: &Task<DocumentJob>) -> Result<(), QueueError> {
        let job = &task.payload;
        if self.dirs.is_completed(&task.name) {
            info!("Skipping {}: already annotated", task.name);
            return Ok(());
        }

        info!("Marking {} ({}) at {}x{}", task.name, job.url, job.viewport.0, job.viewport.1);
        self.process(&task.name, job).await.map(|_| ()).map_err(|e| {
            warn!("Document {} ({}) failed: {}", task.name, job.url, e);
            QueueError::ExecutionFailed(e.to_string())
        })
    }
}
