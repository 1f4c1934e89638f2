//! Batch entry point.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use somark_config::Config;
use somark_workqueue::{BatchReport, PoolConfig, Task, WorkerPool};
use tracing::info;

use crate::manager::{BrowserError, BrowserManager};

use super::handler::{DocumentHandler, DocumentJob};
use super::inputs::{document_name, read_url_list, select_window, urls_from_dir};
use super::output::SaveDirs;
use super::step::DocumentSettings;
use super::viewport::viewport_for;

/// Everything a batch run needs besides the browser.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Newline-delimited URL list, or a directory of `*.html` files.
    pub urls_path: PathBuf,
    pub save_dir: PathBuf,
    pub concurrency: usize,
    pub start: usize,
    /// `-1` for every URL from `start` on.
    pub total: i64,
    pub fixed_viewport: bool,
    pub settings: DocumentSettings,
}

impl BatchOptions {
    pub fn from_config(config: &Config, urls_path: impl Into<PathBuf>, save_dir: impl Into<PathBuf>) -> Self {
        let batch = &config.batch;
        Self {
            urls_path: urls_path.into(),
            save_dir: save_dir.into(),
            concurrency: batch.concurrency,
            start: batch.start,
            total: batch.total,
            fixed_viewport: batch.fixed_viewport,
            settings: DocumentSettings {
                depth: config.marking.depth,
                settle: Duration::from_millis(batch.settle_ms),
                scroll_settle: Duration::from_millis(batch.scroll_settle_ms),
                timeout: Duration::from_secs(batch.document_timeout_secs),
            },
        }
    }

    fn urls(&self) -> Result<Vec<String>, BrowserError> {
        if self.urls_path.is_dir() {
            urls_from_dir(&self.urls_path)
        } else {
            read_url_list(&self.urls_path)
        }
    }

    /// One task per document of the window, named after its absolute index.
    pub fn tasks(&self) -> Result<Vec<Task<DocumentJob>>, BrowserError> {
        let urls = self.urls()?;
        Ok(select_window(&urls, self.start, self.total)
            .into_iter()
            .map(|(index, url)| {
                let job = DocumentJob {
                    url,
                    viewport: viewport_for(index, self.fixed_viewport),
                };
                Task::new(index, document_name(index), job)
            })
            .collect())
    }
}

/// Mark every document of the window with up to `concurrency` pages at once.
///
/// Individual document failures end up in the report; only setup problems
/// (unreadable list, output directories, pool config) are errors.
pub async fn run_batch(manager: Arc<BrowserManager>, options: &BatchOptions) -> Result<BatchReport, BrowserError> {
    let tasks = options.tasks()?;
    let dirs = SaveDirs::new(&options.save_dir);
    dirs.create()?;

    let pool = WorkerPool::new(PoolConfig::new(options.concurrency))?;
    info!(
        "Marking {} document(s) from {} into {} with {} worker(s)",
        tasks.len(),
        options.urls_path.display(),
        dirs.root().display(),
        options.concurrency
    );

    let handler = Arc::new(DocumentHandler::new(manager, dirs, options.settings.clone()));
    Ok(pool.run_all(tasks, handler).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options(urls_path: PathBuf) -> BatchOptions {
        BatchOptions::from_config(&Config::default(), urls_path, "/tmp/out")
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.batch.concurrency = 8;
        config.batch.settle_ms = 500;
        config.marking.depth = 3;

        let options = BatchOptions::from_config(&config, "urls.txt", "out");
        assert_eq!(options.concurrency, 8);
        assert_eq!(options.total, -1);
        assert_eq!(options.settings.depth, 3);
        assert_eq!(options.settings.settle, Duration::from_millis(500));
        assert_eq!(options.settings.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_tasks_from_list_window() {
        let tmp = TempDir::new().unwrap();
        let list = tmp.path().join("urls.txt");
        fs::write(&list, "https://a.test/\n\n  https://b.test/  \nhttps://c.test/\nhttps://d.test/\n").unwrap();

        let mut options = options(list);
        options.start = 1;
        options.total = 2;
        let tasks = options.tasks().unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[0].name, "0000001");
        assert_eq!(tasks[0].payload.url, "https://b.test/");
        assert_eq!(tasks[1].name, "0000002");
        assert_ne!(tasks[0].payload.viewport, tasks[1].payload.viewport);
    }

    #[test]
    fn test_tasks_fixed_viewport() {
        let tmp = TempDir::new().unwrap();
        let list = tmp.path().join("urls.txt");
        fs::write(&list, "https://a.test/\nhttps://b.test/\n").unwrap();

        let mut options = options(list);
        options.fixed_viewport = true;
        let tasks = options.tasks().unwrap();
        assert!(tasks.iter().all(|t| t.payload.viewport == (1920, 1080)));
    }

    #[test]
    fn test_tasks_from_html_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.html"), "<p>b</p>").unwrap();
        fs::write(tmp.path().join("a.html"), "<p>a</p>").unwrap();
        fs::write(tmp.path().join("notes.txt"), "skip").unwrap();

        let tasks = options(tmp.path().to_path_buf()).tasks().unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].payload.url.starts_with("file://"));
        assert!(tasks[0].payload.url.ends_with("/a.html"));
    }

    #[test]
    fn test_missing_list_is_error() {
        let result = options(PathBuf::from("/nonexistent/urls.txt")).tasks();
        assert!(matches!(result, Err(BrowserError::Io(_))));
    }
}
