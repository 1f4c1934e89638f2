//! Batch marking of URL lists.
//!
//! Each document of the selected window becomes one worker pool task. A task
//! opens its own page, loads the URL, takes one to three scrolled captures and
//! closes the page. Captures land in `anno/`, `marked/`, `som/` and `raw/`
//! under the save directory; a document with any existing record is skipped.

mod driver;
mod handler;
mod inputs;
mod output;
mod step;
mod viewport;

pub use driver::{run_batch, BatchOptions};
pub use handler::{DocumentHandler, DocumentJob};
pub use inputs::{document_name, parse_url_list, read_url_list, select_window, urls_from_dir};
pub use output::{write_json_atomic, DocumentRecord, SaveDirs};
pub use step::{capture_step, load_document, mark_document, DocumentSettings};
pub use viewport::{viewport_for, DEVICE_VIEWPORTS, FIXED_VIEWPORT};
