//! Live Chrome capture and batch marking for somark.
//!
//! Drives Chrome over the DevTools Protocol, turns the rendered page into a
//! document the core analyzer understands, and draws the resulting marks back
//! into the page before taking screenshots.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  snapshot / hits  ┌──────────────┐    WebSocket    ┌──────────┐
//! │ somark-core  │ ◄──────────────── │   capture    │ ◄─────────────► │  Chrome  │
//! │  (analyzer)  │ ────────────────► │   overlay    │       CDP       │  (page)  │
//! └──────────────┘      marks        └──────────────┘                 └──────────┘
//! ```
//!
//! ## Setup
//!
//! Nothing to start by hand: [`BrowserManager`] launches Chrome with remote
//! debugging when no instance is listening on the configured port.
//!
//! ## Batches
//!
//! [`run_batch`] reads a URL list, shares the work across a bounded worker
//! pool and writes for every capture:
//!
//! - `marked/<name>.png` with index and type labels
//! - `som/<name>.png` with index labels only
//! - `raw/<name>.png` without overlay
//! - `anno/<name>.json` with the page metadata and one record per mark

pub mod batch;
pub mod capture;
pub mod cdp;
pub mod manager;
pub mod scroll;

pub use batch::{run_batch, BatchOptions, DocumentRecord, DocumentSettings, SaveDirs};
pub use capture::{capture_document, page_meta, PageMeta, PageOverlay};
pub use cdp::{CdpClient, CdpError, PageSession};
pub use manager::{BrowserError, BrowserManager, BrowserManagerConfig};
pub use scroll::{scroll_plan, PlannedCapture};
