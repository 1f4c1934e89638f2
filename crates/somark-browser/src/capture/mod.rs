//! Live page capture.
//!
//! Capture is two-phase. The page script serializes the body subtree into a
//! [`DocumentSnapshot`](somark_core::DocumentSnapshot) and remembers which
//! element got which id. The analyzer then computes every element's sample
//! points, and the page resolves all of them with `elementFromPoint` in one
//! round trip. The result is a [`StaticDocument`](somark_core::StaticDocument)
//! whose hit tests are the page's own.

mod overlay;
mod page;
mod script;

pub use overlay::PageOverlay;
pub use page::{capture_document, install_script, page_meta, PageMeta};
