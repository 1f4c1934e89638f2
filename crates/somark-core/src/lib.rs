//! # Somark Core
//!
//! Turns a rendered document into a pruned, typed, spatially grounded tree of
//! the elements worth marking in a Set-of-Marks overlay.
//!
//! ## Passes
//!
//! ```text
//! Document ──► visibility ──► types ──► result tree ──► prune ──► select / overlay
//!              (pass 1)       (pass 2)   (pass 3)        (pass 4)
//! ```
//!
//! Each pass is a total function over the whole tree and only reads what the
//! previous pass fully populated. Per-element state lives in an
//! [`AnalyzerContext`] built fresh for every run, so concurrent analyses never
//! share state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let doc = StaticDocument::from_json(&snapshot_json)?;
//! let mut marker = Marker::default();
//! marker.aggregate(&doc)?;
//! let annotations = marker.mark(&mut overlay, 99, LabelMode::IndexAndTypes).await?;
//! ```

pub mod aggregate;
pub mod classify;
pub mod context;
pub mod document;
mod error;
pub mod geometry;
pub mod overlay;
pub mod pipeline;
pub mod prune;
pub mod select;
pub mod snapshot;
pub mod types;
pub mod visibility;

pub use aggregate::{build_result_tree, ResultNode};
pub use classify::annotate_types;
pub use context::{AnalyzerContext, NodeState, StyleFacts};
pub use document::{
    Attributes, ChildNode, ComputedStyle, Document, NodeId, Rect, TagKind, Viewport,
};
pub use error::AnalysisError;
pub use geometry::BoundingBox;
pub use overlay::{build_marks, mark_color, LabelMode, MemoryOverlay, OverlayMark, OverlaySurface};
pub use pipeline::{Analyzer, Marker};
pub use prune::prune;
pub use select::{annotations, select_at_depth, Annotation};
pub use snapshot::{DocumentBuilder, DocumentSnapshot, RecordedHit, SnapshotNode, StaticDocument};
pub use types::{ElementType, TypeSet};
pub use visibility::{annotate_visibility, probe_points, sample_points};
