//! Per-run derived state.

use std::collections::HashMap;

use crate::document::{ComputedStyle, Document, NodeId, Viewport};
use crate::error::AnalysisError;
use crate::geometry::BoundingBox;
use crate::types::TypeSet;

/// The subset of computed style the passes keep after reading it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleFacts {
    pub hidden: bool,
    pub display: String,
    pub cursor: String,
    pub overflow: String,
}

impl StyleFacts {
    pub fn from_style(style: &ComputedStyle) -> Self {
        Self {
            hidden: style.is_hidden(),
            display: style.display.clone(),
            cursor: style.cursor.clone(),
            overflow: style.overflow.clone(),
        }
    }

    pub fn overflow_visible(&self) -> bool {
        self.overflow == "visible"
    }

    pub fn overflow_hidden(&self) -> bool {
        self.overflow == "hidden"
    }

    /// Laid out inline: `inline`, `inline-block` or `inline-flex`.
    pub fn is_inline(&self) -> bool {
        matches!(
            self.display.as_str(),
            "inline" | "inline-block" | "inline-flex"
        )
    }
}

/// Derived state of one element.
///
/// Visibility fields are filled by the visibility pass; type fields by the
/// type pass. `self_rect_visible` may be narrowed later by parent clipping and
/// by the text-run recomputation.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub style: StyleFacts,
    pub self_rect_original: BoundingBox,
    pub self_rect_visible: BoundingBox,
    pub self_visible: Option<bool>,
    pub visible: Option<bool>,
    pub self_types: TypeSet,
    pub children_types: TypeSet,
    pub types: TypeSet,
    pub leaf: bool,
}

impl NodeState {
    pub fn new(style: StyleFacts, original: BoundingBox, visible: BoundingBox) -> Self {
        Self {
            style,
            self_rect_original: original,
            self_rect_visible: visible,
            self_visible: None,
            visible: None,
            self_types: TypeSet::empty(),
            children_types: TypeSet::empty(),
            types: TypeSet::empty(),
            leaf: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(false)
    }
}

/// Owns the identity to state map for a single analysis run.
///
/// A context is built for one document and dropped with the run; nothing in it
/// survives into the next analysis.
pub struct AnalyzerContext<'d, D: Document + ?Sized> {
    doc: &'d D,
    viewport: Viewport,
    states: HashMap<NodeId, NodeState>,
}

impl<'d, D: Document + ?Sized> AnalyzerContext<'d, D> {
    pub fn new(doc: &'d D) -> Self {
        Self {
            doc,
            viewport: doc.viewport(),
            states: HashMap::new(),
        }
    }

    pub fn doc(&self) -> &'d D {
        self.doc
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn state(&self, node: NodeId) -> Result<&NodeState, AnalysisError> {
        self.states.get(&node).ok_or(AnalysisError::UnknownNode(node))
    }

    pub fn state_mut(&mut self, node: NodeId) -> Result<&mut NodeState, AnalysisError> {
        self.states
            .get_mut(&node)
            .ok_or(AnalysisError::UnknownNode(node))
    }

    pub fn insert(&mut self, node: NodeId, state: NodeState) {
        self.states.insert(node, state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
