//! Owned document snapshots.
//!
//! A [`DocumentSnapshot`] is the serialized form of a rendered page: every
//! element with its tag, attributes, computed style and geometry. A
//! [`StaticDocument`] validates a snapshot and answers the [`Document`]
//! queries from it. Hit tests come from a table of recorded results (filled by
//! whoever captured the page) and fall back to a geometric test for points
//! nobody recorded.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::{
    Attributes, ChildNode, ComputedStyle, Document, NodeId, Rect, Viewport,
};
use crate::error::AnalysisError;

/// One element of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotNode {
    pub tag_name: String,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default)]
    pub style: ComputedStyle,
    pub rect: Rect,
    /// Client rects of the element's content range. Empty when the range
    /// produced none.
    #[serde(default)]
    pub text_rects: Vec<Rect>,
    /// Rendered text (`innerText`). Live captures record it for every element.
    #[serde(default)]
    pub inner_text: Option<String>,
    #[serde(default)]
    pub children: Vec<ChildNode>,
}

impl SnapshotNode {
    pub fn new(tag_name: impl Into<String>, rect: Rect) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: Attributes::default(),
            style: ComputedStyle::default(),
            rect,
            text_rects: Vec::new(),
            inner_text: None,
            children: Vec::new(),
        }
    }
}

/// The topmost element the page reported at a point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedHit {
    pub x: f64,
    pub y: f64,
    pub node: Option<NodeId>,
}

/// Serialized page: viewport, root id and a flat element table indexed by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub viewport: Viewport,
    pub root: NodeId,
    pub nodes: Vec<SnapshotNode>,
    /// Hit tests resolved by the live page, if it was captured from one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hits: Vec<RecordedHit>,
}

/// A validated snapshot implementing [`Document`].
#[derive(Debug, Clone)]
pub struct StaticDocument {
    snapshot: DocumentSnapshot,
    parents: Vec<Option<NodeId>>,
    /// Point key to position in `snapshot.hits`.
    hits: HashMap<(u64, u64), usize>,
}

fn point_key(x: f64, y: f64) -> (u64, u64) {
    (x.to_bits(), y.to_bits())
}

impl StaticDocument {
    /// Validate the tree shape and index parents.
    ///
    /// Every child id must exist and be referenced at most once, and the root
    /// must not be anyone's child. Recorded hits must name existing nodes.
    pub fn new(mut snapshot: DocumentSnapshot) -> Result<Self, AnalysisError> {
        let len = snapshot.nodes.len();
        if snapshot.root.0 >= len {
            return Err(AnalysisError::InvalidSnapshot(format!(
                "root {:?} out of range ({} nodes)",
                snapshot.root, len
            )));
        }

        let mut parents: Vec<Option<NodeId>> = vec![None; len];
        for (index, node) in snapshot.nodes.iter().enumerate() {
            for child in &node.children {
                let ChildNode::Element { id } = child else {
                    continue;
                };
                if id.0 >= len {
                    return Err(AnalysisError::InvalidSnapshot(format!(
                        "child {:?} of node {} out of range",
                        id, index
                    )));
                }
                if *id == snapshot.root || parents[id.0].is_some() {
                    return Err(AnalysisError::InvalidSnapshot(format!(
                        "node {:?} has more than one parent",
                        id
                    )));
                }
                parents[id.0] = Some(NodeId(index));
            }
        }

        // With single parents, a cycle can only be a loop unreachable from the root.
        let mut seen = vec![false; len];
        let mut stack = vec![snapshot.root];
        while let Some(id) = stack.pop() {
            seen[id.0] = true;
            for child in &snapshot.nodes[id.0].children {
                if let ChildNode::Element { id } = child {
                    stack.push(*id);
                }
            }
        }
        if let Some(orphan) = (0..len).find(|i| !seen[*i] && parents[*i].is_some()) {
            return Err(AnalysisError::InvalidSnapshot(format!(
                "node {} is part of a cycle",
                orphan
            )));
        }

        if let Some(bad) = snapshot.hits.iter().find(|hit| hit.node.is_some_and(|id| id.0 >= len)) {
            return Err(AnalysisError::InvalidSnapshot(format!(
                "hit at ({}, {}) names unknown node {:?}",
                bad.x, bad.y, bad.node
            )));
        }

        let recorded = std::mem::take(&mut snapshot.hits);
        let mut doc = Self {
            snapshot,
            parents,
            hits: HashMap::new(),
        };
        for hit in recorded {
            doc.record_hit(hit.x, hit.y, hit.node);
        }
        Ok(doc)
    }

    pub fn from_json(json: &str) -> Result<Self, AnalysisError> {
        let snapshot: DocumentSnapshot = serde_json::from_str(json)?;
        Self::new(snapshot)
    }

    pub fn snapshot(&self) -> &DocumentSnapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> DocumentSnapshot {
        self.snapshot
    }

    pub fn len(&self) -> usize {
        self.snapshot.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SnapshotNode {
        &self.snapshot.nodes[id.0]
    }

    /// Element ids in document order, starting at the root.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.len());
        let mut stack = vec![self.snapshot.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).into_iter().rev());
        }
        order
    }

    /// Record the result of a real hit test at a point, replacing any earlier
    /// result for the same point.
    pub fn record_hit(&mut self, x: f64, y: f64, hit: Option<NodeId>) {
        let entry = RecordedHit { x, y, node: hit };
        match self.hits.get(&point_key(x, y)) {
            Some(&index) => self.snapshot.hits[index] = entry,
            None => {
                self.hits.insert(point_key(x, y), self.snapshot.hits.len());
                self.snapshot.hits.push(entry);
            }
        }
    }

    pub fn recorded_hits(&self) -> usize {
        self.hits.len()
    }

    /// Last element in document order whose box contains the point and that
    /// is not hidden by style.
    fn geometric_hit(&self, x: f64, y: f64) -> Option<NodeId> {
        self.preorder().into_iter().rev().find(|id| {
            let node = self.node(*id);
            !node.style.is_hidden() && node.rect.contains(x, y)
        })
    }

    /// Rendered-text approximation for nodes without a captured `inner_text`,
    /// which only happens for hand-built documents. Subtrees with
    /// `display: none` or `visibility: hidden` are skipped, and `<br>` and
    /// block-level children break the line.
    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in &self.node(id).children {
            match child {
                ChildNode::Text { text } => out.push_str(text),
                ChildNode::Element { id } => {
                    let node = self.node(*id);
                    if node.style.display == "none" || node.style.visibility == "hidden" {
                        continue;
                    }
                    if node.tag_name.eq_ignore_ascii_case("br") {
                        out.push('\n');
                        continue;
                    }
                    let block = !node.style.display.starts_with("inline") && node.style.display != "contents";
                    if block {
                        out.push('\n');
                    }
                    self.collect_text(*id, out);
                    if block {
                        out.push('\n');
                    }
                }
            }
        }
    }
}

impl Document for StaticDocument {
    fn root(&self) -> NodeId {
        self.snapshot.root
    }

    fn viewport(&self) -> Viewport {
        self.snapshot.viewport
    }

    fn tag_name(&self, node: NodeId) -> &str {
        &self.node(node).tag_name
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parents[node.0]
    }

    fn child_nodes(&self, node: NodeId) -> &[ChildNode] {
        &self.node(node).children
    }

    fn attributes(&self, node: NodeId) -> &Attributes {
        &self.node(node).attributes
    }

    fn computed_style(&self, node: NodeId) -> &ComputedStyle {
        &self.node(node).style
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.node(node).rect
    }

    fn text_rects(&self, node: NodeId) -> Vec<Rect> {
        self.node(node).text_rects.clone()
    }

    fn inner_text(&self, node: NodeId) -> String {
        if let Some(text) = &self.node(node).inner_text {
            return text.clone();
        }
        let mut text = String::new();
        self.collect_text(node, &mut text);
        text
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        match self.hits.get(&point_key(x, y)) {
            Some(&index) => self.snapshot.hits[index].node,
            None => self.geometric_hit(x, y),
        }
    }
}

/// Incremental construction of a [`StaticDocument`].
///
/// ```rust,ignore
/// let mut builder = DocumentBuilder::new(Viewport::new(1280.0, 720.0));
/// let body = builder.root("body", Rect::from_xywh(0.0, 0.0, 1280.0, 720.0));
/// let link = builder.element(body, "a", Rect::from_xywh(10.0, 10.0, 80.0, 20.0));
/// builder.attributes(link).href = Some("https://example.com/".into());
/// builder.text(link, "Home");
/// let doc = builder.build()?;
/// ```
#[derive(Debug)]
pub struct DocumentBuilder {
    viewport: Viewport,
    nodes: Vec<SnapshotNode>,
    hits: Vec<(f64, f64, Option<NodeId>)>,
}

impl DocumentBuilder {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            nodes: Vec::new(),
            hits: Vec::new(),
        }
    }

    /// Add the root element. Must be the first element added.
    pub fn root(&mut self, tag_name: &str, rect: Rect) -> NodeId {
        self.push(SnapshotNode::new(tag_name, rect))
    }

    /// Append an element as the last child of `parent`.
    pub fn element(&mut self, parent: NodeId, tag_name: &str, rect: Rect) -> NodeId {
        let id = self.push(SnapshotNode::new(tag_name, rect));
        self.nodes[parent.0].children.push(ChildNode::Element { id });
        id
    }

    /// Append a text child to `parent`.
    pub fn text(&mut self, parent: NodeId, text: &str) -> &mut Self {
        self.nodes[parent.0].children.push(ChildNode::Text {
            text: text.to_string(),
        });
        self
    }

    pub fn attributes(&mut self, node: NodeId) -> &mut Attributes {
        &mut self.nodes[node.0].attributes
    }

    pub fn style(&mut self, node: NodeId) -> &mut ComputedStyle {
        &mut self.nodes[node.0].style
    }

    pub fn text_rects(&mut self, node: NodeId, rects: Vec<Rect>) -> &mut Self {
        self.nodes[node.0].text_rects = rects;
        self
    }

    pub fn inner_text(&mut self, node: NodeId, text: &str) -> &mut Self {
        self.nodes[node.0].inner_text = Some(text.to_string());
        self
    }

    /// Pin the hit-test answer at a point.
    pub fn hit(&mut self, x: f64, y: f64, hit: Option<NodeId>) -> &mut Self {
        self.hits.push((x, y, hit));
        self
    }

    pub fn build(self) -> Result<StaticDocument, AnalysisError> {
        let mut doc = StaticDocument::new(DocumentSnapshot {
            viewport: self.viewport,
            root: NodeId(0),
            nodes: self.nodes,
            hits: Vec::new(),
        })?;
        for (x, y, hit) in self.hits {
            doc.record_hit(x, y, hit);
        }
        Ok(doc)
    }

    fn push(&mut self, node: SnapshotNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
