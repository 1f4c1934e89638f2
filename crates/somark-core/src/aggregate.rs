//! Pass 3: result tree.
//!
//! Builds an owned tree of the typed elements only. Each node carries its final
//! box (its own visible box, grown to cover its kept children when overflow is
//! visible) and the text an agent would read for it.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::context::AnalyzerContext;
use crate::document::{Document, NodeId, TagKind};
use crate::error::AnalysisError;
use crate::geometry::BoundingBox;
use crate::types::TypeSet;

/// Longest text kept per node, in characters.
pub const MAX_TEXT_CHARS: usize = 1000;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// A typed element of the result tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultNode {
    pub node: NodeId,
    pub tag_name: String,
    pub kind: TagKind,
    pub self_types: TypeSet,
    pub types: TypeSet,
    pub leaf: bool,
    /// Own visible box, after clipping and text-run recomputation.
    pub self_rect: BoundingBox,
    /// Final box.
    pub rect: BoundingBox,
    pub text: String,
    pub aria_label: String,
    pub title: String,
    /// `TAG[child,child,...]`, for debugging tree shape.
    pub signature: String,
    pub children: Vec<ResultNode>,
}

impl ResultNode {
    /// Recompute the signature from the current children.
    pub fn refresh_signature(&mut self) {
        let children: Vec<&str> = self.children.iter().map(|c| c.signature.as_str()).collect();
        self.signature = format!("{}[{}]", self.tag_name, children.join(","));
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ResultNode::size).sum::<usize>()
    }
}

/// Build the result tree from a classified context.
///
/// Returns `None` when the root itself carries no types.
pub fn build_result_tree<D: Document + ?Sized>(
    ctx: &AnalyzerContext<'_, D>,
) -> Result<Option<ResultNode>, AnalysisError> {
    let tree = visit(ctx, ctx.doc().root())?;
    if let Some(root) = &tree {
        debug!(nodes = root.size(), signature = %root.signature, "Result tree built");
    }
    Ok(tree)
}

fn visit<D: Document + ?Sized>(
    ctx: &AnalyzerContext<'_, D>,
    node: NodeId,
) -> Result<Option<ResultNode>, AnalysisError> {
    let state = ctx.state(node)?;
    if state.types.is_empty() {
        return Ok(None);
    }

    let doc = ctx.doc();
    let mut children = Vec::new();
    for child in doc.children(node) {
        if let Some(kept) = visit(ctx, child)? {
            children.push(kept);
        }
    }

    let self_rect = state.self_rect_visible;
    let rect = if state.style.overflow_visible() {
        let boxes = std::iter::once(&self_rect).chain(children.iter().map(|c| &c.rect));
        BoundingBox::aggregate(boxes)?.unwrap_or(self_rect)
    } else {
        self_rect
    };

    let kind = doc.tag_kind(node);
    let attrs = doc.attributes(node);
    let mut text = own_text(ctx, node, kind, state.self_types);
    if text.is_empty() {
        text = children
            .iter()
            .filter(|child| !child.text.is_empty())
            .map(|child| child.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
    }

    let mut result = ResultNode {
        node,
        tag_name: doc.tag_name(node).to_string(),
        kind,
        self_types: state.self_types,
        types: state.types,
        leaf: state.leaf,
        self_rect,
        rect,
        text: truncate(&text, MAX_TEXT_CHARS),
        aria_label: attrs.aria_label.clone().unwrap_or_default(),
        title: attrs.title.clone().unwrap_or_default(),
        signature: String::new(),
        children,
    };
    result.refresh_signature();
    Ok(Some(result))
}

/// Text the element itself provides, by its own types.
fn own_text<D: Document + ?Sized>(
    ctx: &AnalyzerContext<'_, D>,
    node: NodeId,
    kind: TagKind,
    self_types: TypeSet,
) -> String {
    let doc = ctx.doc();
    let attrs = doc.attributes(node);

    if self_types.intersects(TypeSet::IMAGE | TypeSet::ICON) {
        attrs.alt.clone().unwrap_or_default()
    } else if self_types.contains(TypeSet::BUTTON) && kind == TagKind::Input {
        attrs.value.clone().unwrap_or_default()
    } else if self_types.contains(TypeSet::INPUT_BOX) {
        format!(
            "{}{}",
            attrs.placeholder.as_deref().unwrap_or_default(),
            attrs.value.as_deref().unwrap_or_default()
        )
    } else if self_types.contains(TypeSet::SELECT_BOX) {
        attrs.selected_option().unwrap_or_default().to_string()
    } else if !self_types.is_empty() {
        collapse_whitespace(&doc.inner_text(node))
    } else {
        String::new()
    }
}

/// Trim, then fold every whitespace run into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text.trim(), " ").into_owned()
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod tests;
