//! Pass 2: type classification.
//!
//! Every visible element gets its own type tags, the cumulative tags of its
//! visible subtree, and a leaf flag. Leaf rules also simplify the cumulative
//! set so a link wrapping an icon and a caption reads as one link.

use tracing::{debug, trace};

use crate::context::AnalyzerContext;
use crate::document::{ChildNode, Document, NodeId, TagKind};
use crate::error::AnalysisError;
use crate::geometry::BoundingBox;
use crate::types::TypeSet;

const ICON_MAX_AREA: f64 = 2500.0;
const ICON_MIN_RATIO: f64 = 0.8;
const ICON_MAX_RATIO: f64 = 1.2;
const CANVAS_IMAGE_AREA: f64 = 10000.0;

/// Run the type pass over the whole document.
///
/// Requires the visibility pass to have run on the same context.
pub fn annotate_types<D: Document + ?Sized>(
    ctx: &mut AnalyzerContext<'_, D>,
) -> Result<(), AnalysisError> {
    let root = ctx.doc().root();
    let types = visit(ctx, root)?;
    debug!(root_types = ?types.names(), "Type pass done");
    Ok(())
}

fn visit<D: Document + ?Sized>(
    ctx: &mut AnalyzerContext<'_, D>,
    node: NodeId,
) -> Result<TypeSet, AnalysisError> {
    if !ctx.state(node)?.is_visible() {
        return Ok(TypeSet::empty());
    }

    let doc = ctx.doc();
    let mut self_types = own_types(ctx, node)?;

    let mut children_types = TypeSet::empty();
    for child in doc.child_nodes(node) {
        match child {
            ChildNode::Text { text } => {
                if !text.trim().is_empty() {
                    children_types |= TypeSet::TEXT;
                }
            }
            ChildNode::Element { id } => children_types |= visit(ctx, *id)?,
        }
    }

    let mut types = self_types | children_types;
    let leaf = simplify_as_leaf(ctx, node, &mut self_types, &mut types)?;

    let text_rect = if types == TypeSet::TEXT {
        text_run_rect(ctx, node)?
    } else {
        None
    };

    let state = ctx.state_mut(node)?;
    state.self_types = self_types;
    state.children_types = children_types;
    state.types = types;
    state.leaf = leaf;
    if let Some(rect) = text_rect {
        state.self_rect_visible = rect;
    }
    trace!(node = node.0, types = ?types.names(), leaf, "Classified");
    Ok(types)
}

/// Tags an element earns by itself, before looking at its children.
fn own_types<D: Document + ?Sized>(
    ctx: &AnalyzerContext<'_, D>,
    node: NodeId,
) -> Result<TypeSet, AnalysisError> {
    let kind = ctx.doc().tag_kind(node);
    let mut types = TypeSet::empty();
    if kind == TagKind::Code {
        types |= TypeSet::CODE;
    }
    if let Some(image) = image_type(kind, &ctx.state(node)?.self_rect_visible) {
        types |= image;
    }
    if let Some(interactive) = interactive_type(ctx, node, kind)? {
        types |= interactive;
    }
    Ok(types)
}

/// Icon or Image for graphic tags, judged on the visible box.
fn image_type(kind: TagKind, rect: &BoundingBox) -> Option<TypeSet> {
    match kind {
        TagKind::Img | TagKind::Image => {
            let ratio = rect.width() / rect.height();
            let square = (ICON_MIN_RATIO..=ICON_MAX_RATIO).contains(&ratio);
            if square && rect.area() <= ICON_MAX_AREA {
                Some(TypeSet::ICON)
            } else {
                Some(TypeSet::IMAGE)
            }
        }
        TagKind::Svg | TagKind::I => Some(TypeSet::ICON),
        TagKind::Canvas if rect.area() > CANVAS_IMAGE_AREA => Some(TypeSet::IMAGE),
        TagKind::Canvas => Some(TypeSet::ICON),
        _ => None,
    }
}

fn interactive_type<D: Document + ?Sized>(
    ctx: &AnalyzerContext<'_, D>,
    node: NodeId,
    kind: TagKind,
) -> Result<Option<TypeSet>, AnalysisError> {
    let attrs = ctx.doc().attributes(node);

    let by_role = match attrs.role.as_deref() {
        Some("button") => Some(TypeSet::BUTTON),
        Some("checkbox") => Some(TypeSet::CHECK_BOX),
        Some("combobox") => Some(TypeSet::COMBO_BOX),
        Some("textbox") => Some(TypeSet::INPUT_BOX),
        _ => None,
    };
    if by_role.is_some() {
        return Ok(by_role);
    }

    let by_tag = match kind {
        TagKind::Input => Some(input_type(attrs.input_type.as_deref())),
        TagKind::Button => Some(TypeSet::BUTTON),
        TagKind::Textarea => Some(TypeSet::INPUT_BOX),
        TagKind::Anchor => attrs
            .href
            .as_deref()
            .filter(|href| !href.trim().is_empty())
            .map(|_| TypeSet::HREF),
        TagKind::Select => Some(TypeSet::SELECT_BOX),
        TagKind::Video => Some(TypeSet::VIDEO),
        TagKind::Iframe | TagKind::Details | TagKind::Summary => Some(TypeSet::INTERACTIVE),
        _ => None,
    };
    if by_tag.is_some() {
        return Ok(by_tag);
    }

    if ctx.state(node)?.style.cursor == "pointer" {
        return Ok(Some(TypeSet::CLICKABLE));
    }
    Ok(None)
}

fn input_type(input_type: Option<&str>) -> TypeSet {
    match input_type.unwrap_or("text").to_ascii_lowercase().as_str() {
        "submit" | "file" | "reset" | "button" => TypeSet::BUTTON,
        "" | "text" | "number" | "password" | "email" | "tel" | "search" => TypeSet::INPUT_BOX,
        _ => TypeSet::INTERACTIVE,
    }
}

/// Apply the leaf rules in order; the first that matches wins.
fn simplify_as_leaf<D: Document + ?Sized>(
    ctx: &AnalyzerContext<'_, D>,
    node: NodeId,
    self_types: &mut TypeSet,
    types: &mut TypeSet,
) -> Result<bool, AnalysisError> {
    let code_text = TypeSet::CODE | TypeSet::TEXT;
    let href_code_text = TypeSet::HREF | code_text;

    // Graphics: any caption is part of the picture.
    if self_types.intersects(TypeSet::ICON | TypeSet::IMAGE) {
        types.remove(TypeSet::TEXT);
        return Ok(true);
    }

    // Code, or a pre block that holds only code.
    let kind = ctx.doc().tag_kind(node);
    if self_types.contains(TypeSet::CODE)
        || (kind == TagKind::Pre && types.contains(TypeSet::CODE) && types.is_subset_of(code_text))
    {
        types.remove(TypeSet::TEXT);
        return Ok(true);
    }

    // Links and buttons absorb their icon and caption.
    if self_types.intersects(TypeSet::HREF | TypeSet::BUTTON) {
        types.remove(TypeSet::CLICKABLE);
        let own = if self_types.contains(TypeSet::HREF) {
            TypeSet::HREF
        } else {
            TypeSet::BUTTON
        };
        if types.is_subset_of(own | TypeSet::ICON | TypeSet::TEXT) {
            *types = own;
            return Ok(true);
        }
    }

    // Inline runs of text, links and code read as a single text block.
    if self_types.is_empty()
        && types.contains(TypeSet::TEXT)
        && types.is_subset_of(href_code_text)
        && inline_children_only(ctx, node, href_code_text)?
    {
        types.remove(TypeSet::HREF | TypeSet::CODE);
        self_types.insert(TypeSet::TEXT);
        return Ok(true);
    }

    Ok(false)
}

fn inline_children_only<D: Document + ?Sized>(
    ctx: &AnalyzerContext<'_, D>,
    node: NodeId,
    allowed: TypeSet,
) -> Result<bool, AnalysisError> {
    for child in ctx.doc().children(node) {
        let state = ctx.state(child)?;
        if !state.is_visible() {
            continue;
        }
        if !state.self_types.is_subset_of(allowed) || !state.style.is_inline() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Union of the clamped client rects of the element's text range, if any of
/// them has area.
fn text_run_rect<D: Document + ?Sized>(
    ctx: &AnalyzerContext<'_, D>,
    node: NodeId,
) -> Result<Option<BoundingBox>, AnalysisError> {
    let viewport = ctx.viewport();
    let rects = ctx
        .doc()
        .text_rects(node)
        .into_iter()
        .map(|rect| BoundingBox::clamped(rect, viewport))
        .collect::<Result<Vec<_>, _>>()?;
    BoundingBox::aggregate(&rects)
}

#[cfg(test)]
#[path = "classify_tests.rs"]
mod tests;
