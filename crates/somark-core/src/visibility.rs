//! Pass 1: visibility.
//!
//! An element is self-visible when enough of it is on screen and it is not
//! buried under other content. Overall visibility additionally lets a
//! container with visible overflow inherit visibility from its children.

use tracing::debug;

use crate::context::{AnalyzerContext, NodeState, StyleFacts};
use crate::document::{Document, NodeId, Viewport};
use crate::error::AnalysisError;
use crate::geometry::BoundingBox;

/// Fully visible boxes smaller than this are noise.
const MIN_AREA: f64 = 40.0;
/// Fully visible boxes thinner than this are noise.
const MIN_SIDE: f64 = 5.0;
/// Minimum area for a box that is at least half on screen.
const SMALL_AREA: f64 = 400.0;
/// Fraction of the viewport above which a box counts as large.
const LARGE_AREA_DIVISOR: f64 = 20.0;
const VISIBLE_RATIO: f64 = 0.5;
/// Sample points sit on a box inset to this fraction on each axis.
const SAMPLE_INSET: f64 = 0.85;

/// The five hit-test points of a visible box: center, then the corners of the
/// box inset to 85%, clockwise from top-left.
pub fn sample_points(rect: &BoundingBox) -> [(f64, f64); 5] {
    let cx = rect.center_x();
    let cy = rect.center_y();
    let dx = rect.width() * SAMPLE_INSET / 2.0;
    let dy = rect.height() * SAMPLE_INSET / 2.0;
    [
        (cx, cy),
        (cx - dx, cy - dy),
        (cx + dx, cy - dy),
        (cx - dx, cy + dy),
        (cx + dx, cy + dy),
    ]
}

/// Every point the visibility pass will hit-test on `doc`, in visit order.
///
/// A live page has to answer these in one round trip before the pass runs, so
/// this replays exactly the elements the pass samples: those that are not
/// style-hidden and have a positive raw area.
pub fn probe_points<D: Document + ?Sized>(doc: &D) -> Result<Vec<(f64, f64)>, AnalysisError> {
    let viewport = doc.viewport();
    let mut points = Vec::new();
    let mut stack = vec![doc.root()];
    while let Some(node) = stack.pop() {
        let rect = doc.bounding_rect(node);
        let original = BoundingBox::raw(rect)?;
        if !doc.computed_style(node).is_hidden() && original.area() > 0.0 {
            let visible = BoundingBox::clamped(rect, viewport)?;
            points.extend(sample_points(&visible));
        }
        stack.extend(doc.children(node).into_iter().rev());
    }
    Ok(points)
}

/// Run the visibility pass over the whole document.
///
/// Records a [`NodeState`] for every element with both visibility flags set.
pub fn annotate_visibility<D: Document + ?Sized>(
    ctx: &mut AnalyzerContext<'_, D>,
) -> Result<(), AnalysisError> {
    let root = ctx.doc().root();
    let visible = visit(ctx, root)?;
    debug!(elements = ctx.len(), root_visible = visible, "Visibility pass done");
    Ok(())
}

fn visit<D: Document + ?Sized>(
    ctx: &mut AnalyzerContext<'_, D>,
    node: NodeId,
) -> Result<bool, AnalysisError> {
    let doc = ctx.doc();
    let viewport = ctx.viewport();
    let rect = doc.bounding_rect(node);
    let style = StyleFacts::from_style(doc.computed_style(node));
    let mut state = NodeState::new(
        style,
        BoundingBox::raw(rect)?,
        BoundingBox::clamped(rect, viewport)?,
    );

    let self_visible = is_self_visible(doc, viewport, node, &state);
    state.self_visible = Some(self_visible);
    ctx.insert(node, state);

    let children = doc.children(node);
    let mut children_visible = false;
    for child in &children {
        children_visible |= visit(ctx, *child)?;
    }

    let state = ctx.state(node)?;
    let clip = state.style.overflow_hidden().then_some(state.self_rect_visible);
    let hidden = state.style.hidden;
    let overflow_visible = state.style.overflow_visible();

    if let Some(clip) = clip {
        for child in &children {
            ctx.state_mut(*child)?.self_rect_visible.crop(&clip)?;
        }
    }

    let visible = !hidden && (self_visible || (overflow_visible && children_visible));
    ctx.state_mut(node)?.visible = Some(visible);
    Ok(visible)
}

fn is_self_visible<D: Document + ?Sized>(
    doc: &D,
    viewport: Viewport,
    node: NodeId,
    state: &NodeState,
) -> bool {
    let area_original = state.self_rect_original.area();
    let area_visible = state.self_rect_visible.area();
    if state.style.hidden || area_original == 0.0 {
        return false;
    }

    let large_area = viewport.area() / LARGE_AREA_DIVISOR;
    let parent = doc.parent(node);
    let accessible = sample_points(&state.self_rect_visible)
        .into_iter()
        .any(|(x, y)| match doc.element_from_point(x, y) {
            Some(hit) => doc.contains(node, hit) || Some(hit) == parent,
            None => false,
        });
    if !accessible && area_visible < large_area {
        return false;
    }

    let ratio = area_visible / area_original;
    let rect = &state.self_rect_visible;
    (ratio == 1.0 && area_visible >= MIN_AREA && rect.width().min(rect.height()) > MIN_SIDE)
        || (ratio >= VISIBLE_RATIO && area_visible >= SMALL_AREA)
        || (ratio < VISIBLE_RATIO && area_visible >= large_area)
}

#[cfg(test)]
#[path = "visibility_tests.rs"]
mod tests;
