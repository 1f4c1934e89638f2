//! Pass 4: structural pruning.
//!
//! Layout-heavy pages nest the same content in stacks of single-child `div`s.
//! The pruner collapses those stacks so that depth selection lands on the
//! content instead of its wrappers.

use tracing::trace;

use crate::aggregate::ResultNode;
use crate::document::TagKind;
use crate::error::AnalysisError;
use crate::geometry::BoundingBox;

/// Centers further apart than this are different boxes.
const MAX_CENTER_DISTANCE: f64 = 5.0;
const HIGH_OVERLAP: f64 = 0.6;
const LOW_OVERLAP: f64 = 0.4;
/// Area difference below which the larger box is kept.
const AREA_SLACK: f64 = 1500.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Keep,
    /// Replace the node by its only child.
    Splice,
    /// Keep the node and take over its child's children.
    Adopt,
}

/// Prune the tree post-order. The root itself is never removed.
pub fn prune(mut root: ResultNode) -> Result<ResultNode, AnalysisError> {
    let children = std::mem::take(&mut root.children);
    root.children = children
        .into_iter()
        .map(prune_node)
        .collect::<Result<_, _>>()?;
    root.refresh_signature();
    Ok(root)
}

fn prune_node(mut node: ResultNode) -> Result<ResultNode, AnalysisError> {
    let children = std::mem::take(&mut node.children);
    node.children = children
        .into_iter()
        .map(prune_node)
        .collect::<Result<_, _>>()?;

    let mut node = match decide(&node)? {
        Decision::Keep => node,
        Decision::Splice => {
            trace!(node = node.node.0, "Splicing wrapper");
            match node.children.pop() {
                Some(child) => child,
                None => node,
            }
        }
        Decision::Adopt => {
            trace!(node = node.node.0, "Adopting grandchildren");
            if let Some(child) = node.children.pop() {
                node.children = child.children;
            }
            node
        }
    };
    node.refresh_signature();
    Ok(node)
}

fn decide(node: &ResultNode) -> Result<Decision, AnalysisError> {
    let [child] = node.children.as_slice() else {
        return Ok(Decision::Keep);
    };
    if node.kind != TagKind::Div || child.kind != TagKind::Div {
        return Ok(Decision::Keep);
    }

    if node.self_rect.area() == 0.0 && node.self_types.is_empty() {
        return Ok(Decision::Splice);
    }

    let node_area = node.rect.area();
    let child_area = child.rect.area();
    let overlap = child_area / node_area;
    let same = node.text == child.text
        && node.types.len() == child.types.len()
        && child.types.is_subset_of(node.types)
        && BoundingBox::center_l1_distance(&node.rect, &child.rect)? < MAX_CENTER_DISTANCE
        && (overlap > HIGH_OVERLAP
            || (overlap > LOW_OVERLAP && node_area - child_area < AREA_SLACK));
    if !same {
        return Ok(Decision::Keep);
    }

    if node_area - child_area < AREA_SLACK {
        Ok(Decision::Adopt)
    } else {
        Ok(Decision::Splice)
    }
}

#[cfg(test)]
#[path = "prune_tests.rs"]
mod tests;
