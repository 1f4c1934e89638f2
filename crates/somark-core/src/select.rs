//! Depth selection and annotation records.

use serde::{Deserialize, Serialize};

use crate::aggregate::ResultNode;
use crate::error::AnalysisError;

/// One reported element, as written to the annotation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub tag_name: String,
    pub types: Vec<String>,
    pub text: String,
    /// `[left, top, right, bottom]`, rounded to whole pixels.
    pub bbox: [i64; 4],
    pub aria_label: String,
    pub title: String,
}

impl From<&ResultNode> for Annotation {
    fn from(node: &ResultNode) -> Self {
        Self {
            tag_name: node.tag_name.clone(),
            types: node.types.names(),
            text: node.text.clone(),
            bbox: node.rect.rounded(),
            aria_label: node.aria_label.clone(),
            title: node.title.clone(),
        }
    }
}

/// Nodes to report when expanding the tree `depth` levels below the root.
///
/// Expansion stops early at leaves and at nodes without kept children. The
/// selection is empty when the root has no kept children or no types.
pub fn select_at_depth(root: &ResultNode, depth: i64) -> Result<Vec<&ResultNode>, AnalysisError> {
    if depth < 0 {
        return Err(AnalysisError::NegativeDepth(depth));
    }
    let mut selected = Vec::new();
    if root.children.is_empty() || root.types.is_empty() {
        return Ok(selected);
    }
    collect(root, depth, &mut selected);
    Ok(selected)
}

fn collect<'a>(node: &'a ResultNode, depth: i64, out: &mut Vec<&'a ResultNode>) {
    if depth == 0 || node.children.is_empty() || node.leaf {
        out.push(node);
        return;
    }
    for child in &node.children {
        collect(child, depth - 1, out);
    }
}

pub fn annotations(nodes: &[&ResultNode]) -> Vec<Annotation> {
    nodes.iter().map(|node| Annotation::from(*node)).collect()
}
