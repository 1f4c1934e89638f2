//! Read-only view of a rendered document, as consumed by the analysis passes.

use serde::{Deserialize, Serialize};

/// Stable identity of an element within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// Current viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Rectangle in viewport coordinates, as reported by layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build from an origin and a size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Whether the point lies inside (right and bottom edges exclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }
}

/// The computed-style properties the passes read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub opacity: f64,
    pub visibility: String,
    pub display: String,
    pub cursor: String,
    pub overflow: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            visibility: "visible".to_string(),
            display: "block".to_string(),
            cursor: "auto".to_string(),
            overflow: "visible".to_string(),
        }
    }
}

impl ComputedStyle {
    /// Hidden on purpose: fully transparent, `visibility: hidden` or `display: none`.
    pub fn is_hidden(&self) -> bool {
        self.opacity == 0.0 || self.visibility == "hidden" || self.display == "none"
    }
}

/// Element attributes and form state the classifier and text extraction read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attributes {
    /// ARIA role.
    pub role: Option<String>,
    /// Input type (the reflected `type` property, lowercase).
    #[serde(rename = "type")]
    pub input_type: Option<String>,
    /// Resolved link destination.
    pub href: Option<String>,
    /// Current form value.
    pub value: Option<String>,
    pub placeholder: Option<String>,
    /// Option labels of a select, in order.
    pub options: Vec<String>,
    /// Selected option index (`-1` when nothing is selected).
    pub selected_index: Option<i64>,
    pub alt: Option<String>,
    pub title: Option<String>,
    pub aria_label: Option<String>,
}

impl Attributes {
    /// Label of the currently selected option, if any.
    pub fn selected_option(&self) -> Option<&str> {
        let index = usize::try_from(self.selected_index?).ok()?;
        self.options.get(index).map(String::as_str)
    }
}

/// A child of an element in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChildNode {
    Element { id: NodeId },
    Text { text: String },
}

/// The tag names the passes distinguish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Div,
    Pre,
    Code,
    Img,
    /// SVG `<image>`.
    Image,
    Svg,
    /// Icon-font marker.
    I,
    Canvas,
    Input,
    Button,
    Textarea,
    Anchor,
    Select,
    Video,
    Iframe,
    Details,
    Summary,
    Other,
}

impl TagKind {
    pub fn from_tag_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "div" => TagKind::Div,
            "pre" => TagKind::Pre,
            "code" => TagKind::Code,
            "img" => TagKind::Img,
            "image" => TagKind::Image,
            "svg" => TagKind::Svg,
            "i" => TagKind::I,
            "canvas" => TagKind::Canvas,
            "input" => TagKind::Input,
            "button" => TagKind::Button,
            "textarea" => TagKind::Textarea,
            "a" => TagKind::Anchor,
            "select" => TagKind::Select,
            "video" => TagKind::Video,
            "iframe" => TagKind::Iframe,
            "details" => TagKind::Details,
            "summary" => TagKind::Summary,
            _ => TagKind::Other,
        }
    }
}

/// The document environment the analysis runs against.
///
/// Implementations must answer every query for every id reachable from
/// [`Document::root`].
pub trait Document {
    fn root(&self) -> NodeId;

    fn viewport(&self) -> Viewport;

    fn tag_name(&self, node: NodeId) -> &str;

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Element and text children in document order.
    fn child_nodes(&self, node: NodeId) -> &[ChildNode];

    fn attributes(&self, node: NodeId) -> &Attributes;

    fn computed_style(&self, node: NodeId) -> &ComputedStyle;

    /// Layout box in viewport coordinates.
    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Client rects of a range spanning the element's contents.
    fn text_rects(&self, node: NodeId) -> Vec<Rect>;

    /// Rendered text of the element.
    fn inner_text(&self, node: NodeId) -> String;

    /// Topmost element at a viewport point.
    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId>;

    fn tag_kind(&self, node: NodeId) -> TagKind {
        TagKind::from_tag_name(self.tag_name(node))
    }

    /// Element children in document order.
    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.child_nodes(node)
            .iter()
            .filter_map(|child| match child {
                ChildNode::Element { id } => Some(*id),
                ChildNode::Text { .. } => None,
            })
            .collect()
    }

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_kind_case_insensitive() {
        assert_eq!(TagKind::from_tag_name("DIV"), TagKind::Div);
        assert_eq!(TagKind::from_tag_name("svg"), TagKind::Svg);
        assert_eq!(TagKind::from_tag_name("A"), TagKind::Anchor);
        assert_eq!(TagKind::from_tag_name("section"), TagKind::Other);
    }

    #[test]
    fn test_style_hidden() {
        let mut style = ComputedStyle::default();
        assert!(!style.is_hidden());
        style.opacity = 0.0;
        assert!(style.is_hidden());

        let style = ComputedStyle {
            display: "none".to_string(),
            ..Default::default()
        };
        assert!(style.is_hidden());

        let style = ComputedStyle {
            visibility: "hidden".to_string(),
            ..Default::default()
        };
        assert!(style.is_hidden());
    }

    #[test]
    fn test_selected_option() {
        let attrs = Attributes {
            options: vec!["One".to_string(), "Two".to_string()],
            selected_index: Some(1),
            ..Default::default()
        };
        assert_eq!(attrs.selected_option(), Some("Two"));

        let none = Attributes {
            options: vec!["One".to_string()],
            selected_index: Some(-1),
            ..Default::default()
        };
        assert_eq!(none.selected_option(), None);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::from_xywh(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(29.9, 29.9));
        assert!(!rect.contains(30.0, 15.0));
    }

    #[test]
    fn test_child_node_deserialize() {
        let json = r#"[{"kind": "element", "id": 3}, {"kind": "text", "text": "hi"}]"#;
        let children: Vec<ChildNode> = serde_json::from_str(json).unwrap();
        assert_eq!(children[0], ChildNode::Element { id: NodeId(3) });
        assert_eq!(
            children[1],
            ChildNode::Text {
                text: "hi".to_string()
            }
        );
    }
}
