use super::*;
use crate::classify::annotate_types;
use crate::document::{Rect, Viewport};
use crate::snapshot::{DocumentBuilder, StaticDocument};
use crate::visibility::annotate_visibility;

fn builder() -> (DocumentBuilder, NodeId) {
    let mut builder = DocumentBuilder::new(Viewport::new(1000.0, 800.0));
    let body = builder.root("body", Rect::from_xywh(0.0, 0.0, 1000.0, 800.0));
    (builder, body)
}

fn tree(doc: &StaticDocument) -> Option<ResultNode> {
    let mut ctx = AnalyzerContext::new(doc);
    annotate_visibility(&mut ctx).unwrap();
    annotate_types(&mut ctx).unwrap();
    build_result_tree(&ctx).unwrap()
}

fn find(root: &ResultNode, node: NodeId) -> Option<&ResultNode> {
    if root.node == node {
        return Some(root);
    }
    root.children.iter().find_map(|child| find(child, node))
}

#[test]
fn test_untyped_root_yields_none() {
    let (mut builder, body) = builder();
    builder.element(body, "div", Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
    let doc = builder.build().unwrap();

    assert!(tree(&doc).is_none());
}

#[test]
fn test_only_typed_children_kept() {
    let (mut builder, body) = builder();
    let empty = builder.element(body, "div", Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
    let para = builder.element(body, "p", Rect::from_xywh(0.0, 200.0, 300.0, 40.0));
    builder.text(para, "Hello");
    let doc = builder.build().unwrap();

    let root = tree(&doc).unwrap();
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].node, para);
    assert!(find(&root, empty).is_none());
    assert_eq!(root.signature, "body[p[]]");
}

#[test]
fn test_visible_overflow_grows_box() {
    let (mut builder, body) = builder();
    let wrapper = builder.element(body, "div", Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
    builder.element(wrapper, "button", Rect::from_xywh(50.0, 50.0, 200.0, 100.0));
    let doc = builder.build().unwrap();

    let root = tree(&doc).unwrap();
    let node = find(&root, wrapper).unwrap();
    assert_eq!(node.self_rect.rect(), Rect::new(0.0, 0.0, 100.0, 100.0));
    assert_eq!(node.rect.rect(), Rect::new(0.0, 0.0, 250.0, 150.0));
}

#[test]
fn test_hidden_overflow_keeps_own_box() {
    let (mut builder, body) = builder();
    let wrapper = builder.element(body, "div", Rect::from_xywh(0.0, 0.0, 100.0, 100.0));
    builder.style(wrapper).overflow = "hidden".to_string();
    let button = builder.element(wrapper, "button", Rect::from_xywh(50.0, 50.0, 200.0, 100.0));
    let doc = builder.build().unwrap();

    let root = tree(&doc).unwrap();
    let node = find(&root, wrapper).unwrap();
    assert_eq!(node.rect.rect(), Rect::new(0.0, 0.0, 100.0, 100.0));
    // The child was clipped to the wrapper.
    let child = find(&root, button).unwrap();
    assert_eq!(child.rect.rect(), Rect::new(50.0, 50.0, 100.0, 100.0));
}

#[test]
fn test_text_sources_by_type() {
    let (mut builder, body) = builder();

    let img = builder.element(body, "img", Rect::from_xywh(0.0, 0.0, 40.0, 40.0));
    builder.attributes(img).alt = Some("logo".to_string());

    let submit = builder.element(body, "input", Rect::from_xywh(0.0, 100.0, 80.0, 30.0));
    builder.attributes(submit).input_type = Some("submit".to_string());
    builder.attributes(submit).value = Some("Go".to_string());

    let search = builder.element(body, "input", Rect::from_xywh(0.0, 200.0, 200.0, 30.0));
    builder.attributes(search).placeholder = Some("Search".to_string());
    builder.attributes(search).value = Some("rust".to_string());

    let select = builder.element(body, "select", Rect::from_xywh(0.0, 300.0, 200.0, 30.0));
    builder.attributes(select).options = vec!["A".to_string(), "B".to_string()];
    builder.attributes(select).selected_index = Some(1);

    let unselected = builder.element(body, "select", Rect::from_xywh(300.0, 300.0, 200.0, 30.0));
    builder.attributes(unselected).options = vec!["A".to_string()];
    builder.attributes(unselected).selected_index = Some(-1);

    let button = builder.element(body, "button", Rect::from_xywh(0.0, 400.0, 200.0, 30.0));
    builder.text(button, "  Buy \n\n  now ");

    let doc = builder.build().unwrap();
    let root = tree(&doc).unwrap();

    let text = |node| find(&root, node).unwrap().text.clone();
    assert_eq!(text(img), "logo");
    assert_eq!(text(submit), "Go");
    assert_eq!(text(search), "Searchrust");
    assert_eq!(text(select), "B");
    assert_eq!(text(unselected), "");
    assert_eq!(text(button), "Buy now");
}

#[test]
fn test_untyped_container_joins_child_texts() {
    let (mut builder, body) = builder();
    let group = builder.element(body, "div", Rect::from_xywh(0.0, 0.0, 400.0, 40.0));
    let one = builder.element(group, "button", Rect::from_xywh(0.0, 0.0, 100.0, 40.0));
    builder.text(one, "One");
    builder.element(group, "button", Rect::from_xywh(120.0, 0.0, 100.0, 40.0));
    let three = builder.element(group, "button", Rect::from_xywh(240.0, 0.0, 100.0, 40.0));
    builder.text(three, "Three");
    let doc = builder.build().unwrap();

    let root = tree(&doc).unwrap();
    let node = find(&root, group).unwrap();
    assert!(node.self_types.is_empty());
    assert_eq!(node.children.len(), 3);
    assert_eq!(node.text, "One\nThree");
}

#[test]
fn test_text_truncated() {
    let (mut builder, body) = builder();
    let para = builder.element(body, "p", Rect::from_xywh(0.0, 0.0, 800.0, 400.0));
    let long = "ä".repeat(1500);
    builder.text(para, &long);
    let doc = builder.build().unwrap();

    let root = tree(&doc).unwrap();
    let node = find(&root, para).unwrap();
    assert_eq!(node.text.chars().count(), MAX_TEXT_CHARS);
}

#[test]
fn test_aria_label_and_title_copied() {
    let (mut builder, body) = builder();
    let button = builder.element(body, "button", Rect::from_xywh(0.0, 0.0, 100.0, 40.0));
    builder.attributes(button).aria_label = Some("Close dialog".to_string());
    builder.attributes(button).title = Some("Close".to_string());
    let doc = builder.build().unwrap();

    let root = tree(&doc).unwrap();
    let node = find(&root, button).unwrap();
    assert_eq!(node.aria_label, "Close dialog");
    assert_eq!(node.title, "Close");
    assert_eq!(root.aria_label, "");
}

#[test]
fn test_collapse_whitespace() {
    assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
    assert_eq!(collapse_whitespace(""), "");
}
