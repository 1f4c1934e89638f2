use super::*;
use crate::document::{Rect, Viewport};
use crate::snapshot::{DocumentBuilder, StaticDocument};
use crate::visibility::annotate_visibility;

fn builder() -> (DocumentBuilder, NodeId) {
    let mut builder = DocumentBuilder::new(Viewport::new(1000.0, 800.0));
    let body = builder.root("body", Rect::from_xywh(0.0, 0.0, 1000.0, 800.0));
    (builder, body)
}

fn classify(doc: &StaticDocument) -> AnalyzerContext<'_, StaticDocument> {
    let mut ctx = AnalyzerContext::new(doc);
    annotate_visibility(&mut ctx).unwrap();
    annotate_types(&mut ctx).unwrap();
    ctx
}

fn types(ctx: &AnalyzerContext<'_, StaticDocument>, node: NodeId) -> TypeSet {
    ctx.state(node).unwrap().types
}

fn own(ctx: &AnalyzerContext<'_, StaticDocument>, node: NodeId) -> TypeSet {
    ctx.state(node).unwrap().self_types
}

fn leaf(ctx: &AnalyzerContext<'_, StaticDocument>, node: NodeId) -> bool {
    ctx.state(node).unwrap().leaf
}

#[test]
fn test_image_type_by_shape() {
    let viewport = Viewport::new(1000.0, 800.0);
    let bbox = |w: f64, h: f64| BoundingBox::clamped(Rect::from_xywh(0.0, 0.0, w, h), viewport).unwrap();

    assert_eq!(image_type(TagKind::Img, &bbox(40.0, 40.0)), Some(TypeSet::ICON));
    assert_eq!(image_type(TagKind::Img, &bbox(40.0, 50.0)), Some(TypeSet::ICON));
    assert_eq!(image_type(TagKind::Image, &bbox(100.0, 40.0)), Some(TypeSet::IMAGE));
    assert_eq!(image_type(TagKind::Img, &bbox(60.0, 60.0)), Some(TypeSet::IMAGE));
    assert_eq!(image_type(TagKind::Svg, &bbox(500.0, 500.0)), Some(TypeSet::ICON));
    assert_eq!(image_type(TagKind::I, &bbox(10.0, 10.0)), Some(TypeSet::ICON));
    assert_eq!(image_type(TagKind::Canvas, &bbox(200.0, 100.0)), Some(TypeSet::IMAGE));
    assert_eq!(image_type(TagKind::Canvas, &bbox(50.0, 50.0)), Some(TypeSet::ICON));
    assert_eq!(image_type(TagKind::Div, &bbox(50.0, 50.0)), None);
}

#[test]
fn test_input_types() {
    assert_eq!(input_type(None), TypeSet::INPUT_BOX);
    assert_eq!(input_type(Some("search")), TypeSet::INPUT_BOX);
    assert_eq!(input_type(Some("submit")), TypeSet::BUTTON);
    assert_eq!(input_type(Some("FILE")), TypeSet::BUTTON);
    assert_eq!(input_type(Some("checkbox")), TypeSet::INTERACTIVE);
    assert_eq!(input_type(Some("range")), TypeSet::INTERACTIVE);
}

#[test]
fn test_display_none_contributes_nothing() {
    let (mut builder, body) = builder();
    let hidden = builder.element(body, "div", Rect::from_xywh(0.0, 0.0, 300.0, 300.0));
    builder.style(hidden).display = "none".to_string();
    let button = builder.element(hidden, "button", Rect::from_xywh(10.0, 10.0, 80.0, 30.0));
    builder.text(button, "Buy");
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert!(types(&ctx, hidden).is_empty());
    assert!(types(&ctx, body).is_empty());
    // Never visited, so the child keeps the default record.
    assert!(types(&ctx, button).is_empty());
}

#[test]
fn test_role_wins_over_tag() {
    let (mut builder, body) = builder();
    let link = builder.element(body, "a", Rect::from_xywh(0.0, 0.0, 100.0, 30.0));
    builder.attributes(link).href = Some("https://example.com/".to_string());
    builder.attributes(link).role = Some("button".to_string());
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert_eq!(own(&ctx, link), TypeSet::BUTTON);
    assert!(leaf(&ctx, link));
}

#[test]
fn test_anchor_without_destination_falls_back_to_cursor() {
    let (mut builder, body) = builder();
    let bare = builder.element(body, "a", Rect::from_xywh(0.0, 0.0, 100.0, 30.0));
    builder.attributes(bare).href = Some("   ".to_string());
    let pointer = builder.element(body, "a", Rect::from_xywh(0.0, 100.0, 100.0, 30.0));
    builder.style(pointer).cursor = "pointer".to_string();
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert!(own(&ctx, bare).is_empty());
    assert_eq!(own(&ctx, pointer), TypeSet::CLICKABLE);
}

#[test]
fn test_form_controls() {
    let (mut builder, body) = builder();
    let text = builder.element(body, "input", Rect::from_xywh(0.0, 0.0, 200.0, 30.0));
    let check = builder.element(body, "input", Rect::from_xywh(0.0, 50.0, 20.0, 20.0));
    builder.attributes(check).input_type = Some("checkbox".to_string());
    let select = builder.element(body, "select", Rect::from_xywh(0.0, 100.0, 200.0, 30.0));
    let area = builder.element(body, "textarea", Rect::from_xywh(0.0, 150.0, 200.0, 60.0));
    let video = builder.element(body, "video", Rect::from_xywh(300.0, 0.0, 400.0, 300.0));
    let details = builder.element(body, "details", Rect::from_xywh(0.0, 300.0, 200.0, 30.0));
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert_eq!(own(&ctx, text), TypeSet::INPUT_BOX);
    assert_eq!(own(&ctx, check), TypeSet::INTERACTIVE);
    assert_eq!(own(&ctx, select), TypeSet::SELECT_BOX);
    assert_eq!(own(&ctx, area), TypeSet::INPUT_BOX);
    assert_eq!(own(&ctx, video), TypeSet::VIDEO);
    assert_eq!(own(&ctx, details), TypeSet::INTERACTIVE);
}

#[test]
fn test_icon_font_drops_text() {
    let (mut builder, body) = builder();
    let icon = builder.element(body, "i", Rect::from_xywh(0.0, 0.0, 24.0, 24.0));
    builder.text(icon, "search");
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert_eq!(types(&ctx, icon), TypeSet::ICON);
    assert!(leaf(&ctx, icon));
}

#[test]
fn test_link_absorbs_icon_and_caption() {
    let (mut builder, body) = builder();
    let link = builder.element(body, "a", Rect::from_xywh(0.0, 0.0, 200.0, 40.0));
    builder.attributes(link).href = Some("https://example.com/".to_string());
    builder.element(link, "svg", Rect::from_xywh(0.0, 0.0, 40.0, 40.0));
    let caption = builder.element(link, "span", Rect::from_xywh(40.0, 0.0, 160.0, 40.0));
    builder.style(caption).cursor = "pointer".to_string();
    builder.text(caption, "Home");
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert_eq!(types(&ctx, link), TypeSet::HREF);
    assert!(leaf(&ctx, link));
}

#[test]
fn test_button_with_input_inside_is_not_leaf() {
    let (mut builder, body) = builder();
    let button = builder.element(body, "button", Rect::from_xywh(0.0, 0.0, 300.0, 40.0));
    builder.element(button, "input", Rect::from_xywh(10.0, 5.0, 200.0, 30.0));
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert_eq!(types(&ctx, button), TypeSet::BUTTON | TypeSet::INPUT_BOX);
    assert!(!leaf(&ctx, button));
}

#[test]
fn test_pre_with_code_is_code_leaf() {
    let (mut builder, body) = builder();
    let pre = builder.element(body, "pre", Rect::from_xywh(0.0, 0.0, 600.0, 200.0));
    builder.text(pre, "$ ");
    let code = builder.element(pre, "code", Rect::from_xywh(0.0, 0.0, 600.0, 200.0));
    builder.text(code, "cargo build");
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert_eq!(types(&ctx, code), TypeSet::CODE);
    assert_eq!(types(&ctx, pre), TypeSet::CODE);
    assert!(leaf(&ctx, pre));
}

#[test]
fn test_inline_run_becomes_text() {
    let (mut builder, body) = builder();
    let para = builder.element(body, "p", Rect::from_xywh(0.0, 0.0, 800.0, 60.0));
    builder.text(para, "See ");
    let link = builder.element(para, "a", Rect::from_xywh(40.0, 0.0, 60.0, 20.0));
    builder.attributes(link).href = Some("https://example.com/".to_string());
    builder.style(link).display = "inline".to_string();
    builder.text(link, "docs");
    let code = builder.element(para, "code", Rect::from_xywh(120.0, 0.0, 60.0, 20.0));
    builder.style(code).display = "inline".to_string();
    builder.text(code, "main.rs");
    builder.text_rects(
        para,
        vec![
            Rect::from_xywh(0.0, 0.0, 300.0, 20.0),
            Rect::from_xywh(0.0, 20.0, 120.0, 20.0),
        ],
    );
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    let state = ctx.state(para).unwrap();
    assert_eq!(state.self_types, TypeSet::TEXT);
    assert_eq!(state.types, TypeSet::TEXT);
    assert!(state.leaf);
    assert_eq!(state.self_rect_visible.rect(), Rect::new(0.0, 0.0, 300.0, 40.0));
}

#[test]
fn test_block_child_prevents_text_leaf() {
    let (mut builder, body) = builder();
    let outer = builder.element(body, "div", Rect::from_xywh(0.0, 0.0, 800.0, 100.0));
    builder.text(outer, "Intro");
    let inner = builder.element(outer, "p", Rect::from_xywh(0.0, 50.0, 800.0, 50.0));
    builder.text(inner, "Body");
    builder.text_rects(outer, vec![Rect::from_xywh(0.0, 0.0, 200.0, 100.0)]);
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert!(leaf(&ctx, inner));
    assert_eq!(own(&ctx, inner), TypeSet::TEXT);

    let state = ctx.state(outer).unwrap();
    assert!(!state.leaf);
    assert!(state.self_types.is_empty());
    assert_eq!(state.types, TypeSet::TEXT);
    // Pure text still reports the text-run box.
    assert_eq!(state.self_rect_visible.rect(), Rect::new(0.0, 0.0, 200.0, 100.0));
}

#[test]
fn test_whitespace_text_is_not_text() {
    let (mut builder, body) = builder();
    let div = builder.element(body, "div", Rect::from_xywh(0.0, 0.0, 200.0, 100.0));
    builder.text(div, "  \n\t ");
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    assert!(types(&ctx, div).is_empty());
    assert!(!leaf(&ctx, div));
}

#[test]
fn test_text_rect_without_area_keeps_layout_box() {
    let (mut builder, body) = builder();
    let span = builder.element(body, "span", Rect::from_xywh(10.0, 10.0, 100.0, 20.0));
    builder.text(span, "Hello");
    builder.text_rects(span, vec![Rect::from_xywh(2000.0, 10.0, 50.0, 20.0)]);
    let doc = builder.build().unwrap();

    let ctx = classify(&doc);
    let state = ctx.state(span).unwrap();
    assert_eq!(state.types, TypeSet::TEXT);
    assert_eq!(state.self_rect_visible.rect(), Rect::new(10.0, 10.0, 110.0, 30.0));
}
