//! The preview and the exported markup must agree on every box and on
//! stacking order.

use posterforge_core::elements::{ElementPatch, ShapeKind};
use posterforge_core::{DesignDocument, TemplateRecord, ToolKind};
use posterforge_render::{HtmlRenderer, PreviewRenderer, Renderer, escape_attr, style_string};

fn sample_document() -> DesignDocument {
    let mut doc = DesignDocument::new(600, 900, "poster-24x36");
    let title = doc.add_element(ToolKind::Text);
    doc.update_element(
        title,
        &ElementPatch {
            rotation: Some(12.5),
            ..ElementPatch::position(40.0, 60.0)
        },
    );
    for kind in ShapeKind::all() {
        doc.add_element(ToolKind::Shape(*kind));
    }
    let hidden = doc.add_element(ToolKind::Shape(ShapeKind::Circle));
    doc.update_element(hidden, &ElementPatch::visible(false));
    doc.add_element(ToolKind::Image {
        src: "data:image/png;base64,AAAA".into(),
        natural_width: 1200,
        natural_height: 800,
    });
    doc.send_to_back(title);
    doc
}

#[test]
fn markup_reproduces_preview_boxes() {
    let doc = sample_document();
    let tree = PreviewRenderer::new(450.0).unwrap().render_document(&doc).unwrap();
    let html = HtmlRenderer::new().render_document(&doc).unwrap();

    assert_eq!(tree.projection.nodes.len(), doc.len() - 1);
    for node in &tree.projection.nodes {
        let needle = format!(
            "data-element-id=\"{}\" style=\"{}\"",
            node.element_id,
            escape_attr(&node.style_attr())
        );
        assert!(html.contains(&needle), "missing node {}", node.element_id);
    }
}

#[test]
fn markup_preserves_stacking_order() {
    let doc = sample_document();
    let tree = PreviewRenderer::default().render_document(&doc).unwrap();
    let html = HtmlRenderer::new().render_document(&doc).unwrap();

    let positions: Vec<usize> = tree
        .projection
        .nodes
        .iter()
        .map(|n| html.find(&n.element_id.to_string()).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));

    let z: Vec<i32> = tree.projection.nodes.iter().map(|n| n.z_index).collect();
    assert!(z.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn hidden_elements_are_skipped_everywhere() {
    let doc = sample_document();
    let hidden: Vec<_> = doc.elements().iter().filter(|e| !e.visible).map(|e| e.id()).collect();
    let tree = PreviewRenderer::default().render_document(&doc).unwrap();
    let html = HtmlRenderer::new().render_document(&doc).unwrap();
    for id in hidden {
        assert!(tree.projection.node(id).is_none());
        assert!(!html.contains(&id.to_string()));
    }
}

#[test]
fn template_json_renders_after_boundary_pass() {
    let json = serde_json::json!({
        "id": "t1",
        "userId": "u1",
        "name": "Spill",
        "elements": [{
            "id": "6f1c1f8e-3a1b-4c8e-9f00-000000000001",
            "type": "shape",
            "shapeKind": "rectangle",
            "x": 580.0,
            "y": -30.0,
            "width": 100.0,
            "height": 100.0,
            "zIndex": 3
        }],
        "backgroundColor": "#fafafa",
        "canvasWidth": 600,
        "canvasHeight": 900,
        "currentSize": "poster-24x36"
    });
    let record = TemplateRecord::from_json(&json.to_string()).unwrap();
    let doc = record.to_document();
    let html = HtmlRenderer::new().render_document(&doc).unwrap();
    assert!(html.contains("left: 500px; top: 0px; width: 100px; height: 100px"));
    assert!(html.contains("background-color: #fafafa"));
}

#[test]
fn negative_z_paints_above_canvas_background() {
    let mut doc = sample_document();
    let top = doc.elements_by_z().last().unwrap().id();
    assert!(doc.send_to_back(top));
    let tree = PreviewRenderer::default().render_document(&doc).unwrap();
    let html = HtmlRenderer::new().render_document(&doc).unwrap();
    assert!(tree.projection.node(top).unwrap().z_index < 0);
    assert_eq!(tree.projection.nodes[0].element_id, top);

    let canvas_tag = html.lines().next().unwrap();
    assert!(canvas_tag.starts_with("<div class=\"poster\""));
    assert!(canvas_tag.contains("isolation: isolate"), "{canvas_tag}");

    let preview_canvas = style_string(&tree.canvas_style());
    assert!(preview_canvas.contains("isolation: isolate"));
}
