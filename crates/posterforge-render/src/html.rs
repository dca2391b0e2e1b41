//! HTML markup export.
//!
//! Serialises the projection into a self-contained fragment for export and
//! thumbnailing. Node declarations are the same ones the preview uses.

use crate::projection::{NodeContent, Projection, VisualNode, style_string};
use crate::renderer::{RenderContext, RenderResult, Renderer};
use std::fmt::Write;

/// Renders a document as an HTML fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer {
    /// Wrap the fragment in a minimal standalone page.
    pub standalone: bool,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standalone() -> Self {
        Self { standalone: true }
    }

    fn write_node(out: &mut String, node: &VisualNode) -> std::fmt::Result {
        write!(
            out,
            "  <div data-element-id=\"{}\" style=\"{}\">",
            node.element_id,
            escape_attr(&node.style_attr())
        )?;
        match &node.content {
            NodeContent::Text(text) => write!(out, "<span>{}</span>", escape_text(text))?,
            NodeContent::Shape(_) => {}
            NodeContent::Image { src, object_fit } => write!(
                out,
                "<img src=\"{}\" alt=\"\" style=\"display: block; \
                 width: 100%; height: 100%; object-fit: {}\">",
                escape_attr(src),
                object_fit.css()
            )?,
        }
        out.push_str("</div>\n");
        Ok(())
    }

    fn write_canvas(out: &mut String, projection: &Projection) -> std::fmt::Result {
        writeln!(
            out,
            "<div class=\"poster\" style=\"{}\">",
            escape_attr(&style_string(&projection.canvas_style()))
        )?;
        for node in &projection.nodes {
            Self::write_node(out, node)?;
        }
        out.push_str("</div>\n");
        Ok(())
    }
}

impl Renderer for HtmlRenderer {
    type Output = String;

    fn render(&self, ctx: &RenderContext) -> RenderResult<String> {
        let mut out = String::new();
        if self.standalone {
            out.push_str(
                "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"></head>\n\
                 <body style=\"margin: 0\">\n",
            );
        }
        Self::write_canvas(&mut out, &ctx.projection)?;
        if self.standalone {
            out.push_str("</body>\n</html>\n");
        }
        log::debug!(
            "exported {} node(s) as {} bytes of markup",
            ctx.projection.nodes.len(),
            out.len()
        );
        Ok(out)
    }
}

/// Escape text content.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Escape a double-quoted attribute value.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use posterforge_core::elements::{ElementPatch, ShapeKind, StylePatch, TextPatch};
    use posterforge_core::{DesignDocument, ToolKind};

    #[test]
    fn test_escaping() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
        assert_eq!(escape_attr("x\"y'z"), "x&quot;y&#39;z");
    }

    #[test]
    fn test_text_content_escaped() {
        let mut doc = DesignDocument::new(600, 900, "poster-24x36");
        let id = doc.add_element(ToolKind::Text);
        let patch = ElementPatch::default().with_style(StylePatch::Text(TextPatch {
            content: Some("<script>alert(1)</script>".into()),
            ..TextPatch::default()
        }));
        doc.update_element(id, &patch);

        let html = HtmlRenderer::new().render_document(&doc).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_markup_structure() {
        let mut doc = DesignDocument::new(600, 900, "poster-24x36");
        let shape = doc.add_element(ToolKind::Shape(ShapeKind::Hexagon));
        let image = doc.add_element(ToolKind::Image {
            src: "https://example.com/a.png".into(),
            natural_width: 400,
            natural_height: 200,
        });

        let html = HtmlRenderer::new().render_document(&doc).unwrap();
        assert!(html.starts_with(
            "<div class=\"poster\" style=\"position: relative; isolation: isolate; width: 600px"
        ));
        assert!(html.contains(&format!("data-element-id=\"{shape}\"")));
        assert!(html.contains("clip-path: polygon(25% 0%"));
        assert!(html.contains("<img src=\"https://example.com/a.png\""));
        let shape_at = html.find(&shape.to_string()).unwrap();
        let image_at = html.find(&image.to_string()).unwrap();
        assert!(shape_at < image_at);
    }

    #[test]
    fn test_standalone_page() {
        let doc = DesignDocument::new(600, 900, "poster-24x36");
        let html = HtmlRenderer::standalone().render_document(&doc).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
