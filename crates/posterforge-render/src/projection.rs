//! Document to visual tree projection.
//!
//! Both renderers consume the same [`Projection`], and every node's inline
//! styling comes from [`node_style`], so preview and export agree on boxes
//! and stacking by construction.

use kurbo::Rect;
use posterforge_core::elements::{
    Background, Element, ElementId, ElementKind, ImageStyle, ObjectFit, ShapeKind, ShapeStyle,
    TextStyle, format_number,
};
use posterforge_core::DesignDocument;

/// Ordered CSS declarations.
pub type Style = Vec<(&'static str, String)>;

/// What a node draws inside its box.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    Text(String),
    Shape(ShapeKind),
    Image { src: String, object_fit: ObjectFit },
}

/// One absolutely positioned box, in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualNode {
    pub element_id: ElementId,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in degrees about the box center.
    pub rotation: f64,
    pub z_index: i32,
    pub content: NodeContent,
    pub style: Style,
}

impl VisualNode {
    fn from_element(element: &Element) -> Self {
        let content = match &element.kind {
            ElementKind::Text(text) => NodeContent::Text(text.content.clone()),
            ElementKind::Shape(shape) => NodeContent::Shape(shape.shape_kind),
            ElementKind::Image(image) => NodeContent::Image {
                src: image.src.clone(),
                object_fit: image.object_fit,
            },
        };
        Self {
            element_id: element.id(),
            left: element.x,
            top: element.y,
            width: element.width,
            height: element.height,
            rotation: element.rotation,
            z_index: element.z_index,
            content,
            style: node_style(element),
        }
    }

    /// Unrotated box.
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }

    /// The node's declarations as an inline `style` value.
    pub fn style_attr(&self) -> String {
        style_string(&self.style)
    }
}

/// The visual tree of a document: canvas box plus one node per visible
/// element, in ascending z order.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub width: f64,
    pub height: f64,
    pub background: Background,
    pub background_image: Option<String>,
    pub nodes: Vec<VisualNode>,
}

impl Projection {
    pub fn node(&self, id: ElementId) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.element_id == id)
    }

    /// Declarations for the canvas container. The container isolates its
    /// children so negative z-indices still paint above its background.
    pub fn canvas_style(&self) -> Style {
        let mut style: Style = vec![
            ("position", "relative".into()),
            ("isolation", "isolate".into()),
            ("width", px(self.width)),
            ("height", px(self.height)),
            ("overflow", "hidden".into()),
            ("background-color", self.background.to_css()),
        ];
        if let Some(src) = &self.background_image {
            style.push(("background-image", format!("url(\"{}\")", css_string(src))));
            style.push(("background-size", "cover".into()));
            style.push(("background-position", "center".into()));
        }
        style
    }
}

/// Project a document into its visual tree.
pub fn project(document: &DesignDocument) -> Projection {
    let nodes: Vec<VisualNode> = document
        .elements_by_z()
        .into_iter()
        .filter(|e| e.visible)
        .map(VisualNode::from_element)
        .collect();
    log::debug!("projected {} of {} element(s)", nodes.len(), document.len());
    Projection {
        width: f64::from(document.canvas_width()),
        height: f64::from(document.canvas_height()),
        background: document.background_color(),
        background_image: document.background_image().map(str::to_string),
        nodes,
    }
}

/// Inline styling of one element: box, rotation and stacking first, then the
/// variant's presentation.
pub fn node_style(element: &Element) -> Style {
    let mut style: Style = vec![
        ("position", "absolute".into()),
        ("left", px(element.x)),
        ("top", px(element.y)),
        ("width", px(element.width)),
        ("height", px(element.height)),
        ("z-index", element.z_index.to_string()),
        ("box-sizing", "border-box".into()),
    ];
    if element.rotation != 0.0 {
        style.push(("transform", format!("rotate({}deg)", format_number(element.rotation))));
        style.push(("transform-origin", "center center".into()));
    }
    match &element.kind {
        ElementKind::Text(text) => text_style(text, &mut style),
        ElementKind::Shape(shape) => shape_style(shape, &mut style),
        ElementKind::Image(image) => image_style(image, &mut style),
    }
    style
}

fn text_style(text: &TextStyle, style: &mut Style) {
    style.extend([
        ("display", "flex".into()),
        ("align-items", "center".into()),
        ("justify-content", text.text_align.justify().into()),
        ("text-align", text.text_align.css().into()),
        ("font-family", font_family(&text.font_family)),
        ("font-size", px(text.font_size)),
        ("font-weight", text.font_weight.css().into()),
        ("font-style", text.font_style.css().into()),
        ("color", text.color.to_css()),
        ("text-decoration", text.text_decoration.css().into()),
        ("background-color", text.background_color.to_css()),
        ("padding", px(text.padding)),
        ("border-radius", px(text.border_radius)),
        ("white-space", "pre-wrap".into()),
        ("overflow-wrap", "break-word".into()),
        ("overflow", "hidden".into()),
    ]);
}

fn shape_style(shape: &ShapeStyle, style: &mut Style) {
    style.push(("background-color", shape.fill_color.to_css()));
    if shape.border_width > 0.0 {
        style.push((
            "border",
            format!("{} solid {}", px(shape.border_width), shape.border_color.to_css()),
        ));
    }
    match shape.shape_kind {
        ShapeKind::Circle => style.push(("border-radius", "50%".into())),
        ShapeKind::Rectangle => style.push(("border-radius", px(shape.effective_radius()))),
        kind => {
            if let Some(points) = kind.polygon() {
                style.push(("clip-path", clip_polygon(points)));
            }
        }
    }
    style.push(("opacity", format_number(shape.opacity)));
}

fn image_style(image: &ImageStyle, style: &mut Style) {
    style.push(("overflow", "hidden".into()));
    style.push(("opacity", format_number(image.opacity)));
}

/// `clip-path` value for fractional polygon vertices.
fn clip_polygon(points: &[(f64, f64)]) -> String {
    let coords: Vec<String> = points
        .iter()
        .map(|&(x, y)| format!("{}% {}%", format_number(x * 100.0), format_number(y * 100.0)))
        .collect();
    format!("polygon({})", coords.join(", "))
}

fn font_family(family: &str) -> String {
    let family = family.trim();
    if family.is_empty() {
        return "sans-serif".into();
    }
    format!("\"{}\", sans-serif", css_string(family))
}

pub(crate) fn px(value: f64) -> String {
    format!("{}px", format_number(value))
}

/// Strip characters that would terminate a quoted CSS string.
fn css_string(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '"' | '\\' | '\n' | '\r')).collect()
}

/// Join declarations into a `style` attribute value.
pub fn style_string(style: &[(&'static str, String)]) -> String {
    style
        .iter()
        .map(|(prop, value)| format!("{prop}: {value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use posterforge_core::elements::ElementPatch;
    use posterforge_core::ToolKind;

    fn value<'a>(style: &'a Style, prop: &str) -> Option<&'a str> {
        style.iter().find(|(p, _)| *p == prop).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_project_orders_by_z_and_skips_hidden() {
        let mut doc = DesignDocument::new(600, 900, "poster-24x36");
        let a = doc.add_element(ToolKind::Text);
        let b = doc.add_element(ToolKind::Shape(ShapeKind::Circle));
        let c = doc.add_element(ToolKind::Shape(ShapeKind::Star));
        doc.update_element(b, &ElementPatch::visible(false));
        doc.send_to_back(c);

        let projection = project(&doc);
        let ids: Vec<_> = projection.nodes.iter().map(|n| n.element_id).collect();
        assert_eq!(ids, [c, a]);
        assert_eq!((projection.width, projection.height), (600.0, 900.0));
    }

    #[test]
    fn test_node_geometry_matches_element() {
        let mut doc = DesignDocument::new(600, 900, "poster-24x36");
        let id = doc.add_element(ToolKind::Text);
        doc.update_element(
            id,
            &ElementPatch { rotation: Some(30.0), ..ElementPatch::position(12.5, 40.0) },
        );
        let node = project(&doc).nodes.remove(0);
        assert_eq!(node.rect(), Rect::new(12.5, 40.0, 212.5, 90.0));
        assert_eq!(value(&node.style, "left"), Some("12.5px"));
        assert_eq!(value(&node.style, "transform"), Some("rotate(30deg)"));
        assert_eq!(node.content, NodeContent::Text("Your text here".into()));
    }

    #[test]
    fn test_shape_styles() {
        let mut doc = DesignDocument::new(600, 900, "poster-24x36");
        let circle = doc.add_element(ToolKind::Shape(ShapeKind::Circle));
        let triangle = doc.add_element(ToolKind::Shape(ShapeKind::Triangle));
        let rect = doc.add_element(ToolKind::Shape(ShapeKind::Rectangle));
        let projection = project(&doc);

        let circle = &projection.node(circle).unwrap().style;
        assert_eq!(value(circle, "border-radius"), Some("50%"));
        assert_eq!(value(circle, "clip-path"), None);

        let triangle = &projection.node(triangle).unwrap().style;
        assert_eq!(value(triangle, "clip-path"), Some("polygon(50% 0%, 100% 100%, 0% 100%)"));

        let rect = &projection.node(rect).unwrap().style;
        assert_eq!(value(rect, "background-color"), Some("#3b82f6"));
        assert!(value(rect, "transform").is_none());
    }

    #[test]
    fn test_canvas_style_background() {
        let mut doc = DesignDocument::new(600, 900, "poster-24x36");
        doc.set_background(Background::Transparent);
        doc.set_background_image(Some("bg\".png".into()));
        let style = project(&doc).canvas_style();
        assert_eq!(value(&style, "background-color"), Some("transparent"));
        assert_eq!(value(&style, "background-image"), Some("url(\"bg.png\")"));
        assert_eq!(value(&style, "isolation"), Some("isolate"));
    }

    #[test]
    fn test_style_string() {
        assert_eq!(
            style_string(&[("left", "1px".into()), ("top", "2px".into())]),
            "left: 1px; top: 2px"
        );
    }
}
