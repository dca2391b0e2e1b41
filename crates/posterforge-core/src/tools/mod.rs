//! Editor tools and the default elements they create.

use crate::elements::{Element, ElementKind, ImageStyle, ShapeKind, ShapeStyle, TextStyle};
use crate::geometry::{Geometry, fit_centered};
use kurbo::Size;

/// Default top-left position of new text and shape elements.
pub const DEFAULT_POSITION: (f64, f64) = (100.0, 100.0);
/// Default size of a new text element.
pub const DEFAULT_TEXT_SIZE: (f64, f64) = (200.0, 50.0);
/// Default size of a new shape element.
pub const DEFAULT_SHAPE_SIZE: (f64, f64) = (100.0, 100.0);
/// Fraction of the canvas a newly added image may occupy.
pub const IMAGE_CANVAS_FRACTION: f64 = 0.8;

/// Tools that add elements to the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolKind {
    Text,
    Shape(ShapeKind),
    Image {
        src: String,
        natural_width: u32,
        natural_height: u32,
    },
}

impl ToolKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ToolKind::Text => "Text",
            ToolKind::Shape(kind) => kind.display_name(),
            ToolKind::Image { .. } => "Image",
        }
    }
}

/// Build the element a tool creates, with default geometry and styling.
pub fn default_element(tool: &ToolKind, canvas: Size) -> Element {
    let (x, y) = DEFAULT_POSITION;
    match tool {
        ToolKind::Text => {
            let (w, h) = DEFAULT_TEXT_SIZE;
            Element::new(ElementKind::Text(TextStyle::default()), Geometry::new(x, y, w, h))
        }
        ToolKind::Shape(kind) => {
            let (w, h) = DEFAULT_SHAPE_SIZE;
            Element::new(ElementKind::Shape(ShapeStyle::new(*kind)), Geometry::new(x, y, w, h))
        }
        ToolKind::Image {
            src,
            natural_width,
            natural_height,
        } => {
            let geometry = fit_centered(
                f64::from(*natural_width),
                f64::from(*natural_height),
                canvas,
                IMAGE_CANVAS_FRACTION,
            );
            let style =
                ImageStyle::new(src.clone()).with_natural_size(*natural_width, *natural_height);
            Element::new(ElementKind::Image(style), geometry)
        }
    }
}
