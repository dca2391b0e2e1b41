//! Shape element styling and outlines.

use super::SerializableColor;
use kurbo::{BezPath, Ellipse, Point, Rect, RoundedRect, Shape as KurboShape};
use serde::{Deserialize, Serialize};

/// Geometric primitive drawn by a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Circle,
    Triangle,
    Star,
    Hexagon,
}

const TRIANGLE: &[(f64, f64)] = &[(0.5, 0.0), (1.0, 1.0), (0.0, 1.0)];

const STAR: &[(f64, f64)] = &[
    (0.50, 0.00),
    (0.61, 0.35),
    (0.98, 0.35),
    (0.68, 0.57),
    (0.79, 0.91),
    (0.50, 0.70),
    (0.21, 0.91),
    (0.32, 0.57),
    (0.02, 0.35),
    (0.39, 0.35),
];

const HEXAGON: &[(f64, f64)] = &[
    (0.25, 0.0),
    (0.75, 0.0),
    (1.0, 0.5),
    (0.75, 1.0),
    (0.25, 1.0),
    (0.0, 0.5),
];

impl ShapeKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::Triangle => "Triangle",
            ShapeKind::Star => "Star",
            ShapeKind::Hexagon => "Hexagon",
        }
    }

    pub fn all() -> &'static [ShapeKind] {
        &[
            ShapeKind::Rectangle,
            ShapeKind::Circle,
            ShapeKind::Triangle,
            ShapeKind::Star,
            ShapeKind::Hexagon,
        ]
    }

    /// Polygon vertices as fractions of the bounding box, for polygonal kinds.
    pub fn polygon(&self) -> Option<&'static [(f64, f64)]> {
        match self {
            ShapeKind::Triangle => Some(TRIANGLE),
            ShapeKind::Star => Some(STAR),
            ShapeKind::Hexagon => Some(HEXAGON),
            ShapeKind::Rectangle | ShapeKind::Circle => None,
        }
    }

    /// Only rectangles honour a corner radius.
    pub fn supports_corner_radius(&self) -> bool {
        matches!(self, ShapeKind::Rectangle)
    }
}

/// Styling carried by a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapeStyle {
    pub shape_kind: ShapeKind,
    pub fill_color: SerializableColor,
    pub border_color: SerializableColor,
    pub border_width: f64,
    /// Corner radius, rectangles only.
    pub border_radius: f64,
    /// 0.0 = fully transparent, 1.0 = fully opaque.
    pub opacity: f64,
}

impl ShapeStyle {
    pub fn new(shape_kind: ShapeKind) -> Self {
        Self {
            shape_kind,
            ..Self::default()
        }
    }

    /// Corner radius that actually applies to this shape.
    pub fn effective_radius(&self) -> f64 {
        if self.shape_kind.supports_corner_radius() {
            self.border_radius.max(0.0)
        } else {
            0.0
        }
    }

    /// Outline of the shape filling `rect`.
    pub fn outline(&self, rect: Rect) -> BezPath {
        match self.shape_kind {
            ShapeKind::Rectangle => {
                let radius = self.effective_radius();
                if radius > 0.0 {
                    RoundedRect::from_rect(rect, radius).to_path(0.1)
                } else {
                    rect.to_path(0.1)
                }
            }
            ShapeKind::Circle => Ellipse::from_rect(rect).to_path(0.1),
            kind => {
                let mut path = BezPath::new();
                for (i, &(fx, fy)) in kind.polygon().unwrap_or_default().iter().enumerate() {
                    let p = Point::new(rect.x0 + fx * rect.width(), rect.y0 + fy * rect.height());
                    if i == 0 {
                        path.move_to(p);
                    } else {
                        path.line_to(p);
                    }
                }
                path.close_path();
                path
            }
        }
    }
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            shape_kind: ShapeKind::default(),
            fill_color: SerializableColor::rgb(59, 130, 246),
            border_color: SerializableColor::rgb(30, 64, 175),
            border_width: 0.0,
            border_radius: 0.0,
            opacity: 1.0,
        }
    }
}
