//! Design element definitions.

mod image;
mod patch;
mod shape;
mod text;

pub use image::{ImageStyle, ObjectFit};
pub use patch::{ElementPatch, ImagePatch, ShapePatch, StylePatch, TextPatch};
pub use shape::{ShapeKind, ShapeStyle};
pub use text::{FontStyle, FontWeight, TextAlign, TextDecoration, TextStyle};

use crate::geometry::{Geometry, normalize_rotation};
use kurbo::{Affine, BezPath, Point, Rect, RoundedRect, Shape as KurboShape};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for elements.
pub type ElementId = Uuid;

/// Smallest width or height an element may have, in canvas units.
pub const MIN_ELEMENT_SIZE: f64 = 20.0;

/// Serializable color representation (RGBA8), stored as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.trim().strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, c) in out.iter_mut().zip(hex.chars()) {
                    let v = c.to_digit(16)? as u8;
                    *slot = v * 16 + v;
                }
                Some(Self::rgb(out[0], out[1], out[2]))
            }
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Lowercase hex form, alpha omitted when opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// CSS color value.
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            self.to_hex()
        } else {
            format!(
                "rgba({}, {}, {}, {})",
                self.r,
                self.g,
                self.b,
                format_number(f64::from(self.a) / 255.0)
            )
        }
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl TryFrom<String> for SerializableColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color: {value}"))
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A fill that is either a color or the `"transparent"` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Background {
    #[default]
    Transparent,
    Color(SerializableColor),
}

impl Background {
    pub const TRANSPARENT: &'static str = "transparent";

    pub fn is_transparent(&self) -> bool {
        matches!(self, Background::Transparent)
    }

    pub fn to_css(&self) -> String {
        match self {
            Background::Transparent => Self::TRANSPARENT.to_string(),
            Background::Color(c) => c.to_css(),
        }
    }
}

impl From<SerializableColor> for Background {
    fn from(color: SerializableColor) -> Self {
        Background::Color(color)
    }
}

impl TryFrom<String> for Background {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case(Self::TRANSPARENT) {
            Ok(Background::Transparent)
        } else {
            SerializableColor::try_from(value).map(Background::Color)
        }
    }
}

impl From<Background> for String {
    fn from(bg: Background) -> Self {
        match bg {
            Background::Transparent => Background::TRANSPARENT.to_string(),
            Background::Color(c) => c.to_hex(),
        }
    }
}

/// Variant-specific payload of an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    Text(TextStyle),
    Shape(ShapeStyle),
    Image(ImageStyle),
}

impl ElementKind {
    /// Lowercase variant name, as used in serialized documents.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text(_) => "text",
            ElementKind::Shape(_) => "shape",
            ElementKind::Image(_) => "image",
        }
    }
}

fn default_true() -> bool {
    true
}

/// A single positioned, styled object on the design canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub(crate) id: ElementId,
    /// Left edge in canvas space.
    pub x: f64,
    /// Top edge in canvas space.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees around the center, in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    /// Paint order key, unique within a document.
    pub z_index: i32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    /// Display label for the layers panel.
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create a new element with a fresh id. The z-index is assigned on insertion.
    pub fn new(kind: ElementKind, geometry: Geometry) -> Self {
        let name = match &kind {
            ElementKind::Text(_) => "Text".to_string(),
            ElementKind::Shape(s) => s.shape_kind.display_name().to_string(),
            ElementKind::Image(_) => "Image".to_string(),
        };
        Self {
            id: Uuid::new_v4(),
            x: geometry.x,
            y: geometry.y,
            width: geometry.width,
            height: geometry.height,
            rotation: 0.0,
            z_index: 0,
            visible: true,
            locked: false,
            name,
            kind,
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Give this element a new unique identifier (used when duplicating).
    pub fn regenerate_id(&mut self) {
        self.id = Uuid::new_v4();
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = normalize_rotation(degrees);
        self
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.x = geometry.x;
        self.y = geometry.y;
        self.width = geometry.width;
        self.height = geometry.height;
    }

    /// Axis-aligned box in canvas space, ignoring rotation.
    pub fn bounds(&self) -> Rect {
        self.geometry().rect()
    }

    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// Transform from element-local space (origin at top-left, unrotated) to canvas space.
    pub fn transform(&self) -> Affine {
        let center = self.center();
        Affine::translate(center.to_vec2())
            * Affine::rotate(self.rotation.to_radians())
            * Affine::translate((-self.width / 2.0, -self.height / 2.0))
    }

    /// Outline in element-local space.
    pub fn outline(&self) -> BezPath {
        let local = Rect::new(0.0, 0.0, self.width, self.height);
        match &self.kind {
            ElementKind::Shape(style) => style.outline(local),
            ElementKind::Text(style) if style.border_radius > 0.0 => {
                RoundedRect::from_rect(local, style.border_radius).to_path(0.1)
            }
            _ => local.to_path(0.1),
        }
    }

    /// Check if a canvas-space point hits the element's visible outline.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let local = self.transform().inverse() * point;
        let local_rect = Rect::new(0.0, 0.0, self.width, self.height);
        if !local_rect.inflate(tolerance, tolerance).contains(local) {
            return false;
        }
        match &self.kind {
            ElementKind::Shape(_) if tolerance <= 0.0 => self.outline().contains(local),
            _ => true,
        }
    }

    pub fn as_text(&self) -> Option<&TextStyle> {
        match &self.kind {
            ElementKind::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_shape(&self) -> Option<&ShapeStyle> {
        match &self.kind {
            ElementKind::Shape(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageStyle> {
        match &self.kind {
            ElementKind::Image(i) => Some(i),
            _ => None,
        }
    }
}

/// Format a number for CSS/markup output: integers without a fraction,
/// otherwise up to three decimals with trailing zeros trimmed.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        let s = format!("{rounded:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_element() -> Element {
        Element::new(
            ElementKind::Text(TextStyle::default()),
            Geometry::new(100.0, 100.0, 200.0, 50.0),
        )
    }

    #[test]
    fn test_color_hex_parsing() {
        assert_eq!(SerializableColor::from_hex("#fff"), Some(SerializableColor::white()));
        assert_eq!(
            SerializableColor::from_hex("#FF8000"),
            Some(SerializableColor::rgb(255, 128, 0))
        );
        assert_eq!(
            SerializableColor::from_hex("#00000080"),
            Some(SerializableColor::new(0, 0, 0, 128))
        );
        assert_eq!(SerializableColor::from_hex("red"), None);
        assert_eq!(SerializableColor::from_hex("#12345"), None);
    }

    #[test]
    fn test_color_css() {
        assert_eq!(SerializableColor::rgb(255, 0, 0).to_css(), "#ff0000");
        assert_eq!(SerializableColor::new(0, 0, 0, 0).to_css(), "rgba(0, 0, 0, 0)");
    }

    #[test]
    fn test_peniko_conversion() {
        let color: Color = SerializableColor::rgb(10, 20, 30).into();
        let back: SerializableColor = color.into();
        assert_eq!(back, SerializableColor::rgb(10, 20, 30));
    }

    #[test]
    fn test_background_sentinel() {
        let bg: Background = serde_json::from_str("\"transparent\"").unwrap();
        assert!(bg.is_transparent());
        let bg: Background = serde_json::from_str("\"#ffffff\"").unwrap();
        assert_eq!(bg, Background::Color(SerializableColor::white()));
        assert_eq!(serde_json::to_string(&Background::Transparent).unwrap(), "\"transparent\"");
    }

    #[test]
    fn test_element_serialization_shape() {
        let element = text_element();
        let json = serde_json::to_value(&element).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["zIndex"], 0);
        assert_eq!(json["width"], 200.0);
        let back: Element = serde_json::from_value(json).unwrap();
        assert_eq!(back, element);
    }

    #[test]
    fn test_hit_test_unrotated() {
        let element = text_element();
        assert!(element.hit_test(Point::new(150.0, 120.0), 0.0));
        assert!(!element.hit_test(Point::new(50.0, 120.0), 0.0));
        assert!(element.hit_test(Point::new(95.0, 120.0), 10.0));
    }

    #[test]
    fn test_hit_test_rotated() {
        let element = text_element().with_rotation(90.0);
        // Center stays at (200, 125); rotated box spans x 175..225, y 25..225.
        assert!(element.hit_test(Point::new(200.0, 40.0), 0.0));
        assert!(!element.hit_test(Point::new(120.0, 125.0), 0.0));
    }

    #[test]
    fn test_hit_test_circle_corner_misses() {
        let element = Element::new(
            ElementKind::Shape(ShapeStyle::new(ShapeKind::Circle)),
            Geometry::new(0.0, 0.0, 100.0, 100.0),
        );
        assert!(element.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!element.hit_test(Point::new(3.0, 3.0), 0.0));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(1.0 / 3.0), "0.333");
        assert_eq!(format_number(-20.0), "-20");
        assert_eq!(format_number(f64::NAN), "0");
    }
}
