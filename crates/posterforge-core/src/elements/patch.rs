//! Partial updates merged into elements by the property panel.

use super::{
    Background, Element, ElementKind, FontStyle, FontWeight, ObjectFit, SerializableColor,
    ShapeKind, TextAlign, TextDecoration,
};
use crate::geometry::normalize_rotation;
use serde::{Deserialize, Serialize};

/// Fields to merge into an element. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub rotation: Option<f64>,
    pub visible: Option<bool>,
    pub locked: Option<bool>,
    pub name: Option<String>,
    pub style: Option<StylePatch>,
}

/// Variant-specific partial update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StylePatch {
    Text(TextPatch),
    Shape(ShapePatch),
    Image(ImagePatch),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextPatch {
    pub content: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub font_style: Option<FontStyle>,
    pub color: Option<SerializableColor>,
    pub text_align: Option<TextAlign>,
    pub text_decoration: Option<TextDecoration>,
    pub background_color: Option<Background>,
    pub padding: Option<f64>,
    pub border_radius: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShapePatch {
    pub shape_kind: Option<ShapeKind>,
    pub fill_color: Option<SerializableColor>,
    pub border_color: Option<SerializableColor>,
    pub border_width: Option<f64>,
    pub border_radius: Option<f64>,
    pub opacity: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImagePatch {
    pub src: Option<String>,
    pub opacity: Option<f64>,
    pub object_fit: Option<ObjectFit>,
}

fn merge<T>(slot: &mut T, value: &Option<T>)
where
    T: Clone,
{
    if let Some(v) = value {
        *slot = v.clone();
    }
}

impl ElementPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn size(width: f64, height: f64) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn rotation(rotation: f64) -> Self {
        Self {
            rotation: Some(rotation),
            ..Self::default()
        }
    }

    pub fn locked(locked: bool) -> Self {
        Self {
            locked: Some(locked),
            ..Self::default()
        }
    }

    pub fn visible(visible: bool) -> Self {
        Self {
            visible: Some(visible),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: StylePatch) -> Self {
        self.style = Some(style);
        self
    }

    /// Merge into `element`. Returns false when the style patch targets a
    /// different variant; the common fields are applied regardless.
    pub fn apply_to(&self, element: &mut Element) -> bool {
        merge(&mut element.x, &self.x);
        merge(&mut element.y, &self.y);
        merge(&mut element.width, &self.width);
        merge(&mut element.height, &self.height);
        if let Some(rotation) = self.rotation {
            element.rotation = normalize_rotation(rotation);
        }
        merge(&mut element.visible, &self.visible);
        merge(&mut element.locked, &self.locked);
        merge(&mut element.name, &self.name);

        let Some(style) = &self.style else {
            return true;
        };
        match (&mut element.kind, style) {
            (ElementKind::Text(t), StylePatch::Text(p)) => {
                merge(&mut t.content, &p.content);
                merge(&mut t.font_family, &p.font_family);
                if let Some(size) = p.font_size {
                    t.font_size = size.max(1.0);
                }
                merge(&mut t.font_weight, &p.font_weight);
                merge(&mut t.font_style, &p.font_style);
                merge(&mut t.color, &p.color);
                merge(&mut t.text_align, &p.text_align);
                merge(&mut t.text_decoration, &p.text_decoration);
                merge(&mut t.background_color, &p.background_color);
                if let Some(padding) = p.padding {
                    t.padding = padding.max(0.0);
                }
                if let Some(radius) = p.border_radius {
                    t.border_radius = radius.max(0.0);
                }
                true
            }
            (ElementKind::Shape(s), StylePatch::Shape(p)) => {
                merge(&mut s.shape_kind, &p.shape_kind);
                merge(&mut s.fill_color, &p.fill_color);
                merge(&mut s.border_color, &p.border_color);
                if let Some(width) = p.border_width {
                    s.border_width = width.max(0.0);
                }
                if let Some(radius) = p.border_radius {
                    s.border_radius = radius.max(0.0);
                }
                if let Some(opacity) = p.opacity {
                    s.opacity = opacity.clamp(0.0, 1.0);
                }
                true
            }
            (ElementKind::Image(i), StylePatch::Image(p)) => {
                merge(&mut i.src, &p.src);
                merge(&mut i.object_fit, &p.object_fit);
                if let Some(opacity) = p.opacity {
                    i.opacity = opacity.clamp(0.0, 1.0);
                }
                true
            }
            _ => false,
        }
    }
}
