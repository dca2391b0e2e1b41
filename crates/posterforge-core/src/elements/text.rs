//! Text element styling.

use super::{Background, SerializableColor};
use serde::{Deserialize, Serialize};

/// Font weight options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS `font-weight` value.
    pub fn css(&self) -> &'static str {
        match self {
            FontWeight::Light => "300",
            FontWeight::Normal => "400",
            FontWeight::Bold => "700",
        }
    }

    /// Get display name for UI.
    pub fn display_name(&self) -> &'static str {
        match self {
            FontWeight::Light => "Light",
            FontWeight::Normal => "Regular",
            FontWeight::Bold => "Bold",
        }
    }

    pub fn all() -> &'static [FontWeight] {
        &[FontWeight::Light, FontWeight::Normal, FontWeight::Bold]
    }
}

/// Font style options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    pub fn css(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub fn css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }

    /// Flexbox `justify-content` value that matches this alignment.
    pub fn justify(&self) -> &'static str {
        match self {
            TextAlign::Left => "flex-start",
            TextAlign::Center => "center",
            TextAlign::Right => "flex-end",
        }
    }
}

/// Text decoration line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

impl TextDecoration {
    pub fn css(&self) -> &'static str {
        match self {
            TextDecoration::None => "none",
            TextDecoration::Underline => "underline",
            TextDecoration::LineThrough => "line-through",
        }
    }
}

/// Styling carried by a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    pub content: String,
    pub font_family: String,
    /// Font size in canvas units.
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub color: SerializableColor,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
    pub background_color: Background,
    pub padding: f64,
    pub border_radius: f64,
}

impl TextStyle {
    pub const DEFAULT_CONTENT: &'static str = "Your text here";
    pub const DEFAULT_FONT_FAMILY: &'static str = "Inter";
    pub const DEFAULT_FONT_SIZE: f64 = 24.0;

    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: Self::DEFAULT_CONTENT.to_string(),
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            font_size: Self::DEFAULT_FONT_SIZE,
            font_weight: FontWeight::default(),
            font_style: FontStyle::default(),
            color: SerializableColor::black(),
            text_align: TextAlign::default(),
            text_decoration: TextDecoration::default(),
            background_color: Background::Transparent,
            padding: 8.0,
            border_radius: 0.0,
        }
    }
}
