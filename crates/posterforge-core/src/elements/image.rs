//! Image element styling.

use serde::{Deserialize, Serialize};

/// How the image fills its element box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectFit {
    #[default]
    Cover,
    Contain,
}

impl ObjectFit {
    pub fn css(&self) -> &'static str {
        match self {
            ObjectFit::Cover => "cover",
            ObjectFit::Contain => "contain",
        }
    }
}

/// Styling carried by an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageStyle {
    /// Source reference: a URL or a `data:` URI.
    pub src: String,
    pub opacity: f64,
    pub object_fit: ObjectFit,
    /// Decoded pixel width of the source, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natural_width: Option<u32>,
    /// Decoded pixel height of the source, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub natural_height: Option<u32>,
}

impl ImageStyle {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    pub fn with_natural_size(mut self, width: u32, height: u32) -> Self {
        self.natural_width = Some(width);
        self.natural_height = Some(height);
        self
    }

    /// Width over height of the source, if known and non-degenerate.
    pub fn aspect_ratio(&self) -> Option<f64> {
        match (self.natural_width, self.natural_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(f64::from(w) / f64::from(h)),
            _ => None,
        }
    }
}

impl Default for ImageStyle {
    fn default() -> Self {
        Self {
            src: String::new(),
            opacity: 1.0,
            object_fit: ObjectFit::default(),
            natural_width: None,
            natural_height: None,
        }
    }
}
