//! Catalog of printable output sizes.

use serde::Serialize;

/// A named output size. Dimensions are canvas units, not print resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SizePreset {
    pub id: &'static str,
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

const PRESETS: &[SizePreset] = &[
    SizePreset { id: "poster-24x36", label: "Poster 24×36 in", width: 600, height: 900 },
    SizePreset { id: "poster-18x24", label: "Poster 18×24 in", width: 600, height: 800 },
    SizePreset { id: "poster-11x17", label: "Poster 11×17 in", width: 550, height: 850 },
    SizePreset { id: "flyer-letter", label: "Flyer 8.5×11 in", width: 612, height: 792 },
    SizePreset { id: "a4", label: "A4", width: 595, height: 842 },
    SizePreset { id: "square", label: "Square print / post", width: 800, height: 800 },
    SizePreset { id: "story", label: "Story 9:16", width: 540, height: 960 },
    SizePreset { id: "landscape", label: "Landscape 3:2", width: 900, height: 600 },
];

impl SizePreset {
    /// Every preset, in display order.
    pub fn all() -> &'static [SizePreset] {
        PRESETS
    }

    pub fn find(id: &str) -> Option<&'static SizePreset> {
        PRESETS.iter().find(|p| p.id == id)
    }

    /// The size a fresh document opens with.
    pub fn default_preset() -> &'static SizePreset {
        &PRESETS[0]
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}
