//! On-screen preview renderer.
//!
//! The preview shows the projected tree inside a fixed-height viewport. A
//! single uniform scale maps document units to screen pixels; the document
//! coordinates themselves never change.

use crate::projection::{Projection, Style, px};
use crate::renderer::{DEFAULT_PREVIEW_HEIGHT, RenderContext, RenderResult, Renderer, RendererError};
use kurbo::{Point, Size};
use posterforge_core::elements::{ElementId, format_number};
use posterforge_core::selection::{Handle, get_handles};

/// Selection decoration for the selected element.
#[derive(Debug, Clone)]
pub struct SelectionOverlay {
    pub element_id: ElementId,
    /// Whether handles are drawn as inactive (locked element).
    pub locked: bool,
    /// Handles in document coordinates.
    pub handles: Vec<Handle>,
}

/// Output of the preview renderer.
#[derive(Debug, Clone)]
pub struct PreviewTree {
    pub projection: Projection,
    /// `preview_height / canvas_height`.
    pub scale: f64,
    pub selection: Option<SelectionOverlay>,
}

impl PreviewTree {
    /// On-screen size of the scaled canvas.
    pub fn viewport(&self) -> Size {
        Size::new(self.projection.width * self.scale, self.projection.height * self.scale)
    }

    /// Map a screen point inside the viewport to document coordinates.
    pub fn to_document(&self, screen: Point) -> Point {
        Point::new(screen.x / self.scale, screen.y / self.scale)
    }

    pub fn to_screen(&self, document: Point) -> Point {
        Point::new(document.x * self.scale, document.y * self.scale)
    }

    /// Declarations for the scaled wrapper around the canvas container.
    pub fn wrapper_style(&self) -> Style {
        let viewport = self.viewport();
        vec![
            ("width", px(viewport.width)),
            ("height", px(viewport.height)),
            ("overflow", "hidden".into()),
        ]
    }

    /// Declarations for the canvas container: the projection's canvas box
    /// plus the uniform preview scale.
    pub fn canvas_style(&self) -> Style {
        let mut style = self.projection.canvas_style();
        style.push(("transform", format!("scale({})", format_number(self.scale))));
        style.push(("transform-origin", "top left".into()));
        style
    }
}

/// Renders the interactive, scaled preview tree.
#[derive(Debug, Clone, Copy)]
pub struct PreviewRenderer {
    preview_height: f64,
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self {
            preview_height: DEFAULT_PREVIEW_HEIGHT,
        }
    }
}

impl PreviewRenderer {
    pub fn new(preview_height: f64) -> RenderResult<Self> {
        if preview_height.is_nan() || preview_height <= 0.0 {
            return Err(RendererError::InvalidPreviewHeight(preview_height));
        }
        Ok(Self { preview_height })
    }

    pub fn preview_height(&self) -> f64 {
        self.preview_height
    }
}

impl Renderer for PreviewRenderer {
    type Output = PreviewTree;

    fn render(&self, ctx: &RenderContext) -> RenderResult<PreviewTree> {
        let projection = ctx.projection.clone();
        let scale = self.preview_height / projection.height;
        let selection = ctx
            .selected
            .and_then(|id| ctx.document.element(id))
            .filter(|e| e.visible)
            .map(|e| SelectionOverlay {
                element_id: e.id(),
                locked: e.locked,
                handles: get_handles(e),
            });
        Ok(PreviewTree {
            projection,
            scale,
            selection,
        })
    }
}
