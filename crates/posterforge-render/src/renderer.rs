//! Renderer trait abstraction.

use crate::projection::{Projection, project};
use posterforge_core::{DesignDocument, ElementId};
use thiserror::Error;

/// Default fixed height of the on-screen preview viewport.
pub const DEFAULT_PREVIEW_HEIGHT: f64 = 600.0;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Preview height must be positive, got {0}")]
    InvalidPreviewHeight(f64),
    #[error("Render failed: {0}")]
    RenderFailed(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Everything a renderer needs for one pass over a document.
pub struct RenderContext<'a> {
    pub document: &'a DesignDocument,
    /// The visual tree derived from `document`.
    pub projection: Projection,
    /// Element to decorate with selection handles, if any.
    pub selected: Option<ElementId>,
}

impl<'a> RenderContext<'a> {
    pub fn new(document: &'a DesignDocument) -> Self {
        Self {
            document,
            projection: project(document),
            selected: document.selected_element_id(),
        }
    }

    /// Render without selection decoration (export, thumbnails).
    pub fn without_selection(mut self) -> Self {
        self.selected = None;
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer: Send + Sync {
    type Output;

    /// Render one pass over the context.
    fn render(&self, ctx: &RenderContext) -> RenderResult<Self::Output>;

    /// Project and render a document in one call.
    fn render_document(&self, document: &DesignDocument) -> RenderResult<Self::Output> {
        self.render(&RenderContext::new(document))
    }
}
