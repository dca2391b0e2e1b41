//! PosterForge Render Library
//!
//! Projects a design document into an absolutely positioned visual tree and
//! renders it either as the scaled on-screen preview or as HTML markup for
//! export and thumbnails.

mod html;
mod preview;
mod projection;
mod renderer;

pub use html::{HtmlRenderer, escape_attr, escape_text};
pub use preview::{PreviewRenderer, PreviewTree, SelectionOverlay};
pub use projection::{NodeContent, Projection, Style, VisualNode, node_style, project, style_string};
pub use renderer::{DEFAULT_PREVIEW_HEIGHT, RenderContext, RenderResult, Renderer, RendererError};
