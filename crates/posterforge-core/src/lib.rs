//! PosterForge Core Library
//!
//! Platform-agnostic document model, geometry and editing logic for the
//! PosterForge poster designer.

pub mod assets;
pub mod config;
pub mod document;
pub mod editor;
pub mod elements;
pub mod geometry;
pub mod selection;
pub mod sizes;
pub mod storage;
pub mod tools;

pub use assets::{AssetError, ImageAsset};
pub use config::{ConfigError, EditorConfig};
pub use document::DesignDocument;
pub use editor::Editor;
pub use elements::{
    Background, Element, ElementId, ElementKind, ElementPatch, ImageStyle, SerializableColor,
    ShapeKind, ShapeStyle, TextStyle,
};
pub use geometry::{Geometry, GridSettings};
pub use selection::{Corner, Edge, HandleKind, Interaction};
pub use sizes::SizePreset;
pub use storage::{
    MemoryStorage, StorageError, StorageResult, TemplateFilter, TemplateRecord, TemplateStore,
};
pub use tools::ToolKind;

#[cfg(not(target_arch = "wasm32"))]
pub use storage::FileStorage;
