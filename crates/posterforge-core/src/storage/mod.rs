//! Template persistence.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::document::DesignDocument;
use crate::elements::{Background, Element};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use uuid::Uuid;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Template not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// A saved design, as kept by the external document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Preview image, usually a `data:` URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub background_color: Background,
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub current_size: String,
}

impl TemplateRecord {
    /// Capture the persisted fields of a document under a generated id.
    pub fn from_document(
        doc: &DesignDocument,
        user_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: name.into(),
            category: None,
            thumbnail: None,
            elements: doc.elements().to_vec(),
            background_color: doc.background_color(),
            canvas_width: doc.canvas_width(),
            canvas_height: doc.canvas_height(),
            current_size: doc.current_size().to_string(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: impl Into<String>) -> Self {
        self.thumbnail = Some(thumbnail.into());
        self
    }

    /// Open the template in a fresh document.
    pub fn to_document(&self) -> DesignDocument {
        let mut doc =
            DesignDocument::new(self.canvas_width, self.canvas_height, self.current_size.clone());
        doc.load_template(self);
        doc
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Optional narrowing of a template listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFilter {
    pub category: Option<String>,
    pub size: Option<String>,
}

impl TemplateFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn size(size: impl Into<String>) -> Self {
        Self {
            size: Some(size.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &TemplateRecord) -> bool {
        let category_ok = self
            .category
            .as_ref()
            .is_none_or(|c| record.category.as_ref() == Some(c));
        let size_ok = self.size.as_ref().is_none_or(|s| &record.current_size == s);
        category_ok && size_ok
    }
}

/// Trait for template storage backends.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait TemplateStore: Send + Sync {
    /// Save a template, returning its id.
    fn save(&self, record: &TemplateRecord) -> BoxFuture<'_, StorageResult<String>>;

    /// Load a template by id.
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<TemplateRecord>>;

    /// List a user's templates matching the filter, sorted by name.
    fn list(
        &self,
        user_id: &str,
        filter: &TemplateFilter,
    ) -> BoxFuture<'_, StorageResult<Vec<TemplateRecord>>>;

    /// Delete a template. Deleting a missing template is not an error.
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}

/// Trait for template storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait TemplateStore {
    fn save(&self, record: &TemplateRecord) -> BoxFuture<'_, StorageResult<String>>;
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<TemplateRecord>>;
    fn list(
        &self,
        user_id: &str,
        filter: &TemplateFilter,
    ) -> BoxFuture<'_, StorageResult<Vec<TemplateRecord>>>;
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}

#[cfg(test)]
pub(crate) fn block_on<F: std::future::Future>(f: F) -> F::Output {
    // Simple blocking executor for tests
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn dummy_raw_waker() -> RawWaker {
        fn no_op(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            dummy_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
        RawWaker::new(std::ptr::null(), &VTABLE)
    }

    let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    let mut f = std::pin::pin!(f);

    loop {
        if let Poll::Ready(result) = f.as_mut().poll(&mut cx) {
            return result;
        }
    }
}
