//! In-memory template storage.

use super::{BoxFuture, StorageError, StorageResult, TemplateFilter, TemplateRecord, TemplateStore};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryStorage {
    templates: RwLock<HashMap<String, TemplateRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", e))
}

impl TemplateStore for MemoryStorage {
    fn save(&self, record: &TemplateRecord) -> BoxFuture<'_, StorageResult<String>> {
        let record = record.clone();
        Box::pin(async move {
            let mut templates = self.templates.write().map_err(lock_error)?;
            let id = record.id.clone();
            templates.insert(id.clone(), record);
            log::info!("saved template {id}");
            Ok(id)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<TemplateRecord>> {
        let id = id.to_string();
        Box::pin(async move {
            let templates = self.templates.read().map_err(lock_error)?;
            templates.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn list(
        &self,
        user_id: &str,
        filter: &TemplateFilter,
    ) -> BoxFuture<'_, StorageResult<Vec<TemplateRecord>>> {
        let user_id = user_id.to_string();
        let filter = filter.clone();
        Box::pin(async move {
            let templates = self.templates.read().map_err(lock_error)?;
            let mut found: Vec<TemplateRecord> = templates
                .values()
                .filter(|t| t.user_id == user_id && filter.matches(t))
                .cloned()
                .collect();
            found.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(found)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut templates = self.templates.write().map_err(lock_error)?;
            templates.remove(&id);
            Ok(())
        })
    }
}
