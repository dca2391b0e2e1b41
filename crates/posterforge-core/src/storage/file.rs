//! File-based template storage for native platforms.

use super::{BoxFuture, StorageError, StorageResult, TemplateFilter, TemplateRecord, TemplateStore};
use std::fs;
use std::path::{Path, PathBuf};

/// File-based storage for native platforms.
///
/// Stores templates as JSON files in a specified directory.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create storage directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/posterforge/templates/`
    /// On Windows: `%LOCALAPPDATA%\posterforge\templates\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;
        Self::new(base.join("posterforge").join("templates"))
    }

    fn template_path(&self, id: &str) -> PathBuf {
        let safe_id: String = id
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_id))
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

fn read_record(path: &Path) -> StorageResult<TemplateRecord> {
    let json = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    TemplateRecord::from_json(&json).map_err(|e| {
        StorageError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
    })
}

impl TemplateStore for FileStorage {
    fn save(&self, record: &TemplateRecord) -> BoxFuture<'_, StorageResult<String>> {
        let path = self.template_path(&record.id);
        let id = record.id.clone();
        let json = match record.to_json() {
            Ok(j) => j,
            Err(e) => {
                return Box::pin(async move { Err(StorageError::Serialization(e.to_string())) });
            }
        };

        Box::pin(async move {
            fs::write(&path, json).map_err(|e| {
                StorageError::Io(format!("Failed to write {}: {}", path.display(), e))
            })?;
            log::info!("saved template {id} to {}", path.display());
            Ok(id)
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<TemplateRecord>> {
        let path = self.template_path(id);
        let id_owned = id.to_string();

        Box::pin(async move {
            if !path.exists() {
                return Err(StorageError::NotFound(id_owned));
            }
            read_record(&path)
        })
    }

    fn list(
        &self,
        user_id: &str,
        filter: &TemplateFilter,
    ) -> BoxFuture<'_, StorageResult<Vec<TemplateRecord>>> {
        let base = self.base_path.clone();
        let user_id = user_id.to_string();
        let filter = filter.clone();

        Box::pin(async move {
            if !base.exists() {
                return Ok(vec![]);
            }
            let entries = fs::read_dir(&base)
                .map_err(|e| StorageError::Io(format!("Failed to read directory: {}", e)))?;

            let mut found = Vec::new();
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|e| e != "json") {
                    continue;
                }
                match read_record(&path) {
                    Ok(record) if record.user_id == user_id && filter.matches(&record) => {
                        found.push(record)
                    }
                    Ok(_) => {}
                    Err(e) => log::warn!("skipping unreadable template: {e}"),
                }
            }
            found.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(found)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.template_path(id);

        Box::pin(async move {
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    StorageError::Io(format!("Failed to delete {}: {}", path.display(), e))
                })?;
            }
            Ok(())
        })
    }
}
