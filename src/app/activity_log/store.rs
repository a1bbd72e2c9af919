use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::app::error::AppError;

/// Device-local key-value storage holding whole string blobs.
///
/// Implementations only need whole-blob semantics: read, overwrite, delete.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;
    async fn remove_item(&self, key: &str) -> Result<(), AppError>;
}

pub fn validate_storage_key(key: &str) -> Result<(), String> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err("storage key is required".to_string());
    }
    if trimmed == "." || trimmed == ".." {
        return Err("storage key must not be a relative path segment".to_string());
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
    {
        return Err("storage key may only contain [A-Za-z0-9_.-]".to_string());
    }
    Ok(())
}

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn item_path(&self, key: &str) -> Result<PathBuf, AppError> {
        validate_storage_key(key).map_err(|message| AppError::validation(message, ""))?;
        Ok(self.dir.join(format!("{}.json", key.trim())))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.item_path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::storage(
                format!("Failed to read {}: {err}", path.display()),
                "",
            )),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self.item_path(key)?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|err| {
            AppError::storage(format!("Failed to create store dir: {err}"), "")
        })?;
        // Write then rename so readers never observe a half-written blob.
        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, value).await.map_err(|err| {
            AppError::storage(format!("Failed to write {}: {err}", tmp_path.display()), "")
        })?;
        tokio::fs::rename(&tmp_path, &path).await.map_err(|err| {
            AppError::storage(format!("Failed to replace {}: {err}", path.display()), "")
        })?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), AppError> {
        let path = self.item_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AppError::storage(
                format!("Failed to remove {}: {err}", path.display()),
                "",
            )),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AppError> {
        self.items
            .lock()
            .map_err(|_| AppError::storage("memory store lock poisoned", ""))
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), AppError> {
        self.lock()?.remove(key);
        Ok(())
    }
}
