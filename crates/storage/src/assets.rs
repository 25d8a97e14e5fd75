use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::repository::StorageError;

/// Raw bytes of a prompt image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub asset_id: String,
    pub bytes: Vec<u8>,
}

/// Resolves an entity's asset id to image bytes.
#[async_trait]
pub trait AssetResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no asset exists for `asset_id`.
    async fn resolve(&self, asset_id: &str) -> Result<Asset, StorageError>;
}

/// Reads assets from a directory tree laid out as `<root>/<asset_id>`.
#[derive(Debug, Clone)]
pub struct FsAssetResolver {
    root: PathBuf,
}

impl FsAssetResolver {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl AssetResolver for FsAssetResolver {
    async fn resolve(&self, asset_id: &str) -> Result<Asset, StorageError> {
        let path = self.root.join(asset_id);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| StorageError::from_io(path.display().to_string(), &e))?;
        Ok(Asset {
            asset_id: asset_id.to_owned(),
            bytes,
        })
    }
}

#[derive(Clone, Default)]
pub struct InMemoryAssets {
    assets: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryAssets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns `StorageError::Io` if the lock is poisoned.
    pub fn insert(&self, asset_id: impl Into<String>, bytes: Vec<u8>) -> Result<(), StorageError> {
        let mut guard = self
            .assets
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        guard.insert(asset_id.into(), bytes);
        Ok(())
    }
}

#[async_trait]
impl AssetResolver for InMemoryAssets {
    async fn resolve(&self, asset_id: &str) -> Result<Asset, StorageError> {
        let guard = self
            .assets
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        let bytes = guard.get(asset_id).cloned().ok_or_else(|| StorageError::NotFound {
            path: asset_id.to_owned(),
        })?;
        Ok(Asset {
            asset_id: asset_id.to_owned(),
            bytes,
        })
    }
}
