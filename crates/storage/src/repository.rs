use async_trait::async_trait;
use flagquiz_core::model::{Catalog, CatalogError, Entity};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::assets::{AssetResolver, FsAssetResolver, InMemoryAssets};
use crate::json::JsonCatalogFile;

/// Errors surfaced by catalog sources and asset resolvers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found: {path}")]
    NotFound { path: String },

    #[error("io error: {0}")]
    Io(String),

    #[error("malformed catalog: {0}")]
    Malformed(String),

    #[error("record #{index} is missing field {field}")]
    MissingField { index: usize, field: &'static str },

    #[error(transparent)]
    InvalidCatalog(#[from] CatalogError),
}

impl StorageError {
    pub(crate) fn from_io(path: impl Into<String>, err: &std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path: path.into() },
            _ => Self::Io(err.to_string()),
        }
    }
}

/// Source of the entity catalog.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Load and validate the full catalog.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the source is missing, malformed, or a record
    /// lacks a required field.
    async fn load_catalog(&self) -> Result<Catalog, StorageError>;
}

/// In-memory catalog source for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    entities: Arc<Mutex<Vec<Entity>>>,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_records<N, C>(records: impl IntoIterator<Item = (N, C)>) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        let entities = records
            .into_iter()
            .map(|(name, category)| Entity::new(name, category))
            .collect();
        Self {
            entities: Arc::new(Mutex::new(entities)),
        }
    }

    /// Append an entity to the source; visible on the next load.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the lock is poisoned.
    pub fn push(&self, entity: Entity) -> Result<(), StorageError> {
        let mut guard = self
            .entities
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        guard.push(entity);
        Ok(())
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn load_catalog(&self) -> Result<Catalog, StorageError> {
        let entities = self
            .entities
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?
            .clone();
        Ok(Catalog::new(entities)?)
    }
}

/// Aggregates the catalog source and asset resolver behind trait objects.
#[derive(Clone)]
pub struct Storage {
    pub catalog: Arc<dyn CatalogRepository>,
    pub assets: Arc<dyn AssetResolver>,
}

impl Storage {
    /// JSON catalog file plus a flag image directory.
    #[must_use]
    pub fn files(catalog: impl Into<PathBuf>, assets_root: impl Into<PathBuf>) -> Self {
        Self {
            catalog: Arc::new(JsonCatalogFile::new(catalog)),
            assets: Arc::new(FsAssetResolver::new(assets_root)),
        }
    }

    #[must_use]
    pub fn in_memory(catalog: InMemoryCatalog, assets: InMemoryAssets) -> Self {
        Self {
            catalog: Arc::new(catalog),
            assets: Arc::new(assets),
        }
    }
}
