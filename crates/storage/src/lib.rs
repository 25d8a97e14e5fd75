#![forbid(unsafe_code)]

pub mod assets;
pub mod json;
pub mod repository;

pub use assets::{Asset, AssetResolver, FsAssetResolver, InMemoryAssets};
pub use json::JsonCatalogFile;
pub use repository::{CatalogRepository, InMemoryCatalog, Storage, StorageError};
