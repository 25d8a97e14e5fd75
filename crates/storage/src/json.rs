//! JSON catalog files of the form `{ "Countries": [ { "Name": .., "Region": .. } ] }`.

use async_trait::async_trait;
use flagquiz_core::model::{Catalog, Entity};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::repository::{CatalogRepository, StorageError};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(rename = "Countries")]
    countries: Vec<CountryRecord>,
}

#[derive(Debug, Deserialize)]
struct CountryRecord {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Region")]
    region: Option<String>,
}

/// Catalog stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonCatalogFile {
    path: PathBuf,
}

impl JsonCatalogFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a catalog document already read into memory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Malformed` for invalid JSON or a missing root array,
    /// `StorageError::MissingField` for a record without `Name` or `Region`.
    pub fn parse(json: &str) -> Result<Catalog, StorageError> {
        let document: CatalogDocument =
            serde_json::from_str(json).map_err(|e| StorageError::Malformed(e.to_string()))?;

        let mut entities = Vec::with_capacity(document.countries.len());
        for (index, record) in document.countries.into_iter().enumerate() {
            let name = record.name.ok_or(StorageError::MissingField {
                index,
                field: "Name",
            })?;
            let region = record.region.ok_or(StorageError::MissingField {
                index,
                field: "Region",
            })?;
            entities.push(Entity::new(name, region));
        }

        Ok(Catalog::new(entities)?)
    }
}

#[async_trait]
impl CatalogRepository for JsonCatalogFile {
    async fn load_catalog(&self) -> Result<Catalog, StorageError> {
        let display = self.path.display().to_string();
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StorageError::from_io(display.clone(), &e))?;
        let catalog = Self::parse(&json)?;
        log::info!(
            "loaded {} entities in {} categories from {display}",
            catalog.len(),
            catalog.categories().len()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_countries_document() {
        let catalog = JsonCatalogFile::parse(
            r#"{ "Countries": [
                { "Name": "Ghana", "Region": "Africa" },
                { "Name": "New Zealand", "Region": "Oceania" }
            ] }"#,
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.entities()[1].asset_id(),
            "Oceania/Oceania-New_Zealand.png"
        );
    }

    #[test]
    fn missing_region_names_the_record() {
        let err = JsonCatalogFile::parse(
            r#"{ "Countries": [ { "Name": "Ghana", "Region": "Africa" }, { "Name": "Chile" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            StorageError::MissingField {
                index: 1,
                field: "Region"
            }
        ));
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert!(matches!(
            JsonCatalogFile::parse("{ \"Countries\": [ }"),
            Err(StorageError::Malformed(_))
        ));
        assert!(matches!(
            JsonCatalogFile::parse("{ \"Nations\": [] }"),
            Err(StorageError::Malformed(_))
        ));
    }
}
