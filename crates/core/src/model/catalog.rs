use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::entity::Entity;
use crate::model::settings::Region;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("entity #{index} has an empty name")]
    EmptyName { index: usize },

    #[error("entity #{index} has an empty category")]
    EmptyCategory { index: usize },

    #[error("duplicate asset id: {asset_id}")]
    DuplicateAsset { asset_id: String },
}

/// Region selection matched nothing in the catalog.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FilterError {
    #[error("no entities in region {region}")]
    Empty { region: Region },
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Ordered, immutable collection of every quizzable entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entities: Vec<Entity>,
}

impl Catalog {
    /// Build a catalog, validating names, categories and asset id uniqueness.
    ///
    /// Display names repeated across categories are accepted but logged.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if an entity has a blank field or two entities derive
    /// the same asset id.
    pub fn new(entities: Vec<Entity>) -> Result<Self, CatalogError> {
        let mut assets = HashSet::with_capacity(entities.len());
        let mut names: HashMap<&str, &str> = HashMap::with_capacity(entities.len());

        for (index, entity) in entities.iter().enumerate() {
            if entity.name().trim().is_empty() {
                return Err(CatalogError::EmptyName { index });
            }
            if entity.category().trim().is_empty() {
                return Err(CatalogError::EmptyCategory { index });
            }
            if !assets.insert(entity.asset_id()) {
                return Err(CatalogError::DuplicateAsset {
                    asset_id: entity.asset_id().to_owned(),
                });
            }
            if let Some(first) = names.insert(entity.name(), entity.category()) {
                log::warn!(
                    "display name {:?} appears in both {first:?} and {:?}",
                    entity.name(),
                    entity.category()
                );
            }
        }

        Ok(Self { entities })
    }

    /// Build a catalog from already-parsed `(name, category)` pairs.
    ///
    /// # Errors
    ///
    /// See [`Catalog::new`].
    pub fn from_records<N, C>(records: impl IntoIterator<Item = (N, C)>) -> Result<Self, CatalogError>
    where
        N: Into<String>,
        C: Into<String>,
    {
        Self::new(
            records
                .into_iter()
                .map(|(name, category)| Entity::new(name, category))
                .collect(),
        )
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.entities
            .iter()
            .map(Entity::category)
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Derive the active subset for `region`.
    ///
    /// `Region::All` copies the whole catalog; a named region keeps catalog order.
    /// The returned view owns its storage.
    ///
    /// # Errors
    ///
    /// Returns `FilterError::Empty` if nothing matches.
    pub fn filter(&self, region: &Region) -> Result<FilteredView, FilterError> {
        let entities: Vec<Entity> = match region {
            Region::All => self.entities.clone(),
            Region::Named(name) => self
                .entities
                .iter()
                .filter(|entity| entity.category() == name)
                .cloned()
                .collect(),
        };

        if entities.is_empty() {
            return Err(FilterError::Empty {
                region: region.clone(),
            });
        }

        Ok(FilteredView {
            region: region.clone(),
            entities,
        })
    }
}

//
// ─── FILTERED VIEW ─────────────────────────────────────────────────────────────
//

/// Owned snapshot of the entities in the selected region.
///
/// The round engine reshuffles it in place, so index positions are not stable
/// from one round to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView {
    region: Region,
    entities: Vec<Entity>,
}

impl FilteredView {
    #[must_use]
    pub fn region(&self) -> &Region {
        &self.region
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Entity] {
        &self.entities
    }

    pub fn as_mut_slice(&mut self) -> &mut [Entity] {
        &mut self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::from_records([("A", "R1"), ("B", "R1"), ("C", "R2")]).unwrap()
    }

    #[test]
    fn named_region_keeps_catalog_order() {
        let view = sample().filter(&Region::named("R1")).unwrap();
        let names: Vec<_> = view.as_slice().iter().map(Entity::name).collect();
        assert_eq!(names, ["A", "B"]);
        assert_eq!(view.region(), &Region::named("R1"));
    }

    #[test]
    fn all_region_copies_catalog() {
        let catalog = sample();
        let mut first = catalog.filter(&Region::All).unwrap();
        first.as_mut_slice().reverse();
        let second = catalog.filter(&Region::All).unwrap();

        assert_eq!(second.as_slice(), catalog.entities());

        let mut a: Vec<_> = first.as_slice().to_vec();
        let mut b: Vec<_> = second.as_slice().to_vec();
        a.sort_by(|x, y| x.asset_id().cmp(y.asset_id()));
        b.sort_by(|x, y| x.asset_id().cmp(y.asset_id()));
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_region_is_an_error() {
        let err = sample().filter(&Region::named("Atlantis")).unwrap_err();
        assert_eq!(
            err,
            FilterError::Empty {
                region: Region::named("Atlantis")
            }
        );
    }

    #[test]
    fn rejects_duplicate_assets() {
        let err = Catalog::from_records([("A", "R1"), ("A", "R1")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateAsset { .. }));
    }

    #[test]
    fn rejects_blank_fields() {
        let err = Catalog::from_records([("A", "R1"), (" ", "R1")]).unwrap_err();
        assert_eq!(err, CatalogError::EmptyName { index: 1 });

        let err = Catalog::from_records([("A", "")]).unwrap_err();
        assert_eq!(err, CatalogError::EmptyCategory { index: 0 });
    }

    #[test]
    fn allows_same_name_in_different_categories() {
        let catalog = Catalog::from_records([("Georgia", "Asia"), ("Georgia", "North America")])
            .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn categories_in_first_seen_order() {
        let catalog =
            Catalog::from_records([("A", "Europe"), ("B", "Asia"), ("C", "Europe")]).unwrap();
        assert_eq!(catalog.categories(), ["Europe", "Asia"]);
    }
}
