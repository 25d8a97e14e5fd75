use std::fmt;

/// File extension appended to every derived asset id.
pub const ASSET_EXTENSION: &str = "png";

/// One quizzable item: a country shown by its flag.
///
/// `asset_id` is always derived from `category` and `name`; the setters keep it in sync.
/// Equality is structural over all three fields.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    name: String,
    category: String,
    asset_id: String,
}

impl Entity {
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        let name = name.into();
        let category = category.into();
        let asset_id = derive_asset_id(&name, &category);
        Self {
            name,
            category,
            asset_id,
        }
    }

    /// Display label used on choice slots and for guess matching.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Relative asset path, e.g. `North_America/North_America-United_States.png`.
    #[must_use]
    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.asset_id = derive_asset_id(&self.name, &self.category);
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
        self.asset_id = derive_asset_id(&self.name, &self.category);
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("asset_id", &self.asset_id)
            .finish()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.category)
    }
}

fn derive_asset_id(name: &str, category: &str) -> String {
    let name = name.replace(' ', "_");
    let category = category.replace(' ', "_");
    format!("{category}/{category}-{name}.{ASSET_EXTENSION}")
}
