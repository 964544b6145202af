use async_trait::async_trait;
use std::collections::HashMap;
use crate::item::{Accommodation, BookingItem, Experience, ItemType, Package};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("{item_type} not found: {id}")]
    ItemNotFound {
        item_type: ItemType,
        id: String,
    },

    #[error("Catalog request failed with status {status}: {detail}")]
    UpstreamRequestFailed {
        status: u16,
        detail: String,
    },

    #[error("Catalog service unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the catalog used by pricing and the booking form.
///
/// Production resolves through the catalog service; tests and the demo server
/// use [`InMemoryCatalog`].
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn find_accommodation(
        &self,
        id: &str,
        destination_id: Option<&str>,
    ) -> Result<Option<Accommodation>, CatalogError>;

    async fn find_package(&self, id: &str) -> Result<Option<Package>, CatalogError>;

    async fn find_experience(&self, id: &str) -> Result<Option<Experience>, CatalogError>;

    async fn list_accommodations(
        &self,
        destination_id: Option<&str>,
    ) -> Result<Vec<Accommodation>, CatalogError>;

    /// Dispatch to the typed finder for `item_type`
    async fn resolve(
        &self,
        item_type: ItemType,
        id: &str,
        destination_id: Option<&str>,
    ) -> Result<Option<BookingItem>, CatalogError> {
        let item = match item_type {
            ItemType::Accommodation => self
                .find_accommodation(id, destination_id)
                .await?
                .map(BookingItem::Accommodation),
            ItemType::Package => self.find_package(id).await?.map(BookingItem::Package),
            ItemType::Experience => self.find_experience(id).await?.map(BookingItem::Experience),
        };
        Ok(item)
    }
}

/// In-memory catalog
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    accommodations: HashMap<String, Accommodation>,
    packages: HashMap<String, Package>,
    experiences: HashMap<String, Experience>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_accommodation(mut self, accommodation: Accommodation) -> Self {
        self.accommodations.insert(accommodation.id.clone(), accommodation);
        self
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.insert(package.id.clone(), package);
        self
    }

    pub fn with_experience(mut self, experience: Experience) -> Self {
        self.experiences.insert(experience.id.clone(), experience);
        self
    }
}

#[async_trait]
impl CatalogLookup for InMemoryCatalog {
    async fn find_accommodation(
        &self,
        id: &str,
        destination_id: Option<&str>,
    ) -> Result<Option<Accommodation>, CatalogError> {
        Ok(self
            .accommodations
            .get(id)
            .filter(|a| destination_id.map_or(true, |d| a.destination_id == d))
            .cloned())
    }

    async fn find_package(&self, id: &str) -> Result<Option<Package>, CatalogError> {
        Ok(self.packages.get(id).cloned())
    }

    async fn find_experience(&self, id: &str) -> Result<Option<Experience>, CatalogError> {
        Ok(self.experiences.get(id).cloned())
    }

    async fn list_accommodations(
        &self,
        destination_id: Option<&str>,
    ) -> Result<Vec<Accommodation>, CatalogError> {
        let mut found: Vec<Accommodation> = self
            .accommodations
            .values()
            .filter(|a| destination_id.map_or(true, |d| a.destination_id == d))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(found)
    }
}
