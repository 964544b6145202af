use async_trait::async_trait;
use tourism_catalog::{Accommodation, CatalogError, CatalogLookup, Experience, Package};
use crate::http::ApiClient;

/// Catalog service client backing the pricing lookups
pub struct RestCatalog {
    api: ApiClient,
}

impl RestCatalog {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn accommodations_endpoint(destination_id: Option<&str>) -> String {
    match destination_id {
        Some(d) => format!("/accommodations/?destination_id={}", d),
        None => "/accommodations/".to_string(),
    }
}

#[async_trait]
impl CatalogLookup for RestCatalog {
    async fn find_accommodation(
        &self,
        id: &str,
        destination_id: Option<&str>,
    ) -> Result<Option<Accommodation>, CatalogError> {
        let found: Option<Accommodation> = self
            .api
            .get_optional(&format!("/accommodations/{}", id))
            .await?;
        Ok(found.filter(|a| destination_id.map_or(true, |d| a.destination_id == d)))
    }

    async fn find_package(&self, id: &str) -> Result<Option<Package>, CatalogError> {
        Ok(self.api.get_optional(&format!("/packages/{}", id)).await?)
    }

    async fn find_experience(&self, id: &str) -> Result<Option<Experience>, CatalogError> {
        Ok(self.api.get_optional(&format!("/experiences/{}", id)).await?)
    }

    async fn list_accommodations(
        &self,
        destination_id: Option<&str>,
    ) -> Result<Vec<Accommodation>, CatalogError> {
        Ok(self.api.get_json(&accommodations_endpoint(destination_id)).await?)
    }
}
