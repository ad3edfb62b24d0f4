//! Categories

use std::sync::Arc;

use async_trait::async_trait;
use fruitcart::{
    categories::{Category, CategoryId},
    validation::category_name,
};
use mockall::automock;
use serde_json::json;

use crate::{
    api::{ApiError, ApiRequest, Endpoint, Transport},
    domain::mutate,
};

/// [`CategoriesService`] over the HTTP API.
#[derive(Clone)]
pub struct HttpCategoriesService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpCategoriesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCategoriesService").finish_non_exhaustive()
    }
}

impl HttpCategoriesService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CategoriesService for HttpCategoriesService {
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.transport
            .send(ApiRequest::new(Endpoint::ALL_CATEGORIES))
            .await?
            .into_data()
    }

    async fn add_category(&self, name: String) -> Result<String, ApiError> {
        category_name(&name)?;

        let request = ApiRequest::new(Endpoint::ADD_CATEGORY)
            .with_body(&json!({ "categoryName": name.trim() }))?;

        mutate(self.transport.as_ref(), request, "Category added").await
    }

    async fn rename_category(&self, category: CategoryId, name: String) -> Result<String, ApiError> {
        category_name(&name)?;

        let request = ApiRequest::new(Endpoint::UPDATE_CATEGORY)
            .with_body(&json!({ "_id": category, "categoryName": name.trim() }))?;

        mutate(self.transport.as_ref(), request, "Category updated").await
    }

    async fn delete_category(&self, category: CategoryId) -> Result<String, ApiError> {
        let request =
            ApiRequest::new(Endpoint::DELETE_CATEGORY).with_body(&json!({ "_id": category }))?;

        mutate(self.transport.as_ref(), request, "Category deleted").await
    }
}

#[automock]
#[async_trait]
pub trait CategoriesService: Send + Sync {
    /// Every category.
    async fn list_categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Create a category.
    async fn add_category(&self, name: String) -> Result<String, ApiError>;

    /// Rename a category.
    async fn rename_category(&self, category: CategoryId, name: String) -> Result<String, ApiError>;

    /// Delete a category.
    async fn delete_category(&self, category: CategoryId) -> Result<String, ApiError>;
}
