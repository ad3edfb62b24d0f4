//! Products

use std::sync::Arc;

use async_trait::async_trait;
use fruitcart::products::{Product, ProductDraft, ProductId};
use mockall::automock;
use serde_json::json;

use crate::{
    api::{ApiError, ApiRequest, Endpoint, Transport},
    domain::mutate,
};

/// [`ProductsService`] over the HTTP API.
#[derive(Clone)]
pub struct HttpProductsService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpProductsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpProductsService").finish_non_exhaustive()
    }
}

impl HttpProductsService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    async fn fetch(&self, request: ApiRequest) -> Result<Vec<Product>, ApiError> {
        self.transport.send(request).await?.into_data()
    }
}

#[async_trait]
impl ProductsService for HttpProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch(ApiRequest::new(Endpoint::ALL_PRODUCTS)).await
    }

    async fn products_by_category(&self, category: String) -> Result<Vec<Product>, ApiError> {
        self.fetch(
            ApiRequest::new(Endpoint::PRODUCTS_BY_CATEGORY).with_query([("category", category)]),
        )
        .await
    }

    async fn one_per_category(&self) -> Result<Vec<Product>, ApiError> {
        self.fetch(ApiRequest::new(Endpoint::CATEGORY_PRODUCT)).await
    }

    async fn category_wise(&self, category: String) -> Result<Vec<Product>, ApiError> {
        self.fetch(
            ApiRequest::new(Endpoint::CATEGORY_WISE_PRODUCT)
                .with_body(&json!({ "category": category }))?,
        )
        .await
    }

    async fn product_details(&self, product: ProductId) -> Result<Product, ApiError> {
        self.transport
            .send(
                ApiRequest::new(Endpoint::PRODUCT_DETAILS)
                    .with_body(&json!({ "productId": product }))?,
            )
            .await?
            .into_data()
    }

    async fn search(&self, query: String) -> Result<Vec<Product>, ApiError> {
        self.fetch(ApiRequest::new(Endpoint::SEARCH_PRODUCTS).with_query([("q", query)]))
            .await
    }

    async fn filter(&self, categories: Vec<String>) -> Result<Vec<Product>, ApiError> {
        self.fetch(
            ApiRequest::new(Endpoint::FILTER_PRODUCTS)
                .with_body(&json!({ "category": categories }))?,
        )
        .await
    }

    async fn upload_product(&self, draft: ProductDraft) -> Result<String, ApiError> {
        draft.validate()?;

        let request = ApiRequest::new(Endpoint::UPLOAD_PRODUCT).with_body(&draft)?;

        mutate(self.transport.as_ref(), request, "Product uploaded").await
    }

    async fn update_product(&self, draft: ProductDraft) -> Result<String, ApiError> {
        draft.validate()?;

        let request = ApiRequest::new(Endpoint::UPDATE_PRODUCT).with_body(&draft)?;

        mutate(self.transport.as_ref(), request, "Product updated").await
    }

    async fn delete_product(&self, product: ProductId) -> Result<String, ApiError> {
        let request = ApiRequest::new(Endpoint::DELETE_PRODUCT)
            .with_body(&json!({ "productId": product }))?;

        mutate(self.transport.as_ref(), request, "Product deleted").await
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Every product.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Products of one category.
    async fn products_by_category(&self, category: String) -> Result<Vec<Product>, ApiError>;

    /// One product per category, for the storefront's category strip.
    async fn one_per_category(&self) -> Result<Vec<Product>, ApiError>;

    /// Products of one category, for the storefront's carousels.
    async fn category_wise(&self, category: String) -> Result<Vec<Product>, ApiError>;

    /// Single product.
    async fn product_details(&self, product: ProductId) -> Result<Product, ApiError>;

    /// Backend product search.
    async fn search(&self, query: String) -> Result<Vec<Product>, ApiError>;

    /// Products in any of `categories`.
    async fn filter(&self, categories: Vec<String>) -> Result<Vec<Product>, ApiError>;

    /// Create a product.
    async fn upload_product(&self, draft: ProductDraft) -> Result<String, ApiError>;

    /// Edit a product; the draft must carry its id.
    async fn update_product(&self, draft: ProductDraft) -> Result<String, ApiError>;

    /// Delete a product.
    async fn delete_product(&self, product: ProductId) -> Result<String, ApiError>;
}
