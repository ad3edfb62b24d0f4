//! Cart

use std::sync::Arc;

use async_trait::async_trait;
use fruitcart::{
    cart::{AddToCart, CartItem, CartItemId, QuantityChange},
    products::ProductId,
};
use mockall::automock;
use serde::Deserialize;
use serde_json::json;

use crate::{
    api::{ApiError, ApiRequest, Endpoint, Transport},
    domain::mutate,
};

#[derive(Debug, Deserialize)]
struct CartCount {
    #[serde(default)]
    count: usize,
}

/// [`CartService`] over the HTTP API.
#[derive(Clone)]
pub struct HttpCartService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpCartService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCartService").finish_non_exhaustive()
    }
}

impl HttpCartService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CartService for HttpCartService {
    async fn add_to_cart(&self, product: ProductId) -> Result<String, ApiError> {
        let request =
            ApiRequest::new(Endpoint::ADD_TO_CART).with_body(&AddToCart { product_id: product })?;

        mutate(self.transport.as_ref(), request, "Product added to cart").await
    }

    async fn count(&self) -> Result<usize, ApiError> {
        let count: CartCount = self
            .transport
            .send(ApiRequest::new(Endpoint::CART_COUNT))
            .await?
            .into_data()?;

        Ok(count.count)
    }

    async fn view(&self) -> Result<Vec<CartItem>, ApiError> {
        self.transport
            .send(ApiRequest::new(Endpoint::CART_VIEW))
            .await?
            .into_data()
    }

    async fn update_quantity(&self, change: QuantityChange) -> Result<String, ApiError> {
        let request = ApiRequest::new(Endpoint::UPDATE_CART_ITEM).with_body(&change)?;

        mutate(self.transport.as_ref(), request, "Cart updated").await
    }

    async fn delete_item(&self, item: CartItemId) -> Result<String, ApiError> {
        let request =
            ApiRequest::new(Endpoint::DELETE_CART_ITEM).with_body(&json!({ "_id": item }))?;

        mutate(self.transport.as_ref(), request, "Product removed from cart").await
    }
}

#[automock]
#[async_trait]
pub trait CartService: Send + Sync {
    /// Put one unit of a product in the signed-in user's cart.
    async fn add_to_cart(&self, product: ProductId) -> Result<String, ApiError>;

    /// Number of lines in the cart.
    async fn count(&self) -> Result<usize, ApiError>;

    /// Cart lines with their products populated.
    async fn view(&self) -> Result<Vec<CartItem>, ApiError>;

    /// Set a line's quantity.
    async fn update_quantity(&self, change: QuantityChange) -> Result<String, ApiError>;

    /// Remove a line.
    async fn delete_item(&self, item: CartItemId) -> Result<String, ApiError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{api::MockTransport, domain::test_support::envelope};

    use super::*;

    #[tokio::test]
    async fn count_reads_data_count() -> TestResult {
        let mut transport = MockTransport::new();

        transport
            .expect_send()
            .once()
            .withf(|request| request.endpoint == Endpoint::CART_COUNT)
            .return_once(|_| envelope(json!({"success": true, "data": {"count": 4}})));

        let service = HttpCartService::new(Arc::new(transport));

        assert_eq!(service.count().await?, 4);

        Ok(())
    }

    #[tokio::test]
    async fn quantity_change_posts_line_and_quantity() -> TestResult {
        let mut transport = MockTransport::new();

        transport
            .expect_send()
            .once()
            .withf(|request| {
                request.endpoint == Endpoint::UPDATE_CART_ITEM
                    && request.body == Some(json!({"_id": "line-1", "quantity": 3}))
            })
            .return_once(|_| envelope(json!({"success": true, "message": "Product Updated"})));

        let service = HttpCartService::new(Arc::new(transport));

        let message = service
            .update_quantity(QuantityChange {
                id: CartItemId::new("line-1"),
                quantity: 3,
            })
            .await?;

        assert_eq!(message, "Product Updated");

        Ok(())
    }

    #[tokio::test]
    async fn add_to_cart_sends_product_id() -> TestResult {
        let mut transport = MockTransport::new();

        transport
            .expect_send()
            .once()
            .withf(|request| request.body == Some(json!({"productId": "p1"})))
            .return_once(|_| envelope(json!({"success": true})));

        let service = HttpCartService::new(Arc::new(transport));

        assert_eq!(
            service.add_to_cart(ProductId::new("p1")).await?,
            "Product added to cart"
        );

        Ok(())
    }
}
