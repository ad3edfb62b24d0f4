//! Cart view

use std::sync::Arc;

use fruitcart::cart::{Cart, CartItemId, QuantityChange};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    api::ApiError,
    domain::cart::CartService,
    listing::{LoadOutcome, RequestSequencer},
    notices::Notice,
    state::AppState,
};

/// A cart mutation the backend accepted, and the reload that followed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartUpdate {
    /// Backend's confirmation text.
    pub message: String,

    /// Outcome of the reload. A failed reload leaves the previous lines shown.
    pub reload: LoadOutcome,
}

impl CartUpdate {
    /// Notice to show for the failed reload, if it failed.
    pub fn reload_failure(&self) -> Option<&Notice> {
        match &self.reload {
            LoadOutcome::Failed(notice) => Some(notice),
            LoadOutcome::Loaded | LoadOutcome::Stale => None,
        }
    }
}

/// The signed-in user's cart with its line selection.
pub struct CartController {
    service: Arc<dyn CartService>,
    state: AppState,
    sequencer: RequestSequencer,
    cart: RwLock<Cart>,
}

impl std::fmt::Debug for CartController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartController")
            .field("cart", &self.cart)
            .finish_non_exhaustive()
    }
}

impl CartController {
    /// Empty cart view.
    pub fn new(service: Arc<dyn CartService>, state: AppState) -> Self {
        Self {
            service,
            state,
            sequencer: RequestSequencer::new(),
            cart: RwLock::new(Cart::default()),
        }
    }

    /// Fetch the lines. Every line comes back selected.
    pub async fn load(&self) -> LoadOutcome {
        let ticket = self.sequencer.issue();
        let result = self.service.view().await;
        let mut cart = self.cart.write().await;

        if !self.sequencer.is_current(ticket) {
            debug!(ticket = ticket.get(), "discarding stale cart response");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(items) => {
                cart.replace(items);
                LoadOutcome::Loaded
            }
            Err(error) => LoadOutcome::Failed(Notice::from(&error)),
        }
    }

    /// Copy of the cart as shown.
    pub async fn cart(&self) -> Cart {
        self.cart.read().await.clone()
    }

    /// Flip one line's selection.
    pub async fn toggle(&self, line: &CartItemId) {
        self.cart.write().await.toggle(line);
    }

    /// Add one unit to a line, then reload.
    ///
    /// # Errors
    ///
    /// The backend's error; the cart is not reloaded.
    pub async fn increment(&self, line: &CartItemId) -> Result<Option<CartUpdate>, ApiError> {
        let change = self.cart.read().await.increment(line);

        self.change_quantity(change).await
    }

    /// Remove one unit from a line holding at least two, then reload.
    ///
    /// Returns `None` without calling the backend for a single-unit line.
    ///
    /// # Errors
    ///
    /// The backend's error; the cart is not reloaded.
    pub async fn decrement(&self, line: &CartItemId) -> Result<Option<CartUpdate>, ApiError> {
        let change = self.cart.read().await.decrement(line);

        self.change_quantity(change).await
    }

    async fn change_quantity(
        &self,
        change: Option<QuantityChange>,
    ) -> Result<Option<CartUpdate>, ApiError> {
        let Some(change) = change else {
            return Ok(None);
        };

        let message = self.service.update_quantity(change).await?;
        let reload = self.load().await;

        Ok(Some(CartUpdate { message, reload }))
    }

    /// Delete a line, then reload the cart and the shared cart count.
    ///
    /// # Errors
    ///
    /// The backend's error on delete; a failed count refresh is logged only.
    pub async fn remove(&self, line: CartItemId) -> Result<CartUpdate, ApiError> {
        let message = self.service.delete_item(line).await?;
        let reload = self.load().await;

        if let Err(error) = self.refresh_count().await {
            debug!("cart count refresh failed: {error}");
        }

        Ok(CartUpdate { message, reload })
    }

    /// Fetch the cart count into the shared state.
    ///
    /// # Errors
    ///
    /// The backend's error; the shared count is unchanged.
    pub async fn refresh_count(&self) -> Result<usize, ApiError> {
        let count = self.service.count().await?;

        self.state.set_cart_count(count);

        Ok(count)
    }
}
