//! App Context

use std::sync::Arc;

use fruitcart::{
    messages::{MessageId, MessagesAction},
    users::User,
    validation::ContactForm,
};
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::{
    api::{ApiError, HttpTransport, Transport},
    domain::{
        auth::{AuthService, Credentials, HttpAuthService},
        cart::{CartService, HttpCartService},
        categories::{CategoriesService, HttpCategoriesService},
        messages::{HttpMessagesService, MessagesService},
        notifications::{HttpNotificationsService, NotificationsService},
        payments::{HttpPaymentsService, PaymentsService},
        products::{HttpProductsService, ProductsService},
        users::{HttpUsersService, UsersService},
    },
    state::AppState,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build HTTP client")]
    Http(#[source] ApiError),
}

#[derive(Clone)]
pub struct AppContext {
    pub auth: Arc<dyn AuthService>,
    pub users: Arc<dyn UsersService>,
    pub categories: Arc<dyn CategoriesService>,
    pub products: Arc<dyn ProductsService>,
    pub cart: Arc<dyn CartService>,
    pub payments: Arc<dyn PaymentsService>,
    pub messages: Arc<dyn MessagesService>,
    pub notifications: Arc<dyn NotificationsService>,
    pub state: AppState,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context for the API at `base`.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn from_base_url(base: Url) -> Result<Self, AppInitError> {
        let transport = HttpTransport::new(base).map_err(AppInitError::Http)?;

        Ok(Self::from_transport(Arc::new(transport)))
    }

    /// Build application context over any transport.
    #[must_use]
    pub fn from_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            auth: Arc::new(HttpAuthService::new(Arc::clone(&transport))),
            users: Arc::new(HttpUsersService::new(Arc::clone(&transport))),
            categories: Arc::new(HttpCategoriesService::new(Arc::clone(&transport))),
            products: Arc::new(HttpProductsService::new(Arc::clone(&transport))),
            cart: Arc::new(HttpCartService::new(Arc::clone(&transport))),
            payments: Arc::new(HttpPaymentsService::new(Arc::clone(&transport))),
            messages: Arc::new(HttpMessagesService::new(Arc::clone(&transport))),
            notifications: Arc::new(HttpNotificationsService::new(transport)),
            state: AppState::new(),
        }
    }

    /// Sign in and load the session user into the shared state.
    ///
    /// # Errors
    ///
    /// Returns the sign-in or user lookup error; the state stays signed out.
    pub async fn sign_in(&self, credentials: Credentials) -> Result<User, ApiError> {
        self.auth.sign_in(credentials).await?;

        let user = self.auth.current_user().await?;

        self.state.set_user(Some(user.clone()));
        self.refresh_cart_count().await;

        Ok(user)
    }

    /// Refetch the cart count. Failures keep the previous count.
    pub async fn refresh_cart_count(&self) {
        match self.cart.count().await {
            Ok(count) => self.state.set_cart_count(count),
            Err(error) => warn!(%error, "failed to refresh cart count"),
        }
    }

    /// End the session and reset the user and cart-count slices.
    ///
    /// # Errors
    ///
    /// Returns the backend's error; the state is left signed in.
    pub async fn sign_out(&self) -> Result<String, ApiError> {
        let message = self.auth.sign_out().await?;

        self.state.set_user(None);
        self.state.set_cart_count(0);

        Ok(message)
    }

    /// Fetch every customer message into the messages slice.
    ///
    /// # Errors
    ///
    /// Returns the backend's error after recording it in the slice.
    pub async fn load_messages(&self) -> Result<(), ApiError> {
        self.state.dispatch_messages(MessagesAction::Requested);

        match self.messages.list_messages().await {
            Ok(messages) => {
                self.state.dispatch_messages(MessagesAction::Loaded(messages));
                Ok(())
            }
            Err(error) => {
                self.state
                    .dispatch_messages(MessagesAction::Failed(error.user_message()));
                Err(error)
            }
        }
    }

    /// Send the contact form through the messages slice.
    ///
    /// # Errors
    ///
    /// Returns the validation or backend error after recording it in the
    /// slice.
    pub async fn send_message(&self, form: ContactForm) -> Result<String, ApiError> {
        self.state.dispatch_messages(MessagesAction::Requested);

        match self.messages.send_message(form).await {
            Ok(message) => {
                self.state.dispatch_messages(MessagesAction::Sent);
                Ok(message)
            }
            Err(error) => {
                self.state
                    .dispatch_messages(MessagesAction::Failed(error.user_message()));
                Err(error)
            }
        }
    }

    /// Delete a message and drop it from the slice.
    ///
    /// # Errors
    ///
    /// Returns the backend's error after recording it in the slice.
    pub async fn delete_message(&self, message: MessageId) -> Result<String, ApiError> {
        self.state.dispatch_messages(MessagesAction::Requested);

        match self.messages.delete_message(message.clone()).await {
            Ok(text) => {
                self.state.dispatch_messages(MessagesAction::Deleted(message));
                Ok(text)
            }
            Err(error) => {
                self.state
                    .dispatch_messages(MessagesAction::Failed(error.user_message()));
                Err(error)
            }
        }
    }
}
