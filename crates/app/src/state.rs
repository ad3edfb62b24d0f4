//! Shared application state
//!
//! Three slices with one writer contract each: the session writes the user
//! slice, cart flows write the cart-count slice, and message flows write the
//! messages slice through [`MessagesAction`]s. Views read snapshots or
//! subscribe to changes.

use std::sync::Arc;

use fruitcart::{
    messages::{MessagesAction, MessagesSlice},
    users::{User, UserId},
};
use tokio::sync::watch;
use tracing::info;

#[derive(Debug)]
struct Slices {
    user: watch::Sender<Option<User>>,
    cart_count: watch::Sender<usize>,
    messages: watch::Sender<MessagesSlice>,
}

/// Handle to the shared state. Clones share the same slices.
#[derive(Debug, Clone)]
pub struct AppState {
    slices: Arc<Slices>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Signed-out state with an empty cart and no messages.
    pub fn new() -> Self {
        Self {
            slices: Arc::new(Slices {
                user: watch::Sender::new(None),
                cart_count: watch::Sender::new(0),
                messages: watch::Sender::new(MessagesSlice::default()),
            }),
        }
    }

    /// Signed-in user, if any.
    pub fn user(&self) -> Option<User> {
        self.slices.user.borrow().clone()
    }

    /// Id of the signed-in user, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.slices.user.borrow().as_ref().map(|user| user.id.clone())
    }

    /// Record a sign-in or, with `None`, a sign-out.
    pub fn set_user(&self, user: Option<User>) {
        match &user {
            Some(user) => info!(user = %user.id, role = %user.role, "session started"),
            None => info!("session ended"),
        }

        self.slices.user.send_replace(user);
    }

    /// Follow sign-ins and sign-outs.
    pub fn subscribe_user(&self) -> watch::Receiver<Option<User>> {
        self.slices.user.subscribe()
    }

    /// Lines in the signed-in user's cart, as last fetched.
    pub fn cart_count(&self) -> usize {
        *self.slices.cart_count.borrow()
    }

    /// Store a freshly fetched cart count.
    pub fn set_cart_count(&self, count: usize) {
        self.slices.cart_count.send_replace(count);
    }

    /// Follow the cart count.
    pub fn subscribe_cart_count(&self) -> watch::Receiver<usize> {
        self.slices.cart_count.subscribe()
    }

    /// Snapshot of the messages slice.
    pub fn messages(&self) -> MessagesSlice {
        self.slices.messages.borrow().clone()
    }

    /// Apply one transition to the messages slice.
    pub fn dispatch_messages(&self, action: MessagesAction) {
        self.slices.messages.send_modify(|slice| slice.reduce(action));
    }

    /// Follow the messages slice.
    pub fn subscribe_messages(&self) -> watch::Receiver<MessagesSlice> {
        self.slices.messages.subscribe()
    }
}
