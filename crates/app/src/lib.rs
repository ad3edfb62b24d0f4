//! Client side of the Fruitcart shop: HTTP services, shared state, list
//! controllers and the notification poller.

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod context;
pub mod domain;
pub mod listing;
pub mod notices;
pub mod observability;
pub mod poller;
pub mod shutdown;
pub mod state;
