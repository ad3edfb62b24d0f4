//! Fruitcart
//!
//! Typed models and client-side logic for the Fruitcart storefront: the catalog,
//! the cart and checkout, payments, customer messages and notifications, plus
//! the list-view pipeline and dashboard statistics shared by the back-office
//! panels. Nothing here performs I/O.

pub mod cart;
pub mod categories;
pub mod checkout;
pub mod dashboard;
pub mod ids;
pub mod listing;
pub mod messages;
pub mod money;
pub mod notifications;
pub mod payments;
pub mod prelude;
pub mod products;
pub mod roles;
pub mod users;
pub mod validation;
