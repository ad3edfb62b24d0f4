//! Backend services, one per resource.
//!
//! Every service is a trait with an HTTP implementation over a shared
//! [`Transport`](crate::api::Transport). Mutations return the backend's message
//! so callers can show it as a notice.

use crate::api::{ApiError, ApiRequest, Transport};

pub mod auth;
pub mod cart;
pub mod categories;
pub mod messages;
pub mod notifications;
pub mod payments;
pub mod products;
pub mod users;

/// Send a mutation and return the backend's message or `fallback`.
pub(crate) async fn mutate(
    transport: &dyn Transport,
    request: ApiRequest,
    fallback: &str,
) -> Result<String, ApiError> {
    let envelope = transport.send(request).await?;

    Ok(envelope.message_or(fallback))
}
