//! Mutation dispatcher

use std::future::Future;

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use crate::{api::ApiError, notices::Notice};

/// Callbacks of the view a mutation was started from.
#[automock]
#[async_trait]
pub trait ListView: Send + Sync {
    /// Fetch the view's collection again.
    async fn refetch(&self);

    /// Close the form or confirmation the mutation came from.
    fn close_modal(&self);

    /// Show a notice.
    fn notify(&self, notice: Notice);
}

/// Run one create, update, delete or approve call on behalf of `view`.
///
/// On success the view gets a success notice with the backend's message, one
/// close and one refetch. On failure it gets an error notice and nothing else.
///
/// # Errors
///
/// The mutation's error, after it has been shown.
pub async fn dispatch<F>(view: &dyn ListView, mutation: F) -> Result<String, ApiError>
where
    F: Future<Output = Result<String, ApiError>> + Send,
{
    match mutation.await {
        Ok(message) => {
            view.notify(Notice::success(message.clone()));
            view.close_modal();
            view.refetch().await;

            Ok(message)
        }
        Err(error) => {
            warn!("mutation failed: {error}");
            view.notify(Notice::from(&error));

            Err(error)
        }
    }
}
