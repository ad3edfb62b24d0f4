//! Notifications

use std::sync::Arc;

use async_trait::async_trait;
use fruitcart::{
    notifications::{NotificationId, NotificationsResponse},
    users::UserId,
};
use mockall::automock;

use crate::{
    api::{ApiError, ApiRequest, Endpoint, Transport},
    domain::mutate,
};

/// [`NotificationsService`] over the HTTP API.
#[derive(Clone)]
pub struct HttpNotificationsService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpNotificationsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpNotificationsService").finish_non_exhaustive()
    }
}

impl HttpNotificationsService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl NotificationsService for HttpNotificationsService {
    async fn fetch(&self, user: UserId) -> Result<NotificationsResponse, ApiError> {
        self.transport
            .send(ApiRequest::new(Endpoint::NOTIFICATIONS).with_query([("userId", user.into_string())]))
            .await?
            .into_payload()
    }

    async fn mark_read(&self, notification: NotificationId) -> Result<String, ApiError> {
        let request =
            ApiRequest::new(Endpoint::MARK_NOTIFICATION_READ).with_id(notification.into_string());

        mutate(self.transport.as_ref(), request, "Notification marked as read").await
    }

    async fn mark_all_read(&self, user: UserId) -> Result<String, ApiError> {
        let request = ApiRequest::new(Endpoint::MARK_ALL_NOTIFICATIONS_READ)
            .with_query([("userId", user.into_string())]);

        mutate(self.transport.as_ref(), request, "All notifications marked as read").await
    }
}

#[automock]
#[async_trait]
pub trait NotificationsService: Send + Sync {
    /// The user's notifications and unread counter.
    async fn fetch(&self, user: UserId) -> Result<NotificationsResponse, ApiError>;

    /// Mark one notification read.
    async fn mark_read(&self, notification: NotificationId) -> Result<String, ApiError>;

    /// Mark all of the user's notifications read.
    async fn mark_all_read(&self, user: UserId) -> Result<String, ApiError>;
}
