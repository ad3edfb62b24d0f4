//! Contact messages

use std::sync::Arc;

use async_trait::async_trait;
use fruitcart::{
    messages::{Message, MessageId},
    validation::ContactForm,
};
use mockall::automock;

use crate::{
    api::{ApiError, ApiRequest, Endpoint, Transport},
    domain::mutate,
};

/// [`MessagesService`] over the HTTP API.
#[derive(Clone)]
pub struct HttpMessagesService {
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for HttpMessagesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMessagesService").finish_non_exhaustive()
    }
}

impl HttpMessagesService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl MessagesService for HttpMessagesService {
    async fn send_message(&self, form: ContactForm) -> Result<String, ApiError> {
        form.validate()?;

        let request = ApiRequest::new(Endpoint::MESSAGE_CREATE).with_body(&form)?;

        mutate(self.transport.as_ref(), request, "Message sent").await
    }

    async fn list_messages(&self) -> Result<Vec<Message>, ApiError> {
        self.transport
            .send(ApiRequest::new(Endpoint::ALL_MESSAGES))
            .await?
            .into_field("messages")
    }

    async fn delete_message(&self, message: MessageId) -> Result<String, ApiError> {
        let request = ApiRequest::new(Endpoint::MESSAGE_DELETE).with_id(message.into_string());

        mutate(self.transport.as_ref(), request, "Message deleted").await
    }
}

#[automock]
#[async_trait]
pub trait MessagesService: Send + Sync {
    /// Send the contact form.
    async fn send_message(&self, form: ContactForm) -> Result<String, ApiError>;

    /// Every customer message.
    async fn list_messages(&self) -> Result<Vec<Message>, ApiError>;

    /// Delete a message.
    async fn delete_message(&self, message: MessageId) -> Result<String, ApiError>;
}
