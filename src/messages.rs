//! Messages
//!
//! Customer contact messages and the shared messages slice. The slice changes
//! only through [`MessagesAction`]s so every view sees the same transitions.

use std::borrow::Cow;

use jiff::Timestamp;
use serde::Deserialize;

use crate::{ids::TypedId, listing::Listable};

/// Message Id
pub type MessageId = TypedId<Message>;

/// A message sent through the contact form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: MessageId,

    /// Sender name.
    pub name: String,

    /// Sender email.
    pub email: String,

    /// Subject line.
    #[serde(default)]
    pub subject: String,

    /// Message body.
    pub message: String,

    /// When the message was sent.
    pub created_at: Timestamp,
}

impl Listable for Message {
    type Facet = std::convert::Infallible;

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.subject)
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

/// Transitions of the messages slice.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagesAction {
    /// A create, list or delete request started.
    Requested,

    /// The contact form was accepted.
    Sent,

    /// The list was fetched.
    Loaded(Vec<Message>),

    /// A message was deleted on the backend.
    Deleted(MessageId),

    /// A request failed with a user-facing reason.
    Failed(String),

    /// The error was shown and can be forgotten.
    ClearError,
}

/// Shared state of the messages views.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagesSlice {
    /// Messages as last fetched, minus local deletions.
    pub messages: Vec<Message>,

    /// A request is in flight.
    pub loading: bool,

    /// Last failure, until cleared.
    pub error: Option<String>,

    /// The contact form was sent successfully.
    pub sent: bool,
}

impl MessagesSlice {
    /// Apply one transition.
    pub fn reduce(&mut self, action: MessagesAction) {
        match action {
            MessagesAction::Requested => self.loading = true,
            MessagesAction::Sent => {
                self.loading = false;
                self.sent = true;
            }
            MessagesAction::Loaded(messages) => {
                self.loading = false;
                self.messages = messages;
            }
            MessagesAction::Deleted(id) => {
                self.loading = false;
                self.messages.retain(|message| message.id != id);
            }
            MessagesAction::Failed(reason) => {
                self.loading = false;
                self.error = Some(reason);
            }
            MessagesAction::ClearError => self.error = None,
        }
    }

    /// The `count` most recently sent messages, newest first.
    pub fn recent(&self, count: usize) -> Vec<&Message> {
        recent(&self.messages, count)
    }
}

/// The `count` most recently sent messages, newest first.
pub fn recent(messages: &[Message], count: usize) -> Vec<&Message> {
    let mut sorted: Vec<&Message> = messages.iter().collect();

    sorted.sort_by_key(|message| std::cmp::Reverse(message.created_at));
    sorted.truncate(count);

    sorted
}
