//! Response envelope

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::api::ApiError;

/// The `{success, message, data}` wrapper every endpoint answers with.
///
/// Payloads some endpoints put beside `data` (`notifications`, `messages`,
/// `checkout_url`) stay available in [`Envelope::extra`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Envelope {
    /// Explicit outcome flag.
    #[serde(default)]
    pub success: Option<bool>,

    /// Failure flag some endpoints send instead of `success`.
    #[serde(default)]
    pub error: Option<Value>,

    /// Human-readable outcome.
    #[serde(default)]
    pub message: Option<Value>,

    /// Main payload.
    #[serde(default)]
    pub data: Option<Value>,

    /// Every other top-level field.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Whether the backend reported success.
    ///
    /// A response without `success` counts as successful unless it sets
    /// `error: true`.
    pub fn is_success(&self) -> bool {
        self.success
            .unwrap_or_else(|| !matches!(self.error, Some(Value::Bool(true))))
    }

    /// Message text, when the backend sent one as a string.
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
    }

    /// Message text or `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        self.message().unwrap_or(fallback).to_string()
    }

    /// Decode `data`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingData`]: no `data` field.
    /// - [`ApiError::Decode`]: `data` is not a `T`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let data = self.data.ok_or(ApiError::MissingData("data"))?;

        Ok(serde_json::from_value(data)?)
    }

    /// Decode one top-level field other than `data`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingData`]: no such field.
    /// - [`ApiError::Decode`]: the field is not a `T`.
    pub fn into_field<T: DeserializeOwned>(mut self, name: &'static str) -> Result<T, ApiError> {
        let value = self.extra.remove(name).ok_or(ApiError::MissingData(name))?;

        Ok(serde_json::from_value(value)?)
    }

    /// Decode every top-level field other than the envelope's own as one `T`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Decode`] when the fields do not form a `T`.
    pub fn into_payload<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        Ok(serde_json::from_value(Value::Object(self.extra))?)
    }
}
