//! API errors

use fruitcart::validation::{ValidationError, ValidationErrors};
use thiserror::Error;

/// Text shown when a call failed for a reason the customer cannot act on.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Failure of one backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Base URL and endpoint path did not form a URL.
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    /// The body was not the expected JSON.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Non-2xx response without a message.
    #[error("server responded with status {0}")]
    Status(u16),

    /// `success: false` or non-2xx response with a message.
    #[error("{message}")]
    Rejected {
        /// HTTP status of the response.
        status: u16,
        /// Message from the backend.
        message: String,
    },

    /// A successful response lacked the named payload field.
    #[error("response carried no {0}")]
    MissingData(&'static str),

    /// Input failed client-side checks and was never sent.
    #[error("{0}")]
    Invalid(#[from] ValidationErrors),
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Invalid(error.into())
    }
}

impl ApiError {
    /// Rejection carrying the backend's message.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Text for an error notice.
    ///
    /// Rejections and validation failures are shown as-is; everything else
    /// collapses into [`GENERIC_FAILURE`].
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Invalid(errors) => errors.to_string(),
            Self::Transport(_)
            | Self::Url(_)
            | Self::Decode(_)
            | Self::Status(_)
            | Self::MissingData(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_keep_the_server_message() {
        let error = ApiError::rejected(400, "Category already exists");

        assert_eq!(error.user_message(), "Category already exists");
    }

    #[test]
    fn validation_failures_name_the_field() {
        let error = ApiError::from(ValidationError::Required {
            field: "categoryName",
        });

        assert!(error.user_message().contains("categoryName"));
    }

    #[test]
    fn other_failures_are_generic() {
        assert_eq!(ApiError::Status(502).user_message(), GENERIC_FAILURE);
        assert_eq!(ApiError::MissingData("data").user_message(), GENERIC_FAILURE);
    }
}
