//! Transient user-facing notices.

use std::fmt::{self, Display};

use crate::api::ApiError;

/// Tone of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The operation went through.
    Success,

    /// The operation failed.
    Error,
}

/// A short success or error message shown once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Tone.
    pub kind: NoticeKind,

    /// Text shown to the user.
    pub text: String,
}

impl Notice {
    /// Success notice.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    /// Error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    /// Whether this reports a failure.
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl From<&ApiError> for Notice {
    fn from(error: &ApiError) -> Self {
        Self::error(error.user_message())
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NoticeKind::Success => write!(f, "ok: {}", self.text),
            NoticeKind::Error => write!(f, "error: {}", self.text),
        }
    }
}
