//! Shared primitives for all Rust crates in the clinic client.

#![forbid(unsafe_code)]

/// Authenticated session primitives shared across crates.
pub mod auth;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::Session;

/// Result type used across clinic client crates.
pub type AppResult<T> = Result<T, AppError>;

/// Message shown to the user when a failure carries no server-supplied text.
pub const GENERIC_FAILURE_MESSAGE: &str = "No se pudo completar la solicitud";

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// No usable authenticated session.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Backend answered with a failure status and a message for the user.
    #[error("rejected by backend: {0}")]
    Rejected(String),

    /// Request could not be delivered or the response could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the text a user should see for this failure.
    ///
    /// Only backend rejections carry user-facing text; everything else maps to
    /// [`GENERIC_FAILURE_MESSAGE`].
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected(message) if !message.trim().is_empty() => message.as_str(),
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}
