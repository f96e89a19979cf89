use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{AppError, AppResult, NonEmptyString};

/// Authenticated session persisted after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: NonEmptyString,
    profile: Map<String, Value>,
}

impl Session {
    /// Creates a session from a bearer token and the user profile.
    pub fn new(token: impl Into<String>, profile: Map<String, Value>) -> AppResult<Self> {
        Ok(Self {
            token: NonEmptyString::new(token)?,
            profile,
        })
    }

    /// Builds a session from the body returned by the login endpoint.
    ///
    /// The whole body becomes the profile; `token` must be a non-empty string.
    pub fn from_login_response(body: Map<String, Value>) -> AppResult<Self> {
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AppError::Internal("login response did not include a token".to_owned())
            })?
            .to_owned();

        Self::new(token, body)
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Returns the profile fields returned at login.
    #[must_use]
    pub fn profile(&self) -> &Map<String, Value> {
        &self.profile
    }

    /// Returns the backend identifier of the logged-in user, if present.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.profile
            .get("_id")
            .and_then(Value::as_str)
            .filter(|value| !value.trim().is_empty())
    }
}
