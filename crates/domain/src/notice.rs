use std::fmt::{Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long a submission notice stays visible.
pub const NOTICE_DISPLAY_DURATION: Duration = Duration::from_millis(3000);

/// Transient success or failure message shown after a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    message: String,
    is_success: bool,
}

impl Notice {
    /// Creates a success notice.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_success: true,
        }
    }

    /// Creates a failure notice.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_success: false,
        }
    }

    /// Returns the message text.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns whether the notice reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.is_success
    }
}

impl Display for Notice {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        let tag = if self.is_success { "ok" } else { "error" };
        write!(formatter, "[{tag}] {}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::Notice;

    #[test]
    fn notice_renders_with_outcome_tag() {
        assert_eq!(Notice::success("Registrado").to_string(), "[ok] Registrado");
        assert_eq!(
            Notice::failure("Invalid credentials").to_string(),
            "[error] Invalid credentials"
        );
    }
}
