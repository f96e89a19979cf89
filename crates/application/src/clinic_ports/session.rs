use async_trait::async_trait;
use vetclinic_core::{AppResult, Session};

/// Port for the process-wide authenticated session.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the current session, if one was stored.
    async fn get(&self) -> AppResult<Option<Session>>;

    /// Replaces the current session.
    async fn set(&self, session: Session) -> AppResult<()>;

    /// Removes the current session.
    async fn clear(&self) -> AppResult<()>;
}
