use async_trait::async_trait;
use tokio::sync::RwLock;
use vetclinic_application::SessionStore;
use vetclinic_core::{AppResult, Session};

/// Session store kept in process memory.
#[derive(Default)]
pub struct InMemorySessionStore {
    session: RwLock<Option<Session>>,
}

impl InMemorySessionStore {
    /// Creates an empty in-memory session store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self) -> AppResult<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn set(&self, session: Session) -> AppResult<()> {
        *self.session.write().await = Some(session);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.session.write().await = None;
        Ok(())
    }
}
