use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use vetclinic_application::SessionStore;
use vetclinic_core::{AppError, AppResult, Session};

#[cfg(unix)]
const SESSION_FILE_MODE: u32 = 0o600;

/// Session store persisted as a JSON file so it survives restarts.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> AppResult<Option<Session>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read session file '{}': {error}",
                    self.path.display()
                )));
            }
        };

        match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) => Ok(Some(session)),
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "ignoring unreadable session file"
                );
                Ok(None)
            }
        }
    }

    async fn set(&self, session: Session) -> AppResult<()> {
        let payload = serde_json::to_vec_pretty(&session).map_err(|error| {
            AppError::Internal(format!("failed to serialize session: {error}"))
        })?;

        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create session directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        write_private(&self.path, &payload).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write session file '{}': {error}",
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session removed");
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(AppError::Internal(format!(
                "failed to remove session file '{}': {error}",
                self.path.display()
            ))),
        }
    }
}

/// Writes `payload`, readable and writable by the owner only on unix.
async fn write_private(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(SESSION_FILE_MODE);

    let mut file = options.open(path).await?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(SESSION_FILE_MODE))
            .await?;
    }
    file.write_all(payload).await?;
    file.flush().await
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use vetclinic_application::SessionStore;
    use vetclinic_core::Session;

    use super::FileSessionStore;

    fn session() -> Session {
        let Value::Object(profile) = json!({"token": "abc", "_id": "u-1", "nombre": "Ana"}) else {
            panic!("profile literal must be an object");
        };
        Session::from_login_response(profile)
            .unwrap_or_else(|error| panic!("session should build: {error}"))
    }

    #[tokio::test]
    async fn missing_file_means_no_session() {
        let directory =
            tempfile::tempdir().unwrap_or_else(|error| panic!("tempdir failed: {error}"));
        let store = FileSessionStore::new(directory.path().join("session.json"));

        assert!(matches!(store.get().await, Ok(None)));
        assert!(store.clear().await.is_ok());
    }

    #[tokio::test]
    async fn session_survives_a_new_store_instance() {
        let directory =
            tempfile::tempdir().unwrap_or_else(|error| panic!("tempdir failed: {error}"));
        let path = directory.path().join("nested").join("session.json");

        let writer = FileSessionStore::new(&path);
        assert!(writer.set(session()).await.is_ok());

        let reader = FileSessionStore::new(&path);
        let restored = reader.get().await.ok().flatten();
        assert_eq!(restored.as_ref().map(Session::token), Some("abc"));
        assert_eq!(restored, Some(session()));

        assert!(reader.clear().await.is_ok());
        assert!(matches!(writer.get().await, Ok(None)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn session_file_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let directory =
            tempfile::tempdir().unwrap_or_else(|error| panic!("tempdir failed: {error}"));
        let path = directory.path().join("session.json");
        if let Err(error) = tokio::fs::write(&path, b"{}").await {
            panic!("failed to seed session file: {error}");
        }

        let store = FileSessionStore::new(&path);
        assert!(store.set(session()).await.is_ok());

        let metadata = tokio::fs::metadata(&path)
            .await
            .unwrap_or_else(|error| panic!("failed to stat session file: {error}"));
        assert_eq!(metadata.permissions().mode() & 0o777, 0o600);
    }

    #[tokio::test]
    async fn corrupt_file_is_ignored() {
        let directory =
            tempfile::tempdir().unwrap_or_else(|error| panic!("tempdir failed: {error}"));
        let path = directory.path().join("session.json");
        if let Err(error) = tokio::fs::write(&path, b"{not json").await {
            panic!("failed to seed corrupt file: {error}");
        }

        let store = FileSessionStore::new(&path);
        assert!(matches!(store.get().await, Ok(None)));
    }
}
