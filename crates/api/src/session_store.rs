//! Workflow storage backed by the request's session.

use kirana_prebill::{KeyValueStore, StoreError};
use tower_sessions::Session;

/// Stores workflow entries as string values in the tower-sessions record.
///
/// The session itself is persisted by `PostgresStore` at the end of the
/// request, so entries survive across requests for as long as the cookie
/// stays valid.
#[derive(Debug, Clone)]
pub struct SessionStore {
    session: Session,
}

impl SessionStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl KeyValueStore for SessionStore {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.session
            .get::<String>(key)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn save(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.session
            .insert(key, value)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
