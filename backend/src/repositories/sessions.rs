//! Session store
//!
//! One record per issued session token, keyed by the token's session id.
//! Deleting the record revokes the token.

use super::new_id;
use crate::store::{self, Document, DocumentStore, StoreError};
use apiboy_shared::{Event, Session};

impl Document for Session {
    const COLLECTION: &'static str = "tokens";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Repository for server-side session records
pub struct SessionRepository;

impl SessionRepository {
    pub fn new_id() -> String {
        new_id("tok")
    }

    /// Record a new session for `user_id`
    pub async fn create(
        store: &dyn DocumentStore,
        session_id: &str,
        user_id: &str,
    ) -> Result<Session, StoreError> {
        let session = Session {
            id: session_id.to_string(),
            user_id: user_id.to_string(),
            created: Some(Event::now(user_id)),
        };
        store::put(store, &session).await?;
        Ok(session)
    }

    pub async fn find_by_id(
        store: &dyn DocumentStore,
        session_id: &str,
    ) -> Result<Option<Session>, StoreError> {
        store::get(store, session_id).await
    }

    /// Revoke a session; revoking twice is not an error
    pub async fn delete(store: &dyn DocumentStore, session_id: &str) -> Result<(), StoreError> {
        store::remove::<Session>(store, session_id).await
    }
}
