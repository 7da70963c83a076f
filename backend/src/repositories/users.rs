//! User repository

use super::{lifecycle_document, Repository};
use crate::store::{self, DocumentStore, StoreError};
use apiboy_shared::User;

lifecycle_document!(User, "users", "usr");

pub type UserRepository = Repository<User>;

impl Repository<User> {
    /// Find the live account registered under `email`
    pub async fn find_by_email(
        store: &dyn DocumentStore,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        store::find_one(store, "email", email).await
    }
}
