//! Repositories over the document store
//!
//! Entities with a created/updated/deleted lifecycle share the generic
//! [`Repository`]; sessions and memberships are hard-deleted and have their
//! own repositories.

pub mod environments;
pub mod folders;
pub mod projects;
pub mod requests;
pub mod sessions;
pub mod users;

pub use environments::EnvironmentRepository;
pub use folders::FolderRepository;
pub use projects::{ProjectRepository, ProjectUserRepository};
pub use requests::RequestRepository;
pub use sessions::SessionRepository;
pub use users::UserRepository;

use crate::store::{self, Document, DocumentStore, StoreError};
use apiboy_shared::Event;
use std::marker::PhantomData;
use uuid::Uuid;

/// Document with lifecycle events, soft-deleted rather than removed
pub trait Lifecycle: Document {
    /// Prefix of generated ids, e.g. `usr`
    const ID_PREFIX: &'static str;

    fn set_id(&mut self, id: String);
    fn set_created(&mut self, event: Option<Event>);
    fn set_updated(&mut self, event: Option<Event>);
    fn set_deleted(&mut self, event: Option<Event>);
}

/// Fresh id in the `<prefix>-<uuid>` form
pub fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Generic repository for lifecycle documents
pub struct Repository<D>(PhantomData<D>);

impl<D: Lifecycle> Repository<D> {
    pub fn new_id() -> String {
        new_id(D::ID_PREFIX)
    }

    /// Find a visible document by id
    pub async fn find_by_id(store: &dyn DocumentStore, id: &str) -> Result<Option<D>, StoreError> {
        store::get(store, id).await
    }

    /// Stamp the created event and store the document, assigning a fresh id
    /// unless one is already set
    pub async fn create(
        store: &dyn DocumentStore,
        user_id: &str,
        document: &mut D,
    ) -> Result<(), StoreError> {
        if document.id().is_empty() {
            document.set_id(Self::new_id());
        }
        document.set_created(Some(Event::now(user_id)));
        document.set_updated(None);
        document.set_deleted(None);
        store::put(store, &*document).await
    }

    /// Stamp the updated event and store the document
    pub async fn update(
        store: &dyn DocumentStore,
        user_id: &str,
        document: &mut D,
    ) -> Result<(), StoreError> {
        document.set_updated(Some(Event::now(user_id)));
        store::put(store, &*document).await
    }

    /// Stamp the deleted event; the document reads as absent afterwards
    pub async fn soft_delete(
        store: &dyn DocumentStore,
        user_id: &str,
        document: &mut D,
    ) -> Result<(), StoreError> {
        document.set_deleted(Some(Event::now(user_id)));
        store::put(store, &*document).await
    }

    /// Store a copy under a fresh id with the given name
    ///
    /// The copy is a new creation: its update and delete events are cleared.
    pub async fn duplicate(
        store: &dyn DocumentStore,
        user_id: &str,
        original: &D,
        rename: impl FnOnce(&mut D),
    ) -> Result<D, StoreError>
    where
        D: Clone,
    {
        let mut copy = original.clone();
        copy.set_id(Self::new_id());
        rename(&mut copy);
        Self::create(store, user_id, &mut copy).await?;
        Ok(copy)
    }
}

/// Implement [`Document`] and [`Lifecycle`] for a model with the usual
/// `id`/`created`/`updated`/`deleted` fields
macro_rules! lifecycle_document {
    ($model:ty, $collection:literal, $prefix:literal) => {
        impl $crate::store::Document for $model {
            const COLLECTION: &'static str = $collection;

            fn id(&self) -> &str {
                &self.id
            }

            fn deleted(&self) -> Option<&apiboy_shared::Event> {
                self.deleted.as_ref()
            }
        }

        impl $crate::repositories::Lifecycle for $model {
            const ID_PREFIX: &'static str = $prefix;

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn set_created(&mut self, event: Option<apiboy_shared::Event>) {
                self.created = event;
            }

            fn set_updated(&mut self, event: Option<apiboy_shared::Event>) {
                self.updated = event;
            }

            fn set_deleted(&mut self, event: Option<apiboy_shared::Event>) {
                self.deleted = event;
            }
        }
    };
}

pub(crate) use lifecycle_document;
