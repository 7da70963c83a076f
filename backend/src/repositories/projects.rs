//! Project and membership repositories

use super::{lifecycle_document, Repository};
use crate::store::{self, Document, DocumentStore, StoreError};
use apiboy_shared::{Project, ProjectUser};

lifecycle_document!(Project, "projects", "pro");

pub type ProjectRepository = Repository<Project>;

impl Document for ProjectUser {
    const COLLECTION: &'static str = "projectusers";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Repository for project memberships
///
/// Memberships are keyed by `<project id>-<user id>`, so a user holds at most
/// one membership per project.
pub struct ProjectUserRepository;

impl ProjectUserRepository {
    pub fn membership_id(project_id: &str, user_id: &str) -> String {
        format!("{}-{}", project_id, user_id)
    }

    pub async fn find(
        store: &dyn DocumentStore,
        project_id: &str,
        user_id: &str,
    ) -> Result<Option<ProjectUser>, StoreError> {
        store::get(store, &Self::membership_id(project_id, user_id)).await
    }

    /// Grant `user_id` access to `project_id`; granting twice is a no-op
    pub async fn create(
        store: &dyn DocumentStore,
        project_id: &str,
        user_id: &str,
    ) -> Result<ProjectUser, StoreError> {
        let membership = ProjectUser {
            id: Self::membership_id(project_id, user_id),
            project_id: project_id.to_string(),
            user_id: user_id.to_string(),
        };
        store::put(store, &membership).await?;
        Ok(membership)
    }

    pub async fn delete(
        store: &dyn DocumentStore,
        project_id: &str,
        user_id: &str,
    ) -> Result<(), StoreError> {
        store::remove::<ProjectUser>(store, &Self::membership_id(project_id, user_id)).await
    }

    /// Remove every membership of a project, returning how many were removed
    pub async fn delete_all_for_project(
        store: &dyn DocumentStore,
        project_id: &str,
    ) -> Result<usize, StoreError> {
        let memberships: Vec<ProjectUser> =
            store::find_all(store, "project_id", project_id).await?;
        for membership in &memberships {
            store::remove::<ProjectUser>(store, &membership.id).await?;
        }
        Ok(memberships.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_membership_is_idempotent() {
        let store = MemoryStore::new();
        let first = ProjectUserRepository::create(&store, "pro-1", "usr-1").await.unwrap();
        let second = ProjectUserRepository::create(&store, "pro-1", "usr-1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.id, "pro-1-usr-1");
        assert_eq!(store.find("projectusers", "project_id", "pro-1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_and_delete_membership() {
        let store = MemoryStore::new();
        ProjectUserRepository::create(&store, "pro-1", "usr-1").await.unwrap();

        assert!(ProjectUserRepository::find(&store, "pro-1", "usr-1").await.unwrap().is_some());
        assert!(ProjectUserRepository::find(&store, "pro-1", "usr-2").await.unwrap().is_none());

        ProjectUserRepository::delete(&store, "pro-1", "usr-1").await.unwrap();
        assert!(ProjectUserRepository::find(&store, "pro-1", "usr-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_all_for_project() {
        let store = MemoryStore::new();
        ProjectUserRepository::create(&store, "pro-1", "usr-1").await.unwrap();
        ProjectUserRepository::create(&store, "pro-1", "usr-2").await.unwrap();
        ProjectUserRepository::create(&store, "pro-2", "usr-1").await.unwrap();

        let removed = ProjectUserRepository::delete_all_for_project(&store, "pro-1")
            .await
            .unwrap();
        assert_eq!(removed, 2);
        assert!(ProjectUserRepository::find(&store, "pro-2", "usr-1").await.unwrap().is_some());
    }
}
