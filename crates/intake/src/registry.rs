//! Known users and projects, used to validate mentions.
//!
//! The registry publishes immutable snapshots. Readers clone an `Arc` and
//! keep working on it; a refresh builds a complete new snapshot first and
//! then swaps the pointer, so nobody ever sees a half-loaded registry.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use tokio::sync::RwLock;

use crate::store::{PersistenceStore, StoreError};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrySnapshot {
    users: HashMap<String, i64>,
    projects: HashSet<String>,
}

impl RegistrySnapshot {
    /// Keys are lower-cased on the way in
    pub fn new(
        users: impl IntoIterator<Item = (String, i64)>,
        projects: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|(name, id)| (name.to_lowercase(), id))
                .collect(),
            projects: projects.into_iter().map(|p| p.to_lowercase()).collect(),
        }
    }

    pub fn user_id(&self, name: &str) -> Option<i64> {
        self.users.get(&name.to_lowercase()).copied()
    }

    pub fn has_project(&self, name: &str) -> bool {
        self.projects.contains(&name.to_lowercase())
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn project_count(&self) -> usize {
        self.projects.len()
    }
}

#[derive(Debug, Default)]
pub struct ReferenceRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl ReferenceRegistry {
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Build a registry from the store's current users and projects
    pub async fn load(store: &dyn PersistenceStore) -> Result<Self, StoreError> {
        Ok(Self::new(Self::fetch(store).await?))
    }

    pub async fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.read().await.clone()
    }

    /// Reload from the store. On error the previous snapshot stays in place.
    pub async fn refresh(
        &self,
        store: &dyn PersistenceStore,
    ) -> Result<Arc<RegistrySnapshot>, StoreError> {
        let snapshot = Arc::new(Self::fetch(store).await?);
        *self.current.write().await = snapshot.clone();

        tracing::info!(
            "Registry refreshed: {} users, {} projects",
            snapshot.user_count(),
            snapshot.project_count()
        );
        Ok(snapshot)
    }

    async fn fetch(store: &dyn PersistenceStore) -> Result<RegistrySnapshot, StoreError> {
        let users = store.fetch_usernames().await?;
        let projects = store.fetch_projects().await?;
        Ok(RegistrySnapshot::new(users, projects))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;

    #[test]
    fn test_snapshot_lookups_ignore_case() {
        let snapshot = RegistrySnapshot::new(
            vec![("Alice".to_string(), 7)],
            vec!["Apollo".to_string()],
        );
        assert_eq!(snapshot.user_id("alice"), Some(7));
        assert_eq!(snapshot.user_id("ALICE"), Some(7));
        assert_eq!(snapshot.user_id("bob"), None);
        assert!(snapshot.has_project("apollo"));
        assert!(!snapshot.has_project("gemini"));
    }

    #[tokio::test]
    async fn test_load_and_refresh_swap_snapshot() {
        let store = MemoryStore::new().with_user("alice", 7);
        let registry = ReferenceRegistry::load(&store).await.unwrap();

        let before = registry.snapshot().await;
        assert_eq!(before.user_id("alice"), Some(7));
        assert_eq!(before.user_id("bob"), None);

        store.add_user("bob", 8);
        store.add_project("Apollo");
        let refreshed = registry.refresh(&store).await.unwrap();

        assert_eq!(refreshed.user_id("bob"), Some(8));
        assert!(refreshed.has_project("apollo"));
        // Snapshots handed out earlier are unchanged
        assert_eq!(before.user_id("bob"), None);
        assert_eq!(registry.snapshot().await.user_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let store = MemoryStore::new().with_user("alice", 7);
        let registry = ReferenceRegistry::load(&store).await.unwrap();

        store.fail_reads(true);
        assert!(registry.refresh(&store).await.is_err());
        assert_eq!(registry.snapshot().await.user_id("alice"), Some(7));
    }
}
