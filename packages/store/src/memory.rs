use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::overlay::KeyValueStore;
use crate::StoreError;

/// In-memory KeyValueStore for testing and as a fallback when no persistent
/// storage is available.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored text for a key, bypassing the envelope codec.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CachedUserInfo, Level, LevelFilter, UserStatusFilter};
    use crate::overlay::{Overlay, OverlayKey, SaveOutcome};

    fn info(email: &str) -> CachedUserInfo {
        CachedUserInfo {
            email: email.to_string(),
            first_name: Some("Test".to_string()),
            last_name: None,
            username: None,
        }
    }

    /// Reads succeed, every write fails.
    #[derive(Clone, Default)]
    struct ReadOnlyStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for ReadOnlyStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn put(&self, key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Write {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            })
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            Err(StoreError::Write {
                key: key.to_string(),
                message: "quota exceeded".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_load_defaults_when_absent() {
        let overlay = Overlay::new(MemoryStore::new());

        assert_eq!(overlay.level_filter().await, LevelFilter::All);
        assert_eq!(overlay.user_filter().await, UserStatusFilter::All);
        assert!(overlay.targets().await.is_empty());
        assert_eq!(overlay.level_of(42).await, Level::One);
        assert!(overlay.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_load_defaults_on_invalid_json() {
        let store = MemoryStore::new();
        store
            .put("userTargets", "{\"1\": oops".to_string())
            .await
            .unwrap();
        store.put("levelFilter", "Level 7".to_string()).await.unwrap();
        let overlay = Overlay::new(store);

        assert!(overlay.targets().await.is_empty());
        assert_eq!(overlay.level_filter().await, LevelFilter::All);
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrips() {
        let overlay = Overlay::new(MemoryStore::new());

        let outcome = overlay.set_level_filter(LevelFilter::Only(Level::Three)).await;
        assert_eq!(outcome, SaveOutcome::Written { revision: 1 });
        assert_eq!(
            overlay.level_filter().await,
            LevelFilter::Only(Level::Three)
        );

        overlay.set_target(5, "  200 tasks per day ").await;
        assert_eq!(
            overlay.target_of(5).await.as_deref(),
            Some("200 tasks per day")
        );

        overlay.set_level(5, Level::Two).await;
        assert_eq!(overlay.level_of(5).await, Level::Two);
    }

    #[tokio::test]
    async fn test_legacy_values_are_readable() {
        let store = MemoryStore::new();
        store.put("userFilter", "Active Users".to_string()).await.unwrap();
        store
            .put("userProjectAssignments", r#"{"3":[10,11]}"#.to_string())
            .await
            .unwrap();
        let overlay = Overlay::new(store.clone());

        assert_eq!(overlay.user_filter().await, UserStatusFilter::Active);
        assert_eq!(overlay.assigned_projects(3).await, vec![10, 11]);

        // The first save upgrades the value to an envelope.
        overlay.unassign(3, 10).await;
        assert!(store.raw("userProjectAssignments").unwrap().contains("\"schema\":1"));
        assert_eq!(overlay.assigned_projects(3).await, vec![11]);
    }

    #[tokio::test]
    async fn test_blank_target_is_ignored() {
        let overlay = Overlay::new(MemoryStore::new());
        assert_eq!(overlay.set_target(1, "   ").await, SaveOutcome::Unchanged);
        assert!(overlay.targets().await.is_empty());
    }

    #[tokio::test]
    async fn test_assign_then_unassign_leaves_remaining_project() {
        let overlay = Overlay::new(MemoryStore::new());

        overlay.set_assignments(7, &[1, 2], info("a@x.io")).await;
        overlay.unassign(7, 1).await;

        assert_eq!(overlay.assigned_projects(7).await, vec![2]);
        assert!(overlay.user_info_cache().await.contains_key(&7));
    }

    #[tokio::test]
    async fn test_unassigning_last_project_forgets_user() {
        let overlay = Overlay::new(MemoryStore::new());

        overlay.set_assignments(7, &[4], info("a@x.io")).await;
        overlay.unassign(7, 4).await;

        assert!(!overlay.assignments().await.contains_key(&7));
        assert!(!overlay.user_info_cache().await.contains_key(&7));
    }

    #[tokio::test]
    async fn test_set_assignments_dedupes_and_ignores_empty() {
        let overlay = Overlay::new(MemoryStore::new());

        assert_eq!(
            overlay.set_assignments(1, &[], info("a@x.io")).await,
            SaveOutcome::Unchanged
        );
        overlay.set_assignments(1, &[3, 3, 5], info("a@x.io")).await;
        assert_eq!(overlay.assigned_projects(1).await, vec![3, 5]);
    }

    #[tokio::test]
    async fn test_unassign_all() {
        let overlay = Overlay::new(MemoryStore::new());
        overlay.set_assignments(2, &[1, 2, 3], info("b@x.io")).await;

        overlay.unassign_all(2).await;
        assert!(overlay.assigned_projects(2).await.is_empty());
        assert!(overlay.user_info_cache().await.is_empty());
    }

    #[tokio::test]
    async fn test_records_join_every_map() {
        let overlay = Overlay::new(MemoryStore::new());
        overlay.set_target(1, "ship it").await;
        overlay.set_level(2, Level::Three).await;
        overlay.set_assignments(3, &[9], info("c@x.io")).await;

        let records = overlay.records().await;
        let ids: Vec<_> = records.iter().map(|r| r.user_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(records[0].target_label(), "ship it");
        assert_eq!(records[1].level, Level::Three);
        assert_eq!(records[1].target_label(), "-");
        assert_eq!(records[2].projects, vec![9]);
        assert_eq!(records[2].info.as_ref().unwrap().email, "c@x.io");
    }

    #[tokio::test]
    async fn test_delete_record_removes_from_enumeration() {
        let overlay = Overlay::new(MemoryStore::new());
        overlay.set_target(1, "a").await;
        overlay.set_level(1, Level::Two).await;
        overlay.set_assignments(1, &[5], info("a@x.io")).await;
        overlay.set_target(2, "b").await;

        overlay.delete_record(1).await;

        let records = overlay.records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].user_id, 2);
        assert_eq!(overlay.record(1).await.level, Level::One);
    }

    #[tokio::test]
    async fn test_concurrent_writer_is_reported() {
        let store = MemoryStore::new();
        let tab_a = Overlay::new(store.clone());
        let tab_b = Overlay::new(store.clone());

        // Both tabs read the same state.
        assert!(tab_a.targets().await.is_empty());
        assert!(tab_b.targets().await.is_empty());

        let first = tab_a.set_target(1, "from a").await;
        assert_eq!(first, SaveOutcome::Written { revision: 1 });

        // Tab B never saw revision 1; its write wins but is flagged.
        let stale = tab_b.targets().await;
        let second = tab_b.save(OverlayKey::UserTargets, &stale).await;
        assert_eq!(
            second,
            SaveOutcome::Written { revision: 2 },
            "re-reading before writing observes the newer revision"
        );

        let mut blind = std::collections::BTreeMap::new();
        blind.insert(9_i64, "from a again".to_string());
        tab_a.save(OverlayKey::UserTargets, &blind).await;
        let third = tab_b.save(OverlayKey::UserTargets, &stale).await;
        assert_eq!(
            third,
            SaveOutcome::Overwrote {
                previous: 3,
                revision: 4
            }
        );
    }

    #[tokio::test]
    async fn test_write_failures_are_reported_not_raised() {
        let overlay = Overlay::new(ReadOnlyStore::default());

        assert_eq!(overlay.set_level(1, Level::Two).await, SaveOutcome::Failed);
        assert_eq!(overlay.level_of(1).await, Level::One);
        assert_eq!(overlay.remove(OverlayKey::UserLevels).await, SaveOutcome::Failed);
    }

    #[tokio::test]
    async fn test_remove_key() {
        let store = MemoryStore::new();
        let overlay = Overlay::new(store.clone());
        overlay.set_user_filter(UserStatusFilter::Inactive).await;
        assert_eq!(store.len(), 1);

        overlay.remove(OverlayKey::UserFilter).await;
        assert!(store.is_empty());
        assert_eq!(overlay.user_filter().await, UserStatusFilter::All);
    }
}
