//! # Overlay: operator metadata the backend does not model
//!
//! [`Overlay`] is the typed layer over an abstract [`KeyValueStore`]. It owns
//! the persisted schema (the [`OverlayKey`]s), the envelope versioning, and
//! every mutation the console performs on targets, levels, project
//! assignments and the user-info cache. The same logic runs against the
//! in-memory store (tests), the filesystem (desktop) and `localStorage` (web).
//!
//! ## Failure model
//!
//! | Operation | On backend failure |
//! |-----------|--------------------|
//! | [`load`](Overlay::load) | logs, returns the key's default |
//! | [`save`](Overlay::save) | logs, returns [`SaveOutcome::Failed`] |
//! | [`remove`](Overlay::remove) | logs, returns [`SaveOutcome::Failed`] |
//!
//! Nothing here ever returns an error to the view. Callers that care whether
//! the write landed inspect the [`SaveOutcome`].
//!
//! ## Concurrent writers
//!
//! There is no locking; the last write wins. Each handle remembers the
//! revision it last observed per key, and a save that finds a newer revision
//! in storage reports [`SaveOutcome::Overwrote`] and logs a warning. Clones of
//! an [`Overlay`] share that memory, so one handle per window is the intended
//! use.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::envelope;
use crate::models::{
    CachedUserInfo, Level, LevelFilter, OverlayRecord, ProjectId, UserId, UserStatusFilter,
};
use crate::StoreError;

/// Async string key/value storage.
pub trait KeyValueStore {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StoreError>>;
    fn put(
        &self,
        key: &str,
        value: String,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn remove(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

/// The persisted schema. Key names match what earlier builds wrote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OverlayKey {
    LevelFilter,
    UserFilter,
    UserTargets,
    UserLevels,
    UserProjectAssignments,
    UserInfoCache,
}

impl OverlayKey {
    pub const ALL: [OverlayKey; 6] = [
        OverlayKey::LevelFilter,
        OverlayKey::UserFilter,
        OverlayKey::UserTargets,
        OverlayKey::UserLevels,
        OverlayKey::UserProjectAssignments,
        OverlayKey::UserInfoCache,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OverlayKey::LevelFilter => "levelFilter",
            OverlayKey::UserFilter => "userFilter",
            OverlayKey::UserTargets => "userTargets",
            OverlayKey::UserLevels => "userLevels",
            OverlayKey::UserProjectAssignments => "userProjectAssignments",
            OverlayKey::UserInfoCache => "userInfoCache",
        }
    }
}

/// Result of a write. Never an error: see the module docs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Nothing needed writing.
    Unchanged,
    Written { revision: u64 },
    /// Written, but storage held a revision this handle had not seen.
    Overwrote { previous: u64, revision: u64 },
    Failed,
}

impl SaveOutcome {
    pub fn is_persisted(self) -> bool {
        !matches!(self, SaveOutcome::Failed)
    }

    /// Combine the outcomes of a multi-key update, keeping the worst.
    pub fn and(self, other: SaveOutcome) -> SaveOutcome {
        fn rank(outcome: SaveOutcome) -> u8 {
            match outcome {
                SaveOutcome::Unchanged => 0,
                SaveOutcome::Written { .. } => 1,
                SaveOutcome::Overwrote { .. } => 2,
                SaveOutcome::Failed => 3,
            }
        }
        if rank(other) > rank(self) {
            other
        } else {
            self
        }
    }
}

type Targets = BTreeMap<UserId, String>;
type Levels = BTreeMap<UserId, Level>;
type Assignments = BTreeMap<UserId, Vec<ProjectId>>;
type InfoCache = BTreeMap<UserId, CachedUserInfo>;

/// Typed overlay over a [`KeyValueStore`].
#[derive(Clone, Debug)]
pub struct Overlay<S: KeyValueStore> {
    store: S,
    seen: Arc<Mutex<HashMap<OverlayKey, u64>>>,
}

impl<S: KeyValueStore> Overlay<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            seen: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn observe(&self, key: OverlayKey, revision: u64) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, revision);
    }

    fn last_seen(&self, key: OverlayKey) -> Option<u64> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .copied()
    }

    /// Read a value, falling back to `T::default()` when it is absent or
    /// unreadable.
    pub async fn load<T: DeserializeOwned + Default>(&self, key: OverlayKey) -> T {
        let raw = match self.store.get(key.as_str()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(error) => {
                tracing::error!(key = key.as_str(), %error, "overlay read failed, using default");
                return T::default();
            }
        };

        match envelope::decode::<T>(key.as_str(), &raw) {
            Ok(decoded) => {
                self.observe(key, decoded.revision);
                decoded.value
            }
            Err(error) => {
                tracing::error!(key = key.as_str(), %error, "overlay value unreadable, using default");
                // Still remember the stored revision so the next save does
                // not report a conflict with a value we chose to discard.
                self.observe(key, envelope::peek_revision(&raw));
                T::default()
            }
        }
    }

    /// Write a value under a fresh revision.
    pub async fn save<T: Serialize>(&self, key: OverlayKey, value: &T) -> SaveOutcome {
        let stored = match self.store.get(key.as_str()).await {
            Ok(raw) => raw.as_deref().map(envelope::peek_revision).unwrap_or(0),
            Err(error) => {
                tracing::warn!(key = key.as_str(), %error, "could not read revision before save");
                self.last_seen(key).unwrap_or(0)
            }
        };
        let revision = stored + 1;

        let raw = match envelope::encode(key.as_str(), value, revision) {
            Ok(raw) => raw,
            Err(error) => {
                tracing::error!(key = key.as_str(), %error, "overlay value not saved");
                return SaveOutcome::Failed;
            }
        };

        if let Err(error) = self.store.put(key.as_str(), raw).await {
            tracing::error!(key = key.as_str(), %error, "overlay value not saved");
            return SaveOutcome::Failed;
        }

        let seen = self.last_seen(key);
        self.observe(key, revision);
        match seen {
            Some(seen) if stored > seen => {
                tracing::warn!(
                    key = key.as_str(),
                    seen,
                    stored,
                    "overlay key was changed elsewhere and has been overwritten"
                );
                SaveOutcome::Overwrote {
                    previous: stored,
                    revision,
                }
            }
            _ => SaveOutcome::Written { revision },
        }
    }

    /// Delete a key entirely.
    pub async fn remove(&self, key: OverlayKey) -> SaveOutcome {
        match self.store.remove(key.as_str()).await {
            Ok(()) => {
                self.observe(key, 0);
                SaveOutcome::Written { revision: 0 }
            }
            Err(error) => {
                tracing::error!(key = key.as_str(), %error, "overlay key not removed");
                SaveOutcome::Failed
            }
        }
    }

    // -- filters ---------------------------------------------------------

    pub async fn level_filter(&self) -> LevelFilter {
        self.load(OverlayKey::LevelFilter).await
    }

    pub async fn set_level_filter(&self, filter: LevelFilter) -> SaveOutcome {
        self.save(OverlayKey::LevelFilter, &filter).await
    }

    pub async fn user_filter(&self) -> UserStatusFilter {
        self.load(OverlayKey::UserFilter).await
    }

    pub async fn set_user_filter(&self, filter: UserStatusFilter) -> SaveOutcome {
        self.save(OverlayKey::UserFilter, &filter).await
    }

    // -- targets ---------------------------------------------------------

    pub async fn targets(&self) -> Targets {
        self.load(OverlayKey::UserTargets).await
    }

    pub async fn target_of(&self, user: UserId) -> Option<String> {
        self.targets().await.remove(&user)
    }

    /// Set a user's target description. Blank text is ignored.
    pub async fn set_target(&self, user: UserId, description: &str) -> SaveOutcome {
        let description = description.trim();
        if description.is_empty() {
            return SaveOutcome::Unchanged;
        }
        let mut targets = self.targets().await;
        targets.insert(user, description.to_string());
        self.save(OverlayKey::UserTargets, &targets).await
    }

    pub async fn clear_target(&self, user: UserId) -> SaveOutcome {
        let mut targets = self.targets().await;
        if targets.remove(&user).is_none() {
            return SaveOutcome::Unchanged;
        }
        self.save(OverlayKey::UserTargets, &targets).await
    }

    // -- levels ----------------------------------------------------------

    pub async fn levels(&self) -> Levels {
        self.load(OverlayKey::UserLevels).await
    }

    pub async fn level_of(&self, user: UserId) -> Level {
        self.levels().await.get(&user).copied().unwrap_or_default()
    }

    pub async fn set_level(&self, user: UserId, level: Level) -> SaveOutcome {
        let mut levels = self.levels().await;
        levels.insert(user, level);
        self.save(OverlayKey::UserLevels, &levels).await
    }

    // -- project assignments ---------------------------------------------

    pub async fn assignments(&self) -> Assignments {
        self.load(OverlayKey::UserProjectAssignments).await
    }

    pub async fn assigned_projects(&self, user: UserId) -> Vec<ProjectId> {
        self.assignments().await.remove(&user).unwrap_or_default()
    }

    pub async fn user_info_cache(&self) -> InfoCache {
        self.load(OverlayKey::UserInfoCache).await
    }

    /// Replace a user's assigned projects and remember their display fields.
    /// An empty selection changes nothing.
    pub async fn set_assignments(
        &self,
        user: UserId,
        projects: &[ProjectId],
        info: CachedUserInfo,
    ) -> SaveOutcome {
        let mut seen = BTreeSet::new();
        let projects: Vec<ProjectId> = projects
            .iter()
            .copied()
            .filter(|id| seen.insert(*id))
            .collect();
        if projects.is_empty() {
            return SaveOutcome::Unchanged;
        }

        let mut assignments = self.assignments().await;
        assignments.insert(user, projects);
        let mut cache = self.user_info_cache().await;
        cache.insert(user, info);

        let first = self
            .save(OverlayKey::UserProjectAssignments, &assignments)
            .await;
        first.and(self.save(OverlayKey::UserInfoCache, &cache).await)
    }

    /// Drop one project from a user. When none remain, the user's assignment
    /// entry and cached info go too.
    pub async fn unassign(&self, user: UserId, project: ProjectId) -> SaveOutcome {
        let mut assignments = self.assignments().await;
        let Some(current) = assignments.get_mut(&user) else {
            return SaveOutcome::Unchanged;
        };
        let before = current.len();
        current.retain(|id| *id != project);
        if current.len() == before {
            return SaveOutcome::Unchanged;
        }

        if !current.is_empty() {
            return self
                .save(OverlayKey::UserProjectAssignments, &assignments)
                .await;
        }

        assignments.remove(&user);
        let outcome = self
            .save(OverlayKey::UserProjectAssignments, &assignments)
            .await;
        outcome.and(self.forget_user_info(user).await)
    }

    /// Drop every project from a user, along with their cached info.
    pub async fn unassign_all(&self, user: UserId) -> SaveOutcome {
        let mut assignments = self.assignments().await;
        let outcome = if assignments.remove(&user).is_some() {
            self.save(OverlayKey::UserProjectAssignments, &assignments)
                .await
        } else {
            SaveOutcome::Unchanged
        };
        outcome.and(self.forget_user_info(user).await)
    }

    async fn forget_user_info(&self, user: UserId) -> SaveOutcome {
        let mut cache = self.user_info_cache().await;
        if cache.remove(&user).is_none() {
            return SaveOutcome::Unchanged;
        }
        self.save(OverlayKey::UserInfoCache, &cache).await
    }

    // -- records ---------------------------------------------------------

    /// Every user the overlay holds anything for, ordered by id.
    pub async fn records(&self) -> Vec<OverlayRecord> {
        let mut targets = self.targets().await;
        let mut levels = self.levels().await;
        let mut assignments = self.assignments().await;
        let mut cache = self.user_info_cache().await;

        let ids: BTreeSet<UserId> = targets
            .keys()
            .chain(levels.keys())
            .chain(assignments.keys())
            .chain(cache.keys())
            .copied()
            .collect();

        ids.into_iter()
            .map(|user_id| OverlayRecord {
                user_id,
                target: targets.remove(&user_id),
                level: levels.remove(&user_id).unwrap_or_default(),
                projects: assignments.remove(&user_id).unwrap_or_default(),
                info: cache.remove(&user_id),
            })
            .collect()
    }

    /// The overlay view of one user; defaults when nothing is stored.
    pub async fn record(&self, user_id: UserId) -> OverlayRecord {
        OverlayRecord {
            user_id,
            target: self.target_of(user_id).await,
            level: self.level_of(user_id).await,
            projects: self.assigned_projects(user_id).await,
            info: self.user_info_cache().await.remove(&user_id),
        }
    }

    /// Remove a user from every overlay map, e.g. after deleting them on the
    /// server.
    pub async fn delete_record(&self, user: UserId) -> SaveOutcome {
        let mut outcome = self.clear_target(user).await;

        let mut levels = self.levels().await;
        if levels.remove(&user).is_some() {
            outcome = outcome.and(self.save(OverlayKey::UserLevels, &levels).await);
        }

        outcome.and(self.unassign_all(user).await)
    }
}
