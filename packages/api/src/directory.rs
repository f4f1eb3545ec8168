//! User directory filtering, pagination and row selection.
//!
//! Filtering is purely client side and applies to the page already fetched:
//! the server pages by its own `count`, the filters narrow what is visible.

use std::collections::BTreeMap;

use store::{KeyValueStore, Level, LevelFilter, Overlay, UserId, UserStatusFilter};

use crate::client::AdminBackend;
use crate::error::ApiError;
use crate::models::User;
use crate::roles::is_admin_caller;

/// One fetched page of the directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryPage {
    pub users: Vec<User>,
    pub count: u64,
    pub total_pages: u32,
    /// Derived from the caller role the listing reports.
    pub caller_is_admin: bool,
}

pub async fn fetch_page<B: AdminBackend>(
    backend: &B,
    page: u32,
    page_size: u32,
) -> Result<DirectoryPage, ApiError> {
    let listing = backend.list_users(page, page_size).await?;
    let caller_is_admin = is_admin_caller(listing.user_role.as_deref());
    let count = listing.count;
    Ok(DirectoryPage {
        users: listing.into_users(),
        count,
        total_pages: total_pages(count, page_size),
        caller_is_admin,
    })
}

/// The caller as the console sees it at startup.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallerContext {
    pub me: Option<User>,
    pub caller_is_admin: bool,
    /// First directory page, for views that need creator information.
    pub page_users: Vec<User>,
}

/// Identify the caller and load the first directory page. A failed lookup
/// leaves its part at the default.
pub async fn identify_caller<B: AdminBackend>(backend: &B, page_size: u32) -> CallerContext {
    let mut context = CallerContext::default();
    match backend.current_user().await {
        Ok(me) => context.me = Some(me),
        Err(error) => tracing::warn!(%error, "could not identify the current user"),
    }
    match fetch_page(backend, 1, page_size).await {
        Ok(page) => {
            context.caller_is_admin = page.caller_is_admin;
            context.page_users = page.users;
        }
        Err(error) => tracing::warn!(%error, "could not load the first directory page"),
    }
    context
}

/// Users removed by [`delete_users`], and the error that stopped it, if any.
#[derive(Debug, Default)]
pub struct DeleteOutcome {
    pub deleted: Vec<UserId>,
    pub error: Option<ApiError>,
}

/// Delete users one by one, stopping at the first failure. Each user
/// deleted on the server is also dropped from the overlay.
pub async fn delete_users<B: AdminBackend, S: KeyValueStore>(
    backend: &B,
    overlay: &Overlay<S>,
    ids: &[UserId],
) -> DeleteOutcome {
    let mut outcome = DeleteOutcome::default();
    for &id in ids {
        if let Err(error) = backend.delete_user(id).await {
            tracing::error!(user = id, %error, "delete user failed");
            outcome.error = Some(error);
            break;
        }
        overlay.delete_record(id).await;
        outcome.deleted.push(id);
    }
    outcome
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryFilter {
    pub search: String,
    pub status: UserStatusFilter,
    pub level: LevelFilter,
}

impl DirectoryFilter {
    /// Search is a case-insensitive substring match over email, first name
    /// and last name. A blank search matches everyone.
    pub fn matches(&self, user: &User, level: Level) -> bool {
        self.matches_search(user) && self.status.admits(user.is_active) && self.level.admits(level)
    }

    fn matches_search(&self, user: &User) -> bool {
        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        [
            Some(user.email.as_str()),
            user.first_name.as_deref(),
            user.last_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    /// The visible rows. Users without an overlay level count as `Level 1`.
    pub fn apply<'a>(&self, users: &'a [User], levels: &BTreeMap<UserId, Level>) -> Vec<&'a User> {
        users
            .iter()
            .filter(|user| {
                let level = levels.get(&user.id).copied().unwrap_or_default();
                self.matches(user, level)
            })
            .collect()
    }
}

/// ceil(count / page_size), never less than one page.
pub fn total_pages(count: u64, page_size: u32) -> u32 {
    let page_size = u64::from(page_size.max(1));
    let pages = count.div_ceil(page_size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Checked rows of the directory table, in the order they were checked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<UserId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[UserId] {
        &self.ids
    }

    pub fn contains(&self, id: UserId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn toggle(&mut self, id: UserId) {
        if let Some(pos) = self.ids.iter().position(|selected| *selected == id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(id);
        }
    }

    /// Whether every visible row is checked (and there is at least one).
    pub fn covers(&self, visible: &[UserId]) -> bool {
        !visible.is_empty() && visible.iter().all(|id| self.contains(*id))
    }

    /// Header checkbox: clear when everything visible is already checked,
    /// otherwise select exactly the visible rows.
    pub fn toggle_all(&mut self, visible: &[UserId]) {
        if self.covers(visible) {
            self.clear();
        } else {
            self.ids = visible.to_vec();
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::assignment::assignment_groups;
    use crate::fake::{user, FakeBackend};
    use serde_json::Value;
    use store::MemoryStore;

    fn named(id: UserId, email: &str, first: &str, last: &str) -> User {
        User {
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            ..user(id, email)
        }
    }

    fn directory() -> Vec<User> {
        vec![
            named(1, "alice@example.com", "Al", "Ice"),
            named(2, "bob@example.com", "ALICE", "Bob"),
            named(3, "carol@example.com", "Carol", "Malice"),
            named(4, "dave@example.com", "Dave", "Stone"),
            User {
                is_active: false,
                ..named(5, "erin@example.com", "Erin", "Lee")
            },
        ]
    }

    #[test]
    fn test_search_is_case_insensitive_over_email_and_names() {
        let users = directory();
        let filter = DirectoryFilter {
            search: "alice".to_string(),
            ..DirectoryFilter::default()
        };
        let ids: Vec<UserId> = filter
            .apply(&users, &BTreeMap::new())
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let filter = DirectoryFilter {
            search: "  ".to_string(),
            ..DirectoryFilter::default()
        };
        assert_eq!(filter.apply(&users, &BTreeMap::new()).len(), 5);
    }

    #[test]
    fn test_status_and_level_filters() {
        let users = directory();
        let levels = BTreeMap::from([(2, Level::Two), (4, Level::Two)]);

        let inactive = DirectoryFilter {
            status: UserStatusFilter::Inactive,
            ..DirectoryFilter::default()
        };
        let rows = inactive.apply(&users, &levels);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 5);

        let level_two = DirectoryFilter {
            level: LevelFilter::Only(Level::Two),
            status: UserStatusFilter::Active,
            ..DirectoryFilter::default()
        };
        let ids: Vec<UserId> = level_two.apply(&users, &levels).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![2, 4]);

        let level_one = DirectoryFilter {
            level: LevelFilter::Only(Level::One),
            ..DirectoryFilter::default()
        };
        let ids: Vec<UserId> = level_one.apply(&users, &levels).iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn test_fetch_page_reports_admin_caller() {
        let backend = FakeBackend {
            users: RefCell::new((1..=23).map(|id| user(id, &format!("u{id}@x.io"))).collect()),
            caller_role: Some("admin".to_string()),
            ..FakeBackend::default()
        };
        let page = fetch_page(&backend, 3, 10).await.unwrap();
        assert_eq!(page.count, 23);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.users.len(), 3);
        assert!(page.caller_is_admin);
    }

    #[tokio::test]
    async fn test_admin_sees_assignments_without_visiting_directory() {
        let overlay = Overlay::new(MemoryStore::new());
        let assignee = user(2, "assignee@x.io");
        overlay
            .set_assignments(assignee.id, &[10], assignee.to_cached_info())
            .await;

        let backend = FakeBackend {
            me: Some(user(1, "admin@x.io")),
            users: RefCell::new(vec![user(1, "admin@x.io")]),
            caller_role: Some("admin".to_string()),
            ..FakeBackend::default()
        };
        let caller = identify_caller(&backend, 20).await;
        assert!(caller.caller_is_admin);

        let records = overlay.records().await;
        let groups = assignment_groups(
            &records,
            &caller.page_users,
            caller.me.as_ref(),
            caller.caller_is_admin,
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].user_id, 2);
        assert_eq!(groups[0].projects, vec![10]);
    }

    #[tokio::test]
    async fn test_identify_caller_keeps_created_users_for_managers() {
        let me = user(1, "lead@x.io");
        let created = User {
            created_by: Some(Value::from(1)),
            ..user(7, "worker@x.io")
        };
        let backend = FakeBackend {
            me: Some(me.clone()),
            users: RefCell::new(vec![me, created]),
            caller_role: Some("manager".to_string()),
            ..FakeBackend::default()
        };
        let caller = identify_caller(&backend, 20).await;
        assert!(!caller.caller_is_admin);
        assert_eq!(caller.me.as_ref().map(|me| me.id), Some(1));
        assert!(caller.page_users.iter().any(|u| u.id == 7));
    }

    #[tokio::test]
    async fn test_identify_caller_without_signed_in_user() {
        let backend = FakeBackend {
            users: RefCell::new(vec![user(3, "c@x.io")]),
            ..FakeBackend::default()
        };
        let caller = identify_caller(&backend, 20).await;
        assert!(caller.me.is_none());
        assert!(!caller.caller_is_admin);
        assert_eq!(caller.page_users.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_users_drops_overlay_records() {
        let backend = FakeBackend {
            users: RefCell::new(vec![user(1, "a@x.io"), user(2, "b@x.io")]),
            ..FakeBackend::default()
        };
        let overlay = Overlay::new(MemoryStore::new());
        overlay.set_level(1, Level::Three).await;
        overlay.set_target(2, "40/day").await;

        let outcome = delete_users(&backend, &overlay, &[1, 2]).await;
        assert_eq!(outcome.deleted, vec![1, 2]);
        assert!(outcome.error.is_none());
        assert!(backend.users.borrow().is_empty());
        assert!(overlay.records().await.is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
        assert_eq!(total_pages(3, 0), 3);
    }

    #[test]
    fn test_selection_toggle_and_select_all() {
        let mut selection = Selection::new();
        selection.toggle(3);
        selection.toggle(1);
        assert_eq!(selection.ids(), &[3, 1]);
        selection.toggle(3);
        assert_eq!(selection.ids(), &[1]);

        let visible = [1, 2, 4];
        selection.toggle_all(&visible);
        assert!(selection.covers(&visible));
        assert_eq!(selection.len(), 3);

        selection.toggle_all(&visible);
        assert!(selection.is_empty());

        selection.toggle_all(&[]);
        assert!(selection.is_empty());
    }
}
