//! # Project assignment editor
//!
//! Assigning projects touches two places that are never kept transactional:
//!
//! 1. **Server memberships**: one create (or delete) call per project. These
//!    are best effort. A failure is logged and usually means the membership
//!    already exists (or is already gone), so the editor carries on.
//! 2. **Overlay**: the user's assigned project list and cached display
//!    fields, written after all membership calls have been attempted.
//!
//! Nothing is rolled back. The [`AssignmentReport`] tells the caller which
//! membership calls failed and how the overlay write went, so the UI can say
//! when the two sides may have diverged.

use std::collections::BTreeMap;

use store::{CachedUserInfo, KeyValueStore, Overlay, OverlayRecord, ProjectId, SaveOutcome, UserId};

use crate::client::AdminBackend;
use crate::models::{Project, User};

/// Result of one assign or unassign operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentReport {
    /// Projects whose membership call failed.
    pub membership_failures: Vec<ProjectId>,
    pub overlay: SaveOutcome,
}

impl AssignmentReport {
    fn unchanged() -> Self {
        Self {
            membership_failures: Vec::new(),
            overlay: SaveOutcome::Unchanged,
        }
    }

    /// True when every membership call succeeded and the overlay write was
    /// either unnecessary or clean.
    pub fn is_clean(&self) -> bool {
        self.membership_failures.is_empty()
            && matches!(
                self.overlay,
                SaveOutcome::Unchanged | SaveOutcome::Written { .. }
            )
    }

    /// True when the overlay may no longer match the server or another tab.
    pub fn may_have_diverged(&self) -> bool {
        !self.is_clean()
    }
}

pub struct AssignmentEditor<'a, B, S: KeyValueStore> {
    backend: &'a B,
    overlay: &'a Overlay<S>,
}

impl<'a, B: AdminBackend, S: KeyValueStore> AssignmentEditor<'a, B, S> {
    pub fn new(backend: &'a B, overlay: &'a Overlay<S>) -> Self {
        Self { backend, overlay }
    }

    /// Replace `user`'s assigned projects with `projects`. An empty selection
    /// is a no-op.
    pub async fn assign(&self, user: &User, projects: &[ProjectId]) -> AssignmentReport {
        if projects.is_empty() {
            return AssignmentReport::unchanged();
        }

        let mut membership_failures = Vec::new();
        for &project in projects {
            if let Err(error) = self.backend.add_project_member(user.id, project).await {
                tracing::warn!(user = user.id, project, %error, "membership create failed, it may already exist");
                membership_failures.push(project);
            }
        }

        let overlay = self
            .overlay
            .set_assignments(user.id, projects, user.to_cached_info())
            .await;
        tracing::info!(user = user.id, projects = ?projects, ?overlay, "assigned projects");

        AssignmentReport {
            membership_failures,
            overlay,
        }
    }

    /// Remove one project from `user`.
    pub async fn unassign(&self, user: UserId, project: ProjectId) -> AssignmentReport {
        let mut membership_failures = Vec::new();
        if let Err(error) = self.backend.remove_project_member(user, project).await {
            tracing::warn!(user, project, %error, "membership delete failed, it may not exist");
            membership_failures.push(project);
        }

        let overlay = self.overlay.unassign(user, project).await;
        AssignmentReport {
            membership_failures,
            overlay,
        }
    }

    /// Remove every project assigned to `user` in the overlay. Does nothing
    /// when the user has none.
    pub async fn unassign_all(&self, user: UserId) -> AssignmentReport {
        let assigned = self.overlay.assigned_projects(user).await;
        if assigned.is_empty() {
            return AssignmentReport::unchanged();
        }

        let mut membership_failures = Vec::new();
        for &project in &assigned {
            if let Err(error) = self.backend.remove_project_member(user, project).await {
                tracing::warn!(user, project, %error, "membership delete failed, it may not exist");
                membership_failures.push(project);
            }
        }

        let overlay = self.overlay.unassign_all(user).await;
        tracing::info!(user, count = assigned.len(), ?overlay, "unassigned all projects");
        AssignmentReport {
            membership_failures,
            overlay,
        }
    }
}

/// Projects the caller may hand out.
///
/// Admins see the projects they created. Everyone else sees only the projects
/// assigned to themselves in the overlay, and nothing when they have none.
/// Without a known caller the list is unfiltered.
pub fn assignable_projects(
    projects: Vec<Project>,
    caller: Option<UserId>,
    caller_is_admin: bool,
    assignments: &BTreeMap<UserId, Vec<ProjectId>>,
) -> Vec<Project> {
    let Some(caller) = caller else {
        return projects;
    };
    if caller_is_admin {
        return projects
            .into_iter()
            .filter(|project| project.creator_id() == Some(caller))
            .collect();
    }
    let own = assignments.get(&caller).map(Vec::as_slice).unwrap_or_default();
    projects
        .into_iter()
        .filter(|project| own.contains(&project.id))
        .collect()
}

/// The projects in `ids`, in listing order. Ids no longer on the server are
/// skipped.
pub fn resolve_projects<'p>(projects: &'p [Project], ids: &[ProjectId]) -> Vec<&'p Project> {
    projects
        .iter()
        .filter(|project| ids.contains(&project.id))
        .collect()
}

/// One user's block on the assigned-tasks view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentGroup {
    pub user_id: UserId,
    pub info: CachedUserInfo,
    pub projects: Vec<ProjectId>,
}

/// Overlay assignments the caller may review.
///
/// Admins see every assignment. Other callers see only assignments of users
/// they created, which requires those users to be on the loaded directory
/// page. Display fields come from the page when the user is on it, otherwise
/// from the overlay's cached info; users known to neither are skipped.
pub fn assignment_groups(
    records: &[OverlayRecord],
    page_users: &[User],
    caller: Option<&User>,
    caller_is_admin: bool,
) -> Vec<AssignmentGroup> {
    records
        .iter()
        .filter(|record| !record.projects.is_empty())
        .filter_map(|record| {
            let on_page = page_users.iter().find(|user| user.id == record.user_id);
            if !caller_is_admin {
                let caller = caller?;
                if !on_page.is_some_and(|user| user.was_created_by(caller)) {
                    return None;
                }
            }
            let info = on_page
                .map(User::to_cached_info)
                .or_else(|| record.info.clone())?;
            Some(AssignmentGroup {
                user_id: record.user_id,
                info,
                projects: record.projects.clone(),
            })
        })
        .collect()
}

/// Check or uncheck a project in the assign dialog.
pub fn toggle(selection: &mut Vec<ProjectId>, id: ProjectId) {
    if let Some(pos) = selection.iter().position(|selected| *selected == id) {
        selection.remove(pos);
    } else {
        selection.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{project, user, FakeBackend};
    use store::MemoryStore;

    #[tokio::test]
    async fn test_assign_then_unassign_leaves_the_rest() {
        let backend = FakeBackend::default();
        let overlay = Overlay::new(MemoryStore::new());
        let editor = AssignmentEditor::new(&backend, &overlay);
        let alice = user(9, "alice@example.com");

        let report = editor.assign(&alice, &[1, 2]).await;
        assert!(report.is_clean());
        assert_eq!(overlay.assigned_projects(9).await, vec![1, 2]);
        assert!(backend.members.borrow().contains(&(9, 1)));

        let report = editor.unassign(9, 1).await;
        assert!(report.is_clean());
        assert_eq!(overlay.assigned_projects(9).await, vec![2]);
        assert!(!backend.members.borrow().contains(&(9, 1)));
        assert_eq!(
            overlay.user_info_cache().await[&9].email,
            "alice@example.com"
        );
    }

    #[tokio::test]
    async fn test_failed_memberships_still_update_overlay() {
        let mut backend = FakeBackend::default();
        backend.broken_projects.insert(2);
        let overlay = Overlay::new(MemoryStore::new());
        let editor = AssignmentEditor::new(&backend, &overlay);

        let report = editor.assign(&user(4, "d@x.io"), &[1, 2, 3]).await;
        assert_eq!(report.membership_failures, vec![2]);
        assert!(report.overlay.is_persisted());
        assert!(report.may_have_diverged());
        assert_eq!(overlay.assigned_projects(4).await, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_assign_replaces_previous_selection() {
        let backend = FakeBackend::default();
        let overlay = Overlay::new(MemoryStore::new());
        let editor = AssignmentEditor::new(&backend, &overlay);
        let bob = user(2, "bob@x.io");

        editor.assign(&bob, &[1, 2]).await;
        editor.assign(&bob, &[3]).await;
        assert_eq!(overlay.assigned_projects(2).await, vec![3]);

        let report = editor.assign(&bob, &[]).await;
        assert_eq!(report.overlay, SaveOutcome::Unchanged);
        assert_eq!(overlay.assigned_projects(2).await, vec![3]);
    }

    #[tokio::test]
    async fn test_unassign_all_clears_user_and_memberships() {
        let backend = FakeBackend::default();
        let overlay = Overlay::new(MemoryStore::new());
        let editor = AssignmentEditor::new(&backend, &overlay);

        editor.assign(&user(5, "e@x.io"), &[1, 2]).await;
        let report = editor.unassign_all(5).await;
        assert!(report.is_clean());
        assert!(overlay.assigned_projects(5).await.is_empty());
        assert!(!overlay.user_info_cache().await.contains_key(&5));
        assert!(backend.members.borrow().is_empty());

        let report = editor.unassign_all(5).await;
        assert_eq!(report.overlay, SaveOutcome::Unchanged);
    }

    #[test]
    fn test_admin_sees_own_projects() {
        let projects = vec![project(1, "a", 7), project(2, "b", 8), project(3, "c", 7)];
        let ids: Vec<ProjectId> =
            assignable_projects(projects, Some(7), true, &BTreeMap::new())
                .iter()
                .map(|p| p.id)
                .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_non_admin_sees_only_own_assignments() {
        let projects = vec![project(1, "a", 7), project(2, "b", 8), project(3, "c", 7)];
        let assignments = BTreeMap::from([(4, vec![2, 3]), (5, vec![1])]);

        let ids: Vec<ProjectId> = assignable_projects(projects.clone(), Some(4), false, &assignments)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);

        assert!(assignable_projects(projects.clone(), Some(6), false, &assignments).is_empty());
        assert_eq!(assignable_projects(projects, None, false, &assignments).len(), 3);
    }

    #[tokio::test]
    async fn test_assignment_groups_visibility() {
        let backend = FakeBackend::default();
        let overlay = Overlay::new(MemoryStore::new());
        let editor = AssignmentEditor::new(&backend, &overlay);

        let me = user(1, "me@x.io");
        let mine = User {
            created_by: Some(serde_json::json!(1)),
            ..user(2, "mine@x.io")
        };
        let theirs = user(3, "theirs@x.io");
        let departed = user(4, "gone@x.io");
        editor.assign(&mine, &[10]).await;
        editor.assign(&theirs, &[11]).await;
        editor.assign(&departed, &[12]).await;
        overlay.set_level(5, store::Level::Two).await;

        let records = overlay.records().await;
        let page = vec![mine.clone(), theirs.clone()];

        let admin_view = assignment_groups(&records, &page, Some(&me), true);
        let ids: Vec<UserId> = admin_view.iter().map(|g| g.user_id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert_eq!(admin_view[2].info.email, "gone@x.io");

        let own_view = assignment_groups(&records, &page, Some(&me), false);
        assert_eq!(own_view.len(), 1);
        assert_eq!(own_view[0].user_id, 2);
        assert_eq!(own_view[0].projects, vec![10]);

        assert!(assignment_groups(&records, &page, None, false).is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut selection = vec![1, 2];
        toggle(&mut selection, 3);
        toggle(&mut selection, 1);
        assert_eq!(selection, vec![2, 3]);
    }

    #[test]
    fn test_resolve_projects_skips_missing() {
        let projects = vec![project(1, "a", 7), project(2, "b", 8)];
        let resolved = resolve_projects(&projects, &[2, 99]);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].title, "b");
    }
}
