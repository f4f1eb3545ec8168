//! # Role resolution
//!
//! The users listing carries no roles, so the console looks each user up on
//! the roles service, **one call at a time** and in directory order. A failed
//! lookup never blocks the others: that user is given the default
//! [`Role::default_user`] and resolution moves on.
//!
//! When a user holds several roles, the table shows a single primary role:
//! the first role in server order whose name is one of
//! [`PRIMARY_ROLE_NAMES`], else the first role, else `"User"`.

use std::collections::BTreeMap;

use store::UserId;

use crate::client::AdminBackend;
use crate::models::{Role, RoleGrant, RoleGrantResponse, User};
use crate::ApiError;

pub const PRIMARY_ROLE_NAMES: [&str; 4] = ["admin", "manager", "annotator", "reviewer"];

const FALLBACK_LABEL: &str = "User";

pub type RoleMap = BTreeMap<UserId, Vec<Role>>;

/// Look up every user's roles sequentially.
pub async fn resolve_roles<B: AdminBackend>(backend: &B, users: &[User]) -> RoleMap {
    let mut roles = RoleMap::new();
    for user in users {
        let held = match backend.user_roles(&user.email).await {
            Ok(held) => held,
            Err(error) => {
                tracing::warn!(user = user.id, email = %user.email, %error, "role lookup failed, using default");
                vec![Role::default_user()]
            }
        };
        roles.insert(user.id, held);
    }
    roles
}

/// The role surfaced for a user holding `roles`.
pub fn primary_role(roles: &[Role]) -> Option<&Role> {
    roles
        .iter()
        .find(|role| PRIMARY_ROLE_NAMES.contains(&role.name.to_lowercase().as_str()))
        .or_else(|| roles.first())
}

/// Display label of the primary role, `"User"` when none.
pub fn primary_role_label(roles: &[Role]) -> String {
    primary_role(roles)
        .map(|role| role.label().to_string())
        .unwrap_or_else(|| FALLBACK_LABEL.to_string())
}

/// Label for one user in a resolved map. Users not yet resolved read as
/// `"User"`.
pub fn role_label_of(map: &RoleMap, user: UserId) -> String {
    map.get(&user)
        .map(|roles| primary_role_label(roles))
        .unwrap_or_else(|| FALLBACK_LABEL.to_string())
}

/// Case-insensitive role check; `admin` also matches `administrator`.
pub fn has_role(roles: &[Role], name: &str) -> bool {
    let wanted = name.to_lowercase();
    roles.iter().any(|role| {
        let held = role.name.to_lowercase();
        held == wanted || (wanted == "admin" && held == "administrator")
    })
}

/// Whether the caller role reported alongside the users listing is an admin.
pub fn is_admin_caller(user_role: Option<&str>) -> bool {
    matches!(
        user_role.map(|role| role.trim().to_lowercase()).as_deref(),
        Some("admin" | "administrator")
    )
}

/// Probe the roles service, then submit the grant. A failed probe is only
/// logged; the grant is attempted anyway.
pub async fn grant_with_probe<B: AdminBackend>(
    backend: &B,
    grant: &RoleGrant,
) -> Result<RoleGrantResponse, ApiError> {
    if let Err(error) = backend.health().await {
        tracing::warn!(%error, "roles service health probe failed");
    }
    backend.grant_roles(grant).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{role, user, FakeBackend};

    #[tokio::test]
    async fn test_failed_lookup_falls_back_without_blocking_others() {
        let mut backend = FakeBackend::default();
        backend
            .roles
            .insert("a@x.io".to_string(), vec![role("manager")]);
        backend.broken_roles.insert("b@x.io".to_string());
        backend
            .roles
            .insert("c@x.io".to_string(), vec![role("annotator")]);

        let users = [user(1, "a@x.io"), user(2, "b@x.io"), user(3, "c@x.io")];
        let map = resolve_roles(&backend, &users).await;

        assert_eq!(role_label_of(&map, 1), "manager");
        assert_eq!(role_label_of(&map, 2), "User");
        assert_eq!(map[&2], vec![Role::default_user()]);
        assert_eq!(role_label_of(&map, 3), "annotator");
        assert_eq!(
            *backend.role_lookups.borrow(),
            vec!["a@x.io", "b@x.io", "c@x.io"]
        );
    }

    #[test]
    fn test_primary_role_follows_server_order() {
        let roles = [role("qa"), role("reviewer"), role("admin")];
        assert_eq!(primary_role(&roles).unwrap().name, "reviewer");

        let roles = [role("qa"), role("ops")];
        assert_eq!(primary_role_label(&roles), "qa");

        assert_eq!(primary_role_label(&[]), "User");
    }

    #[test]
    fn test_primary_role_uses_display_name() {
        let mut manager = role("Manager");
        manager.display_name = Some("Project Manager".to_string());
        assert_eq!(primary_role_label(&[role("qa"), manager]), "Project Manager");
    }

    #[test]
    fn test_has_role_matches_administrator_alias() {
        let roles = [role("Administrator")];
        assert!(has_role(&roles, "admin"));
        assert!(has_role(&roles, "ADMINISTRATOR"));
        assert!(!has_role(&roles, "manager"));
    }

    #[test]
    fn test_admin_caller() {
        assert!(is_admin_caller(Some("Administrator")));
        assert!(is_admin_caller(Some(" admin ")));
        assert!(!is_admin_caller(Some("Manager")));
        assert!(!is_admin_caller(None));
    }

    #[tokio::test]
    async fn test_grant_survives_failed_probe() {
        let backend = FakeBackend::default();
        let grant = RoleGrant::new("a@x.io", &["manager".to_string()]).unwrap();
        let response = grant_with_probe(&backend, &grant).await.unwrap();
        assert!(response.success);
        assert_eq!(response.assigned_roles[0].name, "manager");
    }
}
