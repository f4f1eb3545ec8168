//! # Users as the backend reports them
//!
//! ## [`User`]
//!
//! One account from the role-based users listing. Only `id` and `email` are
//! guaranteed; names and username are often blank for invited accounts, so
//! [`User::display_name`] falls back to the email. `is_active` defaults to
//! `true` when the backend omits it.
//!
//! ## [`UserPage`]
//!
//! One page of the listing: `count` is the server-side total used for
//! pagination, `results` wraps each user in a [`UserRow`], and `user_role` is
//! the **caller's** role, which decides whether they may pick a role when
//! creating accounts.
//!
//! ## [`NewUser`]
//!
//! The create-user payload. See [`NewUser::for_caller`] for the role rule.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use store::{CachedUserInfo, UserId};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Creator as the backend reports it: an id, an email or a username.
    #[serde(default)]
    pub created_by: Option<Value>,
}

fn default_active() -> bool {
    true
}

impl User {
    /// The display fields the overlay caches alongside assignments.
    pub fn to_cached_info(&self) -> CachedUserInfo {
        CachedUserInfo {
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
        }
    }

    /// "First Last" if either name is set, otherwise the email.
    pub fn display_name(&self) -> String {
        self.to_cached_info().display_name()
    }

    /// Whether `creator` created this account. The backend is inconsistent
    /// about how it records the creator, so id, email and username all count.
    pub fn was_created_by(&self, creator: &User) -> bool {
        match &self.created_by {
            Some(Value::Number(id)) => id.as_i64() == Some(creator.id),
            Some(Value::String(key)) => {
                *key == creator.email || creator.username.as_deref() == Some(key.as_str())
            }
            Some(Value::Object(fields)) => {
                fields.get("id").and_then(Value::as_i64) == Some(creator.id)
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRow {
    pub user: User,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<UserRow>,
    #[serde(default)]
    pub user_role: Option<String>,
}

impl UserPage {
    pub fn into_users(self) -> Vec<User> {
        self.results.into_iter().map(|row| row.user).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

impl NewUser {
    pub const DEFAULT_ROLE: &'static str = "User";

    /// Build the payload for the given caller. Only admins may choose the new
    /// account's role; everyone else creates plain `User` accounts.
    pub fn for_caller(
        email: &str,
        first_name: &str,
        last_name: &str,
        requested_role: &str,
        caller_is_admin: bool,
    ) -> Self {
        let role = if caller_is_admin && !requested_role.trim().is_empty() {
            requested_role.trim().to_string()
        } else {
            Self::DEFAULT_ROLE.to_string()
        };
        Self {
            email: email.trim().to_string(),
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_decodes_sparse_rows() {
        let page: UserPage = serde_json::from_str(
            r#"{"count": 12, "user_role": "Administrator",
                "results": [{"user": {"id": 4, "email": "a@x.io"}},
                            {"user": {"id": 5, "email": "b@x.io", "first_name": "Bo", "is_active": false}}]}"#,
        )
        .unwrap();
        assert_eq!(page.count, 12);
        assert_eq!(page.user_role.as_deref(), Some("Administrator"));

        let users = page.into_users();
        assert!(users[0].is_active);
        assert!(!users[1].is_active);
        assert_eq!(users[0].display_name(), "a@x.io");
        assert_eq!(users[1].display_name(), "Bo");
    }

    #[test]
    fn test_created_by_accepts_id_email_or_username() {
        let admin = User {
            id: 1,
            email: "root@x.io".to_string(),
            username: Some("root".to_string()),
            ..User::default()
        };
        for creator in [json!(1), json!("root@x.io"), json!("root"), json!({"id": 1})] {
            let user = User {
                created_by: Some(creator),
                ..User::default()
            };
            assert!(user.was_created_by(&admin));
        }
        let orphan = User {
            created_by: Some(json!(2)),
            ..User::default()
        };
        assert!(!orphan.was_created_by(&admin));
        assert!(!User::default().was_created_by(&admin));
    }

    #[test]
    fn test_page_without_results_is_empty() {
        let page: UserPage = serde_json::from_str(r#"{"detail": "nope"}"#).unwrap();
        assert_eq!(page.count, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_non_admin_cannot_pick_role() {
        let user = NewUser::for_caller(" x@y.io ", "X", "Y", "Manager", false);
        assert_eq!(user.role, "User");
        assert_eq!(user.email, "x@y.io");

        let user = NewUser::for_caller("x@y.io", "X", "Y", "Manager", true);
        assert_eq!(user.role, "Manager");

        let user = NewUser::for_caller("x@y.io", "X", "Y", " ", true);
        assert_eq!(user.role, "User");
    }
}
