//! Roles, per-user role listings and role grants.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned_at: Option<String>,
    #[serde(default)]
    pub assigned_by: Option<String>,
}

impl Role {
    /// The role every user is treated as having when their lookup fails.
    pub fn default_user() -> Self {
        Self {
            name: "user".to_string(),
            display_name: Some("User".to_string()),
            ..Self::default()
        }
    }

    /// Display name, falling back to the machine name.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(&self.name)
    }
}

/// Payload of the per-user roles endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRolesResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_roles: Vec<Role>,
}

impl UserRolesResponse {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub email: String,
    pub selected_roles: Vec<String>,
}

impl RoleGrant {
    /// Validate operator input. Returns a message fit for display on rejection.
    pub fn new(email: &str, selected_roles: &[String]) -> Result<Self, String> {
        let email = email.trim();
        if email.is_empty() {
            return Err("Please enter an email address.".to_string());
        }
        if selected_roles.is_empty() {
            return Err("Please select at least one role.".to_string());
        }
        Ok(Self {
            email: email.to_string(),
            selected_roles: selected_roles.to_vec(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrantResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub assigned_roles: Vec<Role>,
}

impl RoleGrantResponse {
    /// The service reports success either as a flag or as a status string.
    pub fn is_success(&self) -> bool {
        self.success || self.status.as_deref() == Some("success")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_prefers_display_name() {
        let role: Role = serde_json::from_str(r#"{"name": "qa", "display_name": ""}"#).unwrap();
        assert_eq!(role.label(), "qa");
        assert_eq!(Role::default_user().label(), "User");
    }

    #[test]
    fn test_grant_rejects_blank_input() {
        assert!(RoleGrant::new("  ", &["manager".to_string()]).is_err());
        assert!(RoleGrant::new("a@x.io", &[]).is_err());

        let grant = RoleGrant::new(" a@x.io ", &["manager".to_string()]).unwrap();
        assert_eq!(grant.email, "a@x.io");
        assert_eq!(
            serde_json::to_value(&grant).unwrap(),
            serde_json::json!({"email": "a@x.io", "selected_roles": ["manager"]})
        );
    }

    #[test]
    fn test_grant_response_accepts_flag_or_status() {
        let flagged: RoleGrantResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(flagged.is_success());

        let by_status: RoleGrantResponse =
            serde_json::from_str(r#"{"status": "success", "message": "done"}"#).unwrap();
        assert!(by_status.is_success());

        let failed: RoleGrantResponse =
            serde_json::from_str(r#"{"status": "error", "error": "unknown user"}"#).unwrap();
        assert!(!failed.is_success());
        assert!(!RoleGrantResponse::default().is_success());
    }
}
