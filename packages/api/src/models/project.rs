//! Projects and project memberships.
//!
//! The project listing is loosely typed on the backend side: `members` and
//! `batches` are only ever counted here, so they stay as raw JSON values.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use store::{ProjectId, UserId};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_by: Option<ProjectCreator>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_archived: bool,
    #[serde(default)]
    pub task_count: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub members: Vec<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub batches: Vec<Value>,
}

/// The backend sends `null` for unset fields as often as it omits them.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Project {
    pub fn creator_id(&self) -> Option<UserId> {
        self.created_by.as_ref().map(|creator| creator.id)
    }

    /// Title, or `Project #<id>` for untitled projects.
    pub fn label(&self) -> String {
        if self.title.trim().is_empty() {
            format!("Project #{}", self.id)
        } else {
            self.title.clone()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectCreator {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPage {
    #[serde(default)]
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Project>,
}

/// Body of a membership create request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMembership {
    pub user: UserId,
    pub project: ProjectId,
    pub enabled: bool,
}

impl ProjectMembership {
    pub fn new(user: UserId, project: ProjectId) -> Self {
        Self {
            user,
            project,
            enabled: true,
        }
    }
}

/// One row of the membership listing used by the users-target report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub id: i64,
    #[serde(default)]
    pub user: Option<MembershipUser>,
    #[serde(default)]
    pub project: Option<ProjectId>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipUser {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Membership {
    pub fn username(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|user| user.username.as_deref().or(user.email.as_deref()))
            .unwrap_or("-")
    }
}
