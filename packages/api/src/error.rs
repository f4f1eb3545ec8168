//! Backend errors and the messages the console shows for them.
//!
//! Views never show raw errors. They log the [`ApiError`] and display
//! [`ApiError::user_message`] for the [`Action`] that failed, which is the same
//! text whatever the underlying cause.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid backend url `{url}`: {message}")]
    InvalidUrl { url: String, message: String },

    #[error("invalid auth header: {0}")]
    InvalidHeader(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response payload: {0}")]
    Decode(String),

    #[error("server rejected request: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Maximum number of body bytes kept in [`ApiError::Status`].
    const BODY_LIMIT: usize = 512;

    pub(crate) fn status(status: u16, body: &str) -> Self {
        let mut end = body.len().min(Self::BODY_LIMIT);
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        Self::Status {
            status,
            body: body[..end].to_string(),
        }
    }

    /// 401 / 403 responses.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }

    /// The generic operator-facing message for a failed `action`.
    pub fn user_message(&self, action: Action) -> String {
        action.failure_message()
    }
}

/// Operator actions that can fail against the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    FetchUsers,
    FetchProjects,
    FetchRoles,
    AddUser,
    DeleteUsers,
    AssignProjects,
    UnassignProject,
    UnassignAll,
    GrantRoles,
}

impl Action {
    pub fn failure_message(self) -> String {
        match self {
            Action::AddUser => "Add user failed. You may not have permission.".to_string(),
            Action::DeleteUsers => "Delete failed. You may not have permission.".to_string(),
            Action::GrantRoles => "Role assignment failed. You may not have permission.".to_string(),
            other => format!("Failed to {}. Please try again.", other.verb()),
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Action::FetchUsers => "fetch users",
            Action::FetchProjects => "fetch projects",
            Action::FetchRoles => "fetch roles",
            Action::AddUser => "add user",
            Action::DeleteUsers => "delete users",
            Action::AssignProjects => "assign projects",
            Action::UnassignProject => "unassign project",
            Action::UnassignAll => "unassign all projects",
            Action::GrantRoles => "assign roles",
        }
    }
}
