//! In-memory [`AdminBackend`] for tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use store::{ProjectId, UserId};

use crate::client::AdminBackend;
use crate::error::ApiError;
use crate::models::{
    Membership, NewUser, Project, ProjectCreator, Role, RoleGrant, RoleGrantResponse, User,
    UserPage, UserRow,
};

#[derive(Default)]
pub struct FakeBackend {
    pub me: Option<User>,
    pub users: RefCell<Vec<User>>,
    pub caller_role: Option<String>,
    pub projects: Vec<Project>,
    pub roles: BTreeMap<String, Vec<Role>>,
    /// Emails whose role lookup fails.
    pub broken_roles: BTreeSet<String>,
    /// Projects whose membership calls fail.
    pub broken_projects: BTreeSet<ProjectId>,
    pub members: RefCell<BTreeSet<(UserId, ProjectId)>>,
    /// Every email passed to `user_roles`, in call order.
    pub role_lookups: RefCell<Vec<String>>,
    pub healthy: bool,
}

pub fn user(id: UserId, email: &str) -> User {
    User {
        id,
        email: email.to_string(),
        is_active: true,
        ..User::default()
    }
}

pub fn role(name: &str) -> Role {
    Role {
        name: name.to_string(),
        ..Role::default()
    }
}

pub fn project(id: ProjectId, title: &str, creator: UserId) -> Project {
    Project {
        id,
        title: title.to_string(),
        created_by: Some(ProjectCreator {
            id: creator,
            email: None,
        }),
        ..Project::default()
    }
}

fn unavailable() -> ApiError {
    ApiError::status(503, "unavailable")
}

impl AdminBackend for FakeBackend {
    async fn current_user(&self) -> Result<User, ApiError> {
        self.me.clone().ok_or_else(|| ApiError::status(401, "not signed in"))
    }

    async fn list_users(&self, page: u32, page_size: u32) -> Result<UserPage, ApiError> {
        let users = self.users.borrow();
        let start = ((page.max(1) - 1) * page_size) as usize;
        Ok(UserPage {
            count: users.len() as u64,
            results: users
                .iter()
                .skip(start)
                .take(page_size as usize)
                .cloned()
                .map(|user| UserRow { user })
                .collect(),
            user_role: self.caller_role.clone(),
        })
    }

    async fn create_user(&self, new: &NewUser) -> Result<(), ApiError> {
        let mut users = self.users.borrow_mut();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        users.push(user(id, &new.email));
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        self.users.borrow_mut().retain(|u| u.id != id);
        Ok(())
    }

    async fn list_projects(&self, _page_size: u32) -> Result<Vec<Project>, ApiError> {
        Ok(self.projects.clone())
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>, ApiError> {
        Ok(Vec::new())
    }

    async fn add_project_member(&self, user: UserId, project: ProjectId) -> Result<(), ApiError> {
        if self.broken_projects.contains(&project) {
            return Err(unavailable());
        }
        self.members.borrow_mut().insert((user, project));
        Ok(())
    }

    async fn remove_project_member(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> Result<(), ApiError> {
        if self.broken_projects.contains(&project) {
            return Err(unavailable());
        }
        self.members.borrow_mut().remove(&(user, project));
        Ok(())
    }

    async fn user_roles(&self, email: &str) -> Result<Vec<Role>, ApiError> {
        self.role_lookups.borrow_mut().push(email.to_string());
        if self.broken_roles.contains(email) {
            return Err(unavailable());
        }
        Ok(self.roles.get(email).cloned().unwrap_or_default())
    }

    async fn grant_roles(&self, grant: &RoleGrant) -> Result<RoleGrantResponse, ApiError> {
        Ok(RoleGrantResponse {
            success: true,
            assigned_roles: grant.selected_roles.iter().map(|name| role(name)).collect(),
            ..RoleGrantResponse::default()
        })
    }

    async fn available_roles(&self) -> Result<Vec<Role>, ApiError> {
        Ok(vec![role("admin"), role("manager"), role("annotator")])
    }

    async fn health(&self) -> Result<(), ApiError> {
        if self.healthy {
            Ok(())
        } else {
            Err(unavailable())
        }
    }
}
