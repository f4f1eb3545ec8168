//! Wire models for the labeling backend.

mod project;
mod role;
mod user;

pub use project::{Membership, MembershipUser, Project, ProjectCreator, ProjectMembership, ProjectPage};
pub use role::{Role, RoleGrant, RoleGrantResponse, UserRolesResponse};
pub use user::{NewUser, User, UserPage, UserRow};
