//! # API crate: backend access and console logic
//!
//! Everything the console does that is not rendering lives here: talking to
//! the labeling backend, resolving roles, editing project assignments,
//! filtering the directory and producing report rows. Views in the `ui` crate
//! call into these modules and keep only their own signals.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`client`] | [`AdminBackend`] trait and its reqwest implementation [`LabelStudioClient`] |
//! | [`models`] | Wire types: users, projects, roles, memberships |
//! | [`roles`] | Sequential per-user role lookup and primary-role classification |
//! | [`assignment`] | Two-phase project assignment (server membership, then overlay) |
//! | [`directory`] | Search/status/level filtering, pagination, row selection |
//! | [`reports`] | Project status statistics and placeholder report data |
//! | [`error`] | [`ApiError`] and the operator-facing failure messages |

pub mod assignment;
pub mod client;
pub mod directory;
pub mod error;
pub mod models;
pub mod reports;
pub mod roles;

#[cfg(test)]
mod fake;

pub use client::{AdminBackend, LabelStudioClient};
pub use error::{Action, ApiError};
pub use models::{
    Membership, NewUser, Project, Role, RoleGrant, RoleGrantResponse, User, UserPage,
};

pub use store::{ProjectId, UserId};
