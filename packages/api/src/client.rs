//! # Backend client
//!
//! [`AdminBackend`] is the seam between console logic and the network: the
//! role resolver, assignment editor and views are generic over it, and tests
//! drive them with in-memory fakes. [`LabelStudioClient`] is the reqwest
//! implementation used by the web and desktop apps.
//!
//! ## Hosts
//!
//! Two base URLs are involved. User, project and membership endpoints live on
//! the main backend (`server.base_url`); the per-user roles listing, role
//! grants and the health probe live on a separate roles service
//! (`server.roles_base_url`).
//!
//! | Operation | Method | Path |
//! |-----------|--------|------|
//! | current user | GET | `/api/current-user/whoami/` |
//! | list users | GET | `/api/role-based-users/?page=&page_size=` |
//! | create user | POST | `/api/role-based-users/` |
//! | delete user | DELETE | `/api/users/{id}/` |
//! | list projects | GET | `/api/projects/?page_size=&show_all=true` |
//! | list memberships | GET | `/api/project-members/` |
//! | add member | POST | `/api/project-members/` |
//! | remove member | DELETE | `/api/project-members/?user_id=&project_id=` |
//! | user roles | GET | roles host `/api/simple-user-roles/?email=` |
//! | grant roles | POST | roles host `/api/role-assignment-enhanced/` |
//! | available roles | GET | `/api/role-assignments/available_roles/` |
//! | health | GET | roles host `/api/server-response/` |

use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use store::config::ServerConfig;
use store::{ConsoleConfig, ProjectId, UserId};

use crate::error::ApiError;
use crate::models::{
    Membership, NewUser, Project, ProjectMembership, ProjectPage, Role, RoleGrant,
    RoleGrantResponse, User, UserPage, UserRolesResponse,
};

/// Everything the console asks of the backend.
pub trait AdminBackend {
    /// The signed-in operator.
    fn current_user(&self) -> impl std::future::Future<Output = Result<User, ApiError>>;

    /// One page of users, 1-based.
    fn list_users(
        &self,
        page: u32,
        page_size: u32,
    ) -> impl std::future::Future<Output = Result<UserPage, ApiError>>;

    fn create_user(
        &self,
        user: &NewUser,
    ) -> impl std::future::Future<Output = Result<(), ApiError>>;

    fn delete_user(&self, id: UserId) -> impl std::future::Future<Output = Result<(), ApiError>>;

    fn list_projects(
        &self,
        page_size: u32,
    ) -> impl std::future::Future<Output = Result<Vec<Project>, ApiError>>;

    fn list_memberships(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Membership>, ApiError>>;

    fn add_project_member(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> impl std::future::Future<Output = Result<(), ApiError>>;

    fn remove_project_member(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> impl std::future::Future<Output = Result<(), ApiError>>;

    /// Roles held by the user with this email. A payload whose `status` is
    /// not `"success"` is an error.
    fn user_roles(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Role>, ApiError>>;

    fn grant_roles(
        &self,
        grant: &RoleGrant,
    ) -> impl std::future::Future<Output = Result<RoleGrantResponse, ApiError>>;

    fn available_roles(&self) -> impl std::future::Future<Output = Result<Vec<Role>, ApiError>>;

    fn health(&self) -> impl std::future::Future<Output = Result<(), ApiError>>;
}

/// reqwest-backed [`AdminBackend`].
#[derive(Clone, Debug)]
pub struct LabelStudioClient {
    client: Client,
    base: Url,
    roles_base: Url,
    token: Option<String>,
}

/// Accepts both a bare list and a paginated `{ results: [...] }` envelope.
#[derive(Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Paged { results: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Listing<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Paged { results } => results,
            Listing::Bare(items) => items,
        }
    }
}

impl LabelStudioClient {
    /// Build a client from the console config. Both base URLs must be
    /// absolute; web builds resolve an empty `base_url` to the page origin
    /// before calling this.
    pub fn new(config: &ConsoleConfig) -> Result<Self, ApiError> {
        Self::from_server(&config.server)
    }

    pub fn from_server(server: &ServerConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: Client::new(),
            base: parse_base(&server.base_url)?,
            roles_base: parse_base(&server.roles_base_url)?,
            token: server
                .token
                .as_deref()
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        join(&self.base, path)
    }

    fn roles_url(&self, path: &str) -> Result<Url, ApiError> {
        join(&self.roles_base, path)
    }

    /// Attach auth and platform request options, then send.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let mut request = request.header(ACCEPT, "application/json");
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Token {token}"))
                .map_err(|e| ApiError::InvalidHeader(e.to_string()))?;
            request = request.header(AUTHORIZATION, value);
        }
        #[cfg(target_arch = "wasm32")]
        {
            request = request.fetch_credentials_include();
        }
        Ok(request.send().await?)
    }
}

fn parse_base(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&normalized).map_err(|e| ApiError::InvalidUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })
}

fn join(base: &Url, path: &str) -> Result<Url, ApiError> {
    base.join(path.trim_start_matches('/'))
        .map_err(|e| ApiError::InvalidUrl {
            url: format!("{base}{path}"),
            message: e.to_string(),
        })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::status(status.as_u16(), &body));
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

async fn expect_success(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::status(status.as_u16(), &body))
}

impl AdminBackend for LabelStudioClient {
    async fn current_user(&self) -> Result<User, ApiError> {
        let request = self.client.get(self.url("api/current-user/whoami/")?);
        read_json(self.send(request).await?).await
    }

    async fn list_users(&self, page: u32, page_size: u32) -> Result<UserPage, ApiError> {
        let request = self
            .client
            .get(self.url("api/role-based-users/")?)
            .query(&[("page", page.max(1)), ("page_size", page_size.max(1))]);
        let page: UserPage = read_json(self.send(request).await?).await?;
        tracing::debug!(count = page.count, rows = page.results.len(), "fetched users");
        Ok(page)
    }

    async fn create_user(&self, user: &NewUser) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url("api/role-based-users/")?)
            .json(user);
        expect_success(self.send(request).await?).await?;
        tracing::info!(email = %user.email, role = %user.role, "created user");
        Ok(())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let request = self.client.delete(self.url(&format!("api/users/{id}/"))?);
        expect_success(self.send(request).await?).await?;
        tracing::info!(user = id, "deleted user");
        Ok(())
    }

    async fn list_projects(&self, page_size: u32) -> Result<Vec<Project>, ApiError> {
        let request = self.client.get(self.url("api/projects/")?).query(&[
            ("page_size", page_size.max(1).to_string()),
            ("show_all", "true".to_string()),
        ]);
        let page: ProjectPage = read_json(self.send(request).await?).await?;
        Ok(page.results)
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>, ApiError> {
        let request = self.client.get(self.url("api/project-members/")?);
        let listing: Listing<Membership> = read_json(self.send(request).await?).await?;
        Ok(listing.into_vec())
    }

    async fn add_project_member(&self, user: UserId, project: ProjectId) -> Result<(), ApiError> {
        let request = self
            .client
            .post(self.url("api/project-members/")?)
            .json(&ProjectMembership::new(user, project));
        expect_success(self.send(request).await?).await
    }

    async fn remove_project_member(
        &self,
        user: UserId,
        project: ProjectId,
    ) -> Result<(), ApiError> {
        let request = self
            .client
            .delete(self.url("api/project-members/")?)
            .query(&[("user_id", user), ("project_id", project)]);
        expect_success(self.send(request).await?).await
    }

    async fn user_roles(&self, email: &str) -> Result<Vec<Role>, ApiError> {
        let request = self
            .client
            .get(self.roles_url("api/simple-user-roles/")?)
            .query(&[("email", email)]);
        let payload: UserRolesResponse = read_json(self.send(request).await?).await?;
        if payload.is_success() {
            Ok(payload.user_roles)
        } else {
            Err(ApiError::Rejected(
                payload
                    .message
                    .unwrap_or_else(|| format!("status `{}`", payload.status)),
            ))
        }
    }

    async fn grant_roles(&self, grant: &RoleGrant) -> Result<RoleGrantResponse, ApiError> {
        let request = self
            .client
            .post(self.roles_url("api/role-assignment-enhanced/")?)
            .json(grant);
        let response: RoleGrantResponse = read_json(self.send(request).await?).await?;
        if !response.is_success() {
            return Err(ApiError::Rejected(
                response
                    .error
                    .or(response.message)
                    .unwrap_or_else(|| "role assignment was not applied".to_string()),
            ));
        }
        tracing::info!(email = %grant.email, roles = ?grant.selected_roles, "granted roles");
        Ok(response)
    }

    async fn available_roles(&self) -> Result<Vec<Role>, ApiError> {
        let request = self
            .client
            .get(self.url("api/role-assignments/available_roles/")?);
        let listing: Listing<Role> = read_json(self.send(request).await?).await?;
        Ok(listing.into_vec())
    }

    async fn health(&self) -> Result<(), ApiError> {
        let request = self.client.get(self.roles_url("api/server-response/")?);
        expect_success(self.send(request).await?).await
    }
}
