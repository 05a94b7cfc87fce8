//! User account endpoints

use crate::{
    error::ApiResult,
    extractors::{ListParams, ValidatedJson},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;
use vanedu_core::types::Identifiable;
use vanedu_core::{ApiResponse, Error, Role, User, UserStatus};

use super::{JsonBody, nullable};

/// Fields filterable on `GET /api/users`
pub const FILTER_FIELDS: &[&str] = &["role", "status"];

/// Body of `POST /api/users`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Login email
    #[validate(email)]
    pub email: String,

    /// Account role
    pub role: Role,

    /// Account status, active when omitted
    #[serde(default)]
    pub status: Option<UserStatus>,

    /// Avatar URL
    #[validate(length(max = 500))]
    pub avatar: Option<String>,
}

/// Body of `PUT /api/users/:id`; omitted fields keep their value
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    /// Display name
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    /// Login email
    #[validate(email)]
    pub email: Option<String>,

    /// Account role
    pub role: Option<Role>,

    /// Account status
    pub status: Option<UserStatus>,

    /// Avatar URL; `null` removes it
    #[serde(default, deserialize_with = "nullable")]
    #[validate(length(max = 500))]
    pub avatar: Option<Option<String>>,
}

impl CreateUserRequest {
    fn into_user(self) -> User {
        User {
            id: String::new(),
            name: self.name,
            email: self.email,
            role: self.role,
            status: self.status.unwrap_or_default(),
            created_at: chrono::Utc::now(),
            avatar: self.avatar,
        }
    }
}

impl UpdateUserRequest {
    fn apply(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(role) = self.role {
            user.role = role;
        }
        if let Some(status) = self.status {
            user.status = status;
        }
        if let Some(avatar) = self.avatar {
            user.avatar = avatar;
        }
    }
}

/// `GET /api/users?page&limit&search&role&status`
///
/// # Errors
///
/// Fails with 400 on invalid paging parameters.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    params: ListParams,
) -> ApiResult<Json<ApiResponse<Vec<User>>>> {
    let query = params.query(FILTER_FIELDS);
    let page = state.store.users.list(&query).await?;

    debug!(
        page = page.meta.page,
        total = page.meta.total,
        "Listed users"
    );
    Ok(Json(page.into()))
}

/// `GET /api/users/:id`
///
/// # Errors
///
/// Fails with 404 if no user has the id.
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state
        .store
        .users
        .get(&id)
        .await?
        .ok_or_else(|| Error::not_found(User::KIND, &id))?;

    Ok(Json(ApiResponse::data(user)))
}

/// `POST /api/users`
///
/// # Errors
///
/// Fails with 400 if the body is malformed or invalid.
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    body: JsonBody<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<User>>)> {
    let ValidatedJson(request) = body.map_err(|e| e.during("Failed to create user"))?;

    let user = state.store.users.create(request.into_user()).await?;
    info!(user_id = %user.id, role = %user.role, "User created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(user, "User created successfully")),
    ))
}

/// `PUT /api/users/:id`
///
/// # Errors
///
/// Fails with 400 on an invalid body and 404 if no user has the id.
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody<UpdateUserRequest>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let ValidatedJson(changes) = body.map_err(|e| e.during("Failed to update user"))?;

    let mut user = state
        .store
        .users
        .get(&id)
        .await?
        .ok_or_else(|| Error::not_found(User::KIND, &id))?;
    changes.apply(&mut user);

    let user = state.store.users.replace(&id, user).await?;
    info!(user_id = %id, "User updated");

    Ok(Json(ApiResponse::with_message(
        user,
        "User updated successfully",
    )))
}

/// `DELETE /api/users/:id`
///
/// # Errors
///
/// Fails with 404 if no user has the id.
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<User>>> {
    let user = state.store.users.delete(&id).await?;
    info!(user_id = %id, "User deleted");

    Ok(Json(ApiResponse::with_message(
        user,
        "User deleted successfully",
    )))
}
