//! Admin login endpoint

use crate::{error::ApiResult, extractors::ValidatedJson, state::AppState};
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;
use vanedu_core::{ApiResponse, AuthUser};

use super::JsonBody;

/// Body of `POST /api/auth/login`
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email
    #[validate(email)]
    pub email: String,

    /// Login password
    #[validate(length(min = 1))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// `POST /api/auth/login`
///
/// The session itself is kept by the client.
///
/// # Errors
///
/// Fails with 400 on a malformed body and 401 on rejected credentials.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: JsonBody<LoginRequest>,
) -> ApiResult<Json<ApiResponse<AuthUser>>> {
    let ValidatedJson(request) = body.map_err(|e| e.during("Failed to sign in"))?;

    let user = state
        .credentials
        .verify(&request.email, &request.password)
        .await
        .inspect_err(|_| warn!(email = %request.email, "Rejected login attempt"))?;

    info!(email = %user.email, "Admin signed in");
    Ok(Json(ApiResponse::with_message(user, "Signed in successfully")))
}
