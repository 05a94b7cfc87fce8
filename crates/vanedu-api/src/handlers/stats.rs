//! Dashboard overview statistics

use crate::{error::ApiResult, state::AppState};
use axum::{extract::State, response::Json};
use std::sync::Arc;
use tracing::debug;
use vanedu_core::{ApiResponse, DashboardStats};

/// `GET /api/stats`
///
/// Computed from the full collections on every call.
///
/// # Errors
///
/// Fails with 500 if a repository cannot be read.
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<DashboardStats>>> {
    let users = state.store.users.all().await?;
    let categories = state.store.categories.all().await?;
    let payments = state.store.payments.all().await?;

    let stats = DashboardStats::compute(&users, &categories, &payments);
    debug!(
        total_users = stats.total_users,
        pending_payments = stats.pending_payments,
        "Computed dashboard stats"
    );

    Ok(Json(ApiResponse::data(stats)))
}
