//! Health check endpoint for monitoring

use crate::{error::ApiResult, state::AppState};
use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use vanedu_store::StoreCounts;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Seconds since the server state was built
    pub uptime_seconds: u64,
    /// Records held per collection
    pub records: RecordCounts,
}

/// Records held per collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCounts {
    /// Users
    pub users: usize,
    /// Categories
    pub categories: usize,
    /// Subscription plans
    pub subscription_plans: usize,
    /// Payments
    pub payments: usize,
}

impl From<StoreCounts> for RecordCounts {
    fn from(counts: StoreCounts) -> Self {
        Self {
            users: counts.users,
            categories: counts.categories,
            subscription_plans: counts.plans,
            payments: counts.payments,
        }
    }
}

/// `GET /health`
///
/// # Errors
///
/// Fails with 500 if a repository cannot be counted.
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<Json<HealthResponse>> {
    let records = state.store.counts().await?.into();
    let uptime_seconds = state.uptime().as_secs();

    debug!(uptime_seconds, "Health check");
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        uptime_seconds,
        records,
    }))
}
