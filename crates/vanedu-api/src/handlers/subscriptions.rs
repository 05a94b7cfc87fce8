//! Subscription plan endpoints

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
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;
use vanedu_core::types::Identifiable;
use vanedu_core::{ApiResponse, Error, SubscriptionPlan};

use super::{JsonBody, validate_non_negative};

/// Body of `POST /api/subscriptions`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlanRequest {
    /// Plan name
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Price per billing period
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "validate_non_negative"))]
    pub price: Decimal,

    /// Billing period in months
    #[validate(range(min = 1, max = 120))]
    pub duration: u32,

    /// Feature list, empty when omitted
    #[serde(default)]
    #[validate(length(max = 50))]
    pub features: Vec<String>,

    /// Short description
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}

/// Body of `PUT /api/subscriptions/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlanRequest {
    /// Plan name
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    /// Price per billing period
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "validate_non_negative"))]
    pub price: Option<Decimal>,

    /// Billing period in months
    #[validate(range(min = 1, max = 120))]
    pub duration: Option<u32>,

    /// Replacement feature list
    #[validate(length(max = 50))]
    pub features: Option<Vec<String>>,

    /// Short description
    #[validate(length(max = 1000))]
    pub description: Option<String>,
}

impl UpdatePlanRequest {
    fn apply(self, plan: &mut SubscriptionPlan) {
        if let Some(name) = self.name {
            plan.name = name;
        }
        if let Some(price) = self.price {
            plan.price = price;
        }
        if let Some(duration) = self.duration {
            plan.duration = duration;
        }
        if let Some(features) = self.features {
            plan.features = features;
        }
        if let Some(description) = self.description {
            plan.description = description;
        }
    }
}

/// `GET /api/subscriptions?page&limit&search`
///
/// # Errors
///
/// Fails with 400 on invalid paging parameters.
pub async fn list_plans(
    State(state): State<Arc<AppState>>,
    params: ListParams,
) -> ApiResult<Json<ApiResponse<Vec<SubscriptionPlan>>>> {
    let page = state.store.plans.list(&params.query(&[])).await?;
    Ok(Json(page.into()))
}

/// `GET /api/subscriptions/:id`
///
/// # Errors
///
/// Fails with 404 if no plan has the id.
pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SubscriptionPlan>>> {
    let plan = state
        .store
        .plans
        .get(&id)
        .await?
        .ok_or_else(|| Error::not_found(SubscriptionPlan::KIND, &id))?;

    Ok(Json(ApiResponse::data(plan)))
}

/// `POST /api/subscriptions`
///
/// # Errors
///
/// Fails with 400 if the body is malformed or invalid.
pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    body: JsonBody<CreatePlanRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<SubscriptionPlan>>)> {
    let ValidatedJson(request) =
        body.map_err(|e| e.during("Failed to create subscription plan"))?;

    let plan = state
        .store
        .plans
        .create(SubscriptionPlan {
            id: String::new(),
            name: request.name,
            price: request.price,
            duration: request.duration,
            features: request.features,
            description: request.description,
            created_at: chrono::Utc::now(),
        })
        .await?;
    info!(plan_id = %plan.id, price = %plan.price, "Subscription plan created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            plan,
            "Subscription plan created successfully",
        )),
    ))
}

/// `PUT /api/subscriptions/:id`
///
/// # Errors
///
/// Fails with 400 on an invalid body and 404 if no plan has the id.
pub async fn update_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody<UpdatePlanRequest>,
) -> ApiResult<Json<ApiResponse<SubscriptionPlan>>> {
    let ValidatedJson(changes) =
        body.map_err(|e| e.during("Failed to update subscription plan"))?;

    let mut plan = state
        .store
        .plans
        .get(&id)
        .await?
        .ok_or_else(|| Error::not_found(SubscriptionPlan::KIND, &id))?;
    changes.apply(&mut plan);

    let plan = state.store.plans.replace(&id, plan).await?;
    info!(plan_id = %id, "Subscription plan updated");

    Ok(Json(ApiResponse::with_message(
        plan,
        "Subscription plan updated successfully",
    )))
}

/// `DELETE /api/subscriptions/:id`
///
/// Payments keep their plan name snapshot after the plan is gone.
///
/// # Errors
///
/// Fails with 404 if no plan has the id.
pub async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<SubscriptionPlan>>> {
    let plan = state.store.plans.delete(&id).await?;
    info!(plan_id = %id, "Subscription plan deleted");

    Ok(Json(ApiResponse::with_message(
        plan,
        "Subscription plan deleted successfully",
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_parses_float_price() {
        let request: CreatePlanRequest =
            serde_json::from_str(r#"{"name":"Team","price":49.5,"duration":1}"#).unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.price, Decimal::new(495, 1));
        assert!(request.features.is_empty());
    }

    #[test]
    fn test_negative_price_rejected() {
        let request: CreatePlanRequest =
            serde_json::from_str(r#"{"name":"Team","price":-1,"duration":1}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let request: CreatePlanRequest =
            serde_json::from_str(r#"{"name":"Team","price":0,"duration":0}"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_merge() {
        let mut plan = vanedu_store::seed::subscription_plans()[2].clone();
        let changes: UpdatePlanRequest =
            serde_json::from_str(r#"{"price":12.99,"features":["Everything"]}"#).unwrap();
        assert!(changes.validate().is_ok());

        changes.apply(&mut plan);

        assert_eq!(plan.price, Decimal::new(1299, 2));
        assert_eq!(plan.features, vec!["Everything"]);
        assert_eq!(plan.name, "Basic");
        assert_eq!(plan.duration, 1);
    }

    #[test]
    fn test_update_negative_price_rejected() {
        let changes = UpdatePlanRequest {
            price: Some(Decimal::new(-1, 2)),
            ..UpdatePlanRequest::default()
        };
        assert!(changes.validate().is_err());
    }
}
