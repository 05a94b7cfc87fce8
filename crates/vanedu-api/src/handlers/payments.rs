//! Payment review endpoints

use crate::{
    error::{ApiError, ApiResult},
    extractors::{ListParams, ValidatedJson},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use validator::{Validate, ValidationError};
use vanedu_core::types::Identifiable;
use vanedu_core::{ApiResponse, Error, Payment, PaymentMethod, PaymentStatus};

use super::{JsonBody, validate_non_negative};

/// Fields filterable on `GET /api/payments`
pub const FILTER_FIELDS: &[&str] = &["status", "paymentMethod"];

/// Body of `POST /api/payments`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    /// Paying user
    #[validate(length(min = 1))]
    pub user_id: String,

    /// Purchased plan
    #[validate(length(min = 1))]
    pub plan_id: String,

    /// Amount paid, the plan price when omitted
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "validate_non_negative"))]
    pub amount: Option<Decimal>,

    /// How the payment was made
    pub payment_method: PaymentMethod,

    /// External transaction reference
    #[validate(length(max = 100))]
    pub transaction_id: Option<String>,

    /// Reviewer notes
    #[validate(length(max = 1000))]
    pub notes: Option<String>,

    /// When the payment was made, now when omitted
    pub payment_date: Option<DateTime<Utc>>,
}

/// Body of `PUT /api/payments/:id`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct UpdatePaymentStatusRequest {
    /// Review outcome: `completed` or `rejected`
    #[validate(custom(function = "validate_review_outcome"))]
    pub status: PaymentStatus,
}

fn validate_review_outcome(status: &PaymentStatus) -> Result<(), ValidationError> {
    if PaymentStatus::Pending.can_transition_to(*status) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_review_outcome")
            .with_message("status must be completed or rejected".into()))
    }
}

/// `GET /api/payments?page&limit&status&paymentMethod&search`
///
/// # Errors
///
/// Fails with 400 on invalid paging parameters.
pub async fn list_payments(
    State(state): State<Arc<AppState>>,
    params: ListParams,
) -> ApiResult<Json<ApiResponse<Vec<Payment>>>> {
    let page = state.store.payments.list(&params.query(FILTER_FIELDS)).await?;
    Ok(Json(page.into()))
}

/// `GET /api/payments/:id`
///
/// # Errors
///
/// Fails with 404 if no payment has the id.
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Payment>>> {
    let payment = state
        .store
        .payments
        .get(&id)
        .await?
        .ok_or_else(|| Error::not_found(Payment::KIND, &id))?;

    Ok(Json(ApiResponse::data(payment)))
}

/// `POST /api/payments`
///
/// Copies the user's name and email and the plan's name onto the payment.
/// The copies are not refreshed when the user or plan changes later.
///
/// # Errors
///
/// Fails with 400 if the body is invalid or names an unknown user or plan.
pub async fn create_payment(
    State(state): State<Arc<AppState>>,
    body: JsonBody<CreatePaymentRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Payment>>)> {
    const FAILURE: &str = "Failed to create payment";

    let ValidatedJson(request) = body.map_err(|e| e.during(FAILURE))?;

    let user = state.store.users.get(&request.user_id).await?.ok_or_else(|| {
        ApiError::bad_request(FAILURE, Some(format!("Unknown user: {}", request.user_id)))
    })?;
    let plan = state.store.plans.get(&request.plan_id).await?.ok_or_else(|| {
        ApiError::bad_request(FAILURE, Some(format!("Unknown plan: {}", request.plan_id)))
    })?;

    let payment = state
        .store
        .payments
        .create(Payment {
            id: String::new(),
            user_id: user.id,
            user_name: user.name,
            user_email: user.email,
            plan_id: plan.id,
            plan_name: plan.name,
            amount: request.amount.unwrap_or(plan.price),
            payment_date: request.payment_date.unwrap_or_else(Utc::now),
            payment_method: request.payment_method,
            status: PaymentStatus::Pending,
            transaction_id: request.transaction_id,
            notes: request.notes,
        })
        .await?;
    info!(
        payment_id = %payment.id,
        user_id = %payment.user_id,
        amount = %payment.amount,
        "Payment recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            payment,
            "Payment created successfully",
        )),
    ))
}

/// `PUT /api/payments/:id`: record the review outcome
///
/// Only the status changes. Overwriting an already reviewed payment is
/// allowed and logged.
///
/// # Errors
///
/// Fails with 400 unless the status is `completed` or `rejected`, and with
/// 404 if no payment has the id.
pub async fn update_payment_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody<UpdatePaymentStatusRequest>,
) -> ApiResult<Json<ApiResponse<Payment>>> {
    let ValidatedJson(request) = body.map_err(|e| e.during("Failed to update payment"))?;

    let mut payment = state
        .store
        .payments
        .get(&id)
        .await?
        .ok_or_else(|| Error::not_found(Payment::KIND, &id))?;

    let previous = payment.status;
    if !previous.can_transition_to(request.status) {
        warn!(
            payment_id = %id,
            from = %previous,
            to = %request.status,
            "Overwriting a reviewed payment status"
        );
    }
    payment.status = request.status;

    let payment = state.store.payments.replace(&id, payment).await?;
    info!(payment_id = %id, from = %previous, to = %payment.status, "Payment reviewed");

    Ok(Json(ApiResponse::with_message(
        payment,
        format!("Payment {}", payment_status_verb(request.status)),
    )))
}

const fn payment_status_verb(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Completed => "approved",
        PaymentStatus::Rejected => "rejected",
        PaymentStatus::Pending => "reopened",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("completed", true)]
    #[case("rejected", true)]
    #[case("pending", false)]
    fn test_review_outcome_validation(#[case] status: &str, #[case] valid: bool) {
        let request: UpdatePaymentStatusRequest =
            serde_json::from_str(&format!(r#"{{"status":"{status}"}}"#)).unwrap();

        assert_eq!(request.validate().is_ok(), valid);
    }

    #[test]
    fn test_unknown_status_fails_to_parse() {
        assert!(serde_json::from_str::<UpdatePaymentStatusRequest>(r#"{"status":"refunded"}"#).is_err());
    }

    #[test]
    fn test_create_request_optional_fields() {
        let request: CreatePaymentRequest = serde_json::from_str(
            r#"{"userId":"4","planId":"3","paymentMethod":"credit_card"}"#,
        )
        .unwrap();

        assert!(request.validate().is_ok());
        assert!(request.amount.is_none());
        assert!(request.payment_date.is_none());
        assert_eq!(request.payment_method, PaymentMethod::CreditCard);
    }

    #[test]
    fn test_create_request_negative_amount_rejected() {
        let request: CreatePaymentRequest = serde_json::from_str(
            r#"{"userId":"4","planId":"3","paymentMethod":"paypal","amount":-5}"#,
        )
        .unwrap();

        assert!(request.validate().is_err());
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(payment_status_verb(PaymentStatus::Completed), "approved");
        assert_eq!(payment_status_verb(PaymentStatus::Rejected), "rejected");
    }
}
