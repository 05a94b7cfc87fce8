//! API route definitions

use crate::{error::ErrorResponse, handlers, state::AppState};
use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;

/// Resource routes under `/api`
pub fn api_routes() -> Router<Arc<AppState>> {
    use handlers::{categories, payments, subscriptions, users};

    Router::new()
        .route("/api", get(api_info))
        // Users
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Categories
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/api/categories/:id",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        // Subscription plans
        .route(
            "/api/subscriptions",
            get(subscriptions::list_plans).post(subscriptions::create_plan),
        )
        .route(
            "/api/subscriptions/:id",
            get(subscriptions::get_plan)
                .put(subscriptions::update_plan)
                .delete(subscriptions::delete_plan),
        )
        // Payments
        .route(
            "/api/payments",
            get(payments::list_payments).post(payments::create_payment),
        )
        .route(
            "/api/payments/:id",
            get(payments::get_payment).put(payments::update_payment_status),
        )
        // Dashboard
        .route("/api/stats", get(handlers::stats::dashboard_stats))
}

/// Login route
pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/login", post(handlers::auth::login))
}

/// Health check routes
pub fn health_routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Combine all routes into a single router
pub fn build_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(api_routes())
        .merge(auth_routes())
        .merge(health_routes())
        .fallback(not_found_handler)
}

/// Handle 404 Not Found for unknown routes
async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            message: "The requested endpoint does not exist".to_string(),
            code: "ROUTE_NOT_FOUND".to_string(),
            details: None,
        }),
    )
}

/// API info endpoint
async fn api_info() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "api": "VanEdu Admin API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "users": "/api/users",
            "categories": "/api/categories",
            "subscriptions": "/api/subscriptions",
            "payments": "/api/payments",
            "stats": "/api/stats",
            "login": "/api/auth/login",
            "health": "/health"
        }
    }))
}
