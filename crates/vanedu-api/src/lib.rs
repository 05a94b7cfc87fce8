//! `VanEdu` admin dashboard API server library

#![forbid(unsafe_code)]

pub mod auth;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use vanedu_core::Config;
use vanedu_core::context_error::Result;
use vanedu_store::Store;

/// Build the API router with all routes and middleware
///
/// # Errors
///
/// Returns an error if the configuration fails validation.
pub fn build_router(config: Config, store: Store) -> Result<Router> {
    let state = Arc::new(AppState::new(config, store));
    state.validate()?;

    Ok(build_app(state))
}

/// Attach routes and the middleware stack to prepared state
pub fn build_app(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config.api.request_timeout);

    routes::build_router()
        .layer(axum::middleware::from_fn_with_state(
            Arc::clone(&state),
            middleware::cors_middleware,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(
                    middleware::request_logging_middleware,
                ))
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    #[test]
    fn test_build_router_rejects_invalid_config() {
        let mut config = Config::default();
        config.api.default_page_size = 0;

        assert!(build_router(config, Store::empty()).is_err());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let app = build_router(Config::default(), Store::empty()).unwrap();
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
