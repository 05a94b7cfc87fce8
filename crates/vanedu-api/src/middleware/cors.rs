//! CORS middleware driven by `api.cors_origins`

use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};
use vanedu_core::config::ApiConfig;

/// Answers preflight requests and adds CORS headers to responses
///
/// Requests without an `Origin` header pass through untouched. Requests
/// from an origin outside `api.cors_origins` get 403.
pub async fn cors_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let api = &state.config.api;
    if !api.enable_cors {
        return next.run(request).await;
    }

    let Some(origin) = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|h| h.to_str().ok())
        .map(String::from)
    else {
        return next.run(request).await;
    };

    if !is_origin_allowed(&origin, &api.cors_origins) {
        warn!(origin = %origin, "Origin not allowed by CORS policy");
        return StatusCode::FORBIDDEN.into_response();
    }

    if request.method() == Method::OPTIONS {
        debug!(origin = %origin, "Handling CORS preflight request");
        return preflight_response(&origin, api);
    }

    let mut response = next.run(request).await;
    add_cors_headers(&mut response, &origin, api);
    response
}

/// Check if the given origin is allowed by the CORS policy
///
/// `*` allows everything; `*.example.com` allows any subdomain of
/// `example.com` but not `example.com` itself.
fn is_origin_allowed(origin: &str, allowed_origins: &[String]) -> bool {
    allowed_origins.iter().any(|allowed| {
        allowed == "*"
            || allowed == origin
            || allowed
                .strip_prefix('*')
                .is_some_and(|suffix| suffix.starts_with('.') && origin.ends_with(suffix))
    })
}

fn preflight_response(origin: &str, api: &ApiConfig) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;
    add_cors_headers(&mut response, origin, api);

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Accept, Content-Type, Authorization, X-Request-ID"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("86400"),
    );

    response
}

fn add_cors_headers(response: &mut Response, origin: &str, api: &ApiConfig) {
    let wildcard = api.cors_origins.iter().any(|allowed| allowed == "*");
    let headers = response.headers_mut();

    if wildcard {
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        );
    } else if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }

    headers.insert(
        header::ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("X-Request-ID"),
    );
}
