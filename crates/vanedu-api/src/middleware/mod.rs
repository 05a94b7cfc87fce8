//! HTTP middleware

pub mod cors;
pub mod logging;

pub use cors::cors_middleware;
pub use logging::{REQUEST_ID_HEADER, request_logging_middleware};
