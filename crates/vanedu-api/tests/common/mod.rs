//! Common helpers for driving the router in-process

#![allow(dead_code, clippy::unwrap_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use vanedu_api::{AppState, build_app};
use vanedu_core::Config;
use vanedu_store::Store;

/// Router over the sample records plus a handle on the same store
pub struct TestApp {
    pub router: Router,
    pub store: Store,
}

impl TestApp {
    /// App backed by the seeded in-memory store and default configuration
    pub fn seeded() -> Self {
        Self::with(Config::default(), Store::seeded())
    }

    /// App backed by an empty store
    pub fn empty() -> Self {
        Self::with(Config::default(), Store::empty())
    }

    /// App with explicit configuration and store
    pub fn with(config: Config, store: Store) -> Self {
        let state = Arc::new(AppState::new(config, store.clone()));
        Self {
            router: build_app(state),
            store,
        }
    }

    /// Send a request and return the status and parsed JSON body
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }
}

/// Names of the records in a list response, in order
pub fn names(body: &Value, field: &str) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record[field].as_str().unwrap().to_string())
        .collect()
}
