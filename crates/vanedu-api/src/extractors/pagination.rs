//! List query extractor: page window, search term and field filters

use crate::{error::ApiError, state::AppState};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use validator::Validate;
use vanedu_core::ListQuery;
use vanedu_core::config::ApiConfig;

/// Parameters every list endpoint understands
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PageParams {
    /// Page number (1-based)
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: Option<u32>,

    /// Number of items per page
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: Option<u32>,

    /// Free-text search term
    pub search: Option<String>,
}

/// Parsed list request
///
/// Every query parameter other than `page`, `limit` and `search` is kept as
/// a candidate filter; each endpoint picks the fields it filters on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    /// Page number (1-based)
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Free-text search term
    pub search: Option<String>,
    filters: BTreeMap<String, String>,
}

impl ListParams {
    /// Parse and validate a raw query string
    ///
    /// A key given more than once keeps its first value.
    ///
    /// # Errors
    ///
    /// Returns a bad request error if a parameter cannot be parsed, `page`
    /// is zero, or `limit` is outside `1..=max_page_size`.
    pub fn parse(query: &str, api: &ApiConfig) -> Result<Self, ApiError> {
        let invalid = |details: String| ApiError::bad_request("Invalid query parameters", Some(details));

        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(query).map_err(|e| invalid(e.to_string()))?;
        let mut filters = BTreeMap::new();
        for (key, value) in pairs {
            filters.entry(key).or_insert(value);
        }

        let mut number = |key: &str| {
            filters
                .remove(key)
                .map(|raw: String| {
                    raw.parse::<u32>()
                        .map_err(|e| invalid(format!("{key}: {e}")))
                })
                .transpose()
        };
        let params = PageParams {
            page: number("page")?,
            limit: number("limit")?,
            search: filters.remove("search"),
        };
        params.validate().map_err(|e| invalid(e.to_string()))?;

        let limit = params.limit.unwrap_or(api.default_page_size);
        if limit > api.max_page_size {
            return Err(invalid(format!(
                "limit must be at most {}",
                api.max_page_size
            )));
        }

        Ok(Self {
            page: params.page.unwrap_or(1),
            limit,
            search: params.search,
            filters,
        })
    }

    /// Raw value of a query parameter that is not `page`, `limit` or `search`
    #[must_use]
    pub fn filter(&self, field: &str) -> Option<&str> {
        self.filters.get(field).map(String::as_str)
    }

    /// Build the list query, keeping only the named filter fields
    #[must_use]
    pub fn query(&self, filter_fields: &[&str]) -> ListQuery {
        filter_fields.iter().fold(
            ListQuery::new(self.page, self.limit).with_search(self.search.clone()),
            |query, field| query.with_filter(field, self.filter(field)),
        )
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ListParams {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Self::parse(parts.uri.query().unwrap_or_default(), &state.config.api)
    }
}
