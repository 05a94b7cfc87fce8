//! List query processing: search, equality filters and page slicing
//!
//! Every list endpoint runs the same pipeline over a collection kept in
//! insertion order: free-text search, then field filters, then the page
//! window. Nothing is sorted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::ApiResponse;

/// Filter value that matches every record
pub const MATCH_ALL: &str = "all";

/// Records that can be searched and filtered by a [`ListQuery`]
pub trait Searchable {
    /// Values of the fields free-text search looks at
    fn search_fields(&self) -> Vec<&str>;

    /// Value of an exact-match filter field, `None` if the field is not
    /// filterable on this record type
    fn filter_value(&self, _field: &str) -> Option<&str> {
        None
    }
}

/// A parsed list request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Case-insensitive substring searched in the record's search fields
    pub search: Option<String>,
    /// Exact-match filters keyed by field name
    pub filters: BTreeMap<String, String>,
}

/// Pagination metadata: `{page, limit, total, totalPages}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Requested page
    pub page: u32,
    /// Requested page size
    pub limit: u32,
    /// Records matching search and filters
    pub total: u64,
    /// `ceil(total / limit)`
    pub total_pages: u64,
}

/// One window of a filtered collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Records in the window, in collection order
    pub data: Vec<T>,
    /// Window metadata
    pub meta: PaginationMeta,
}

impl ListQuery {
    /// Query for one page; zero page or limit is raised to 1
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            search: None,
            filters: BTreeMap::new(),
        }
    }

    /// Set the search term; blank terms are ignored
    #[must_use]
    pub fn with_search(mut self, term: Option<impl Into<String>>) -> Self {
        self.search = term.map(Into::into).filter(|term| !term.is_empty());
        self
    }

    /// Add an equality filter; absent, blank or `all` values are ignored
    #[must_use]
    pub fn with_filter(mut self, field: &str, value: Option<impl Into<String>>) -> Self {
        if let Some(value) = value.map(Into::into) {
            if !value.is_empty() && value != MATCH_ALL {
                self.filters.insert(field.to_string(), value);
            }
        }
        self
    }

    /// Index of the first record on the requested page
    #[must_use]
    pub fn offset(&self) -> usize {
        let page = usize::try_from(self.page.max(1) - 1).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit.max(1)).unwrap_or(usize::MAX);
        page.saturating_mul(limit)
    }

    /// Whether a record passes the search term and every filter
    pub fn matches<T: Searchable + ?Sized>(&self, record: &T) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|term| {
            let needle = term.to_lowercase();
            record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });

        search_ok
            && self
                .filters
                .iter()
                .all(|(field, expected)| record.filter_value(field) == Some(expected.as_str()))
    }

    /// Run the search → filter → paginate pipeline over a collection
    pub fn apply<'a, T, I>(&self, records: I) -> Page<T>
    where
        T: Searchable + Clone + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let matching: Vec<&T> = records
            .into_iter()
            .filter(|record| self.matches(*record))
            .collect();

        let limit = self.limit.max(1);
        let total = matching.len() as u64;
        let data = matching
            .into_iter()
            .skip(self.offset())
            .take(limit as usize)
            .cloned()
            .collect();

        Page {
            data,
            meta: PaginationMeta {
                page: self.page,
                limit,
                total,
                total_pages: total.div_ceil(u64::from(limit)),
            },
        }
    }
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::new(1, 10)
    }
}

impl<T> From<Page<T>> for ApiResponse<Vec<T>> {
    fn from(page: Page<T>) -> Self {
        Self::paginated(page.data, page.meta)
    }
}
