//! Course category endpoints

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
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;
use vanedu_core::types::Identifiable;
use vanedu_core::{ApiResponse, Category, Error};

use super::JsonBody;

/// Body of `POST /api/categories`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    /// Category name
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    /// Short description
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,

    /// Courses already in the category, zero when omitted
    #[serde(default)]
    pub course_count: u32,
}

/// Body of `PUT /api/categories/:id`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    /// Category name
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    /// Short description
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Course counter
    pub course_count: Option<u32>,
}

impl UpdateCategoryRequest {
    fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(description) = self.description {
            category.description = description;
        }
        if let Some(course_count) = self.course_count {
            category.course_count = course_count;
        }
    }
}

/// `GET /api/categories?page&limit&search`
///
/// # Errors
///
/// Fails with 400 on invalid paging parameters.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    params: ListParams,
) -> ApiResult<Json<ApiResponse<Vec<Category>>>> {
    let page = state.store.categories.list(&params.query(&[])).await?;
    Ok(Json(page.into()))
}

/// `GET /api/categories/:id`
///
/// # Errors
///
/// Fails with 404 if no category has the id.
pub async fn get_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let category = state
        .store
        .categories
        .get(&id)
        .await?
        .ok_or_else(|| Error::not_found(Category::KIND, &id))?;

    Ok(Json(ApiResponse::data(category)))
}

/// `POST /api/categories`
///
/// # Errors
///
/// Fails with 400 if the body is malformed or invalid.
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    body: JsonBody<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let ValidatedJson(request) = body.map_err(|e| e.during("Failed to create category"))?;

    let category = state
        .store
        .categories
        .create(Category {
            id: String::new(),
            name: request.name,
            description: request.description,
            course_count: request.course_count,
            created_at: chrono::Utc::now(),
        })
        .await?;
    info!(category_id = %category.id, "Category created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            category,
            "Category created successfully",
        )),
    ))
}

/// `PUT /api/categories/:id`
///
/// # Errors
///
/// Fails with 400 on an invalid body and 404 if no category has the id.
pub async fn update_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: JsonBody<UpdateCategoryRequest>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let ValidatedJson(changes) = body.map_err(|e| e.during("Failed to update category"))?;

    let mut category = state
        .store
        .categories
        .get(&id)
        .await?
        .ok_or_else(|| Error::not_found(Category::KIND, &id))?;
    changes.apply(&mut category);

    let category = state.store.categories.replace(&id, category).await?;
    info!(category_id = %id, "Category updated");

    Ok(Json(ApiResponse::with_message(
        category,
        "Category updated successfully",
    )))
}

/// `DELETE /api/categories/:id`
///
/// # Errors
///
/// Fails with 404 if no category has the id.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ApiResponse<Category>>> {
    let category = state.store.categories.delete(&id).await?;
    info!(category_id = %id, "Category deleted");

    Ok(Json(ApiResponse::with_message(
        category,
        "Category deleted successfully",
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_create_defaults() {
        let request: CreateCategoryRequest =
            serde_json::from_str(r#"{"name":"Cloud"}"#).unwrap();

        assert!(request.validate().is_ok());
        assert_eq!(request.course_count, 0);
        assert_eq!(request.description, "");
    }

    #[test]
    fn test_negative_course_count_rejected() {
        let parsed =
            serde_json::from_str::<CreateCategoryRequest>(r#"{"name":"Cloud","courseCount":-1}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_update_merge() {
        let mut category = vanedu_store::seed::categories()[0].clone();
        let changes: UpdateCategoryRequest = serde_json::from_str(r#"{"courseCount":20}"#).unwrap();

        changes.apply(&mut category);

        assert_eq!(category.course_count, 20);
        assert_eq!(category.name, "Web Development");
    }
}
