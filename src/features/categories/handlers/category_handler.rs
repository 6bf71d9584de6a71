use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::categories::dtos::{
    CategoryData, CategoryListData, CategoryTreeData, CreateCategoryDto, MoveCategoryDto,
};
use crate::features::categories::models::CategoryId;
use crate::features::categories::services::CategoryService;
use crate::shared::constants::{
    CATEGORIES_LISTED, CATEGORY_CREATED, CATEGORY_FETCHED, CATEGORY_MOVED,
};
use crate::shared::types::{ApiResponse, ErrorBody, PaginationQuery};

/// Create a new category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created successfully", body = ApiResponse<CategoryData>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Parent category not found", body = ErrorBody),
        (status = 409, description = "Category already exist", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn add_category(
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryData>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let category = service.add_category(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            StatusCode::CREATED,
            CATEGORY_CREATED,
            Some(CategoryData { category }),
        )),
    ))
}

/// List categories (flat, paginated)
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Categories fetched successfully", body = ApiResponse<CategoryListData>),
        (status = 400, description = "Invalid query parameters", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    query: std::result::Result<Query<PaginationQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<CategoryListData>>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let page = service.list_categories(&query).await?;
    Ok(Json(ApiResponse::success(
        StatusCode::OK,
        CATEGORIES_LISTED,
        Some(page),
    )))
}

/// Get a category with all of its descendants
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i32, Path, description = "Subtree root category ID")
    ),
    responses(
        (status = 200, description = "Category fetched successfully", body = ApiResponse<CategoryTreeData>),
        (status = 400, description = "Invalid category ID", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn fetch_subtree(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
) -> Result<Json<ApiResponse<CategoryTreeData>>> {
    let category = service.fetch_subtree(id).await?;
    Ok(Json(ApiResponse::success(
        StatusCode::OK,
        CATEGORY_FETCHED,
        Some(CategoryTreeData { category }),
    )))
}

/// Change a category parent
///
/// `newParentId: null` moves the category to the root level.
#[utoipa::path(
    patch,
    path = "/api/v1/categories/{id}/move",
    params(
        ("id" = i32, Path, description = "Category ID to move")
    ),
    request_body = MoveCategoryDto,
    responses(
        (status = 200, description = "Category moved successfully", body = ApiResponse<CategoryData>),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 404, description = "Category or new parent not found", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn move_subtree(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
    AppJson(dto): AppJson<MoveCategoryDto>,
) -> Result<Json<ApiResponse<CategoryData>>> {
    let category = service.move_subtree(id, dto.new_parent_id).await?;
    Ok(Json(ApiResponse::success(
        StatusCode::OK,
        CATEGORY_MOVED,
        Some(CategoryData { category }),
    )))
}

/// Delete a category and its whole subtree
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i32, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, description = "Invalid category ID", body = ErrorBody),
        (status = 404, description = "Category not found", body = ErrorBody)
    ),
    tag = "categories"
)]
pub async fn remove_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<CategoryId>,
) -> Result<StatusCode> {
    service.remove_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
