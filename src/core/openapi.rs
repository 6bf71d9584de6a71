use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::health::{dtos as health_dtos, handlers as health_handlers};
use crate::shared::types::{ApiResponse, ErrorBody, PaginationMeta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public)
        categories_handlers::add_category,
        categories_handlers::list_categories,
        categories_handlers::fetch_subtree,
        categories_handlers::move_subtree,
        categories_handlers::remove_category,
        // Health
        health_handlers::health_check,
    ),
    components(
        schemas(
            // Shared
            ErrorBody,
            PaginationMeta,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::MoveCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryWithChildrenDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CategoryData,
            categories_dtos::CategoryTreeData,
            categories_dtos::CategoryListData,
            ApiResponse<categories_dtos::CategoryData>,
            ApiResponse<categories_dtos::CategoryTreeData>,
            ApiResponse<categories_dtos::CategoryListData>,
            // Health
            health_dtos::HealthResponseDto,
            health_dtos::HealthInfoDto,
            health_dtos::ComponentHealthDto,
        )
    ),
    tags(
        (name = "categories", description = "Hierarchical categories (public)"),
        (name = "health", description = "Service health"),
    ),
    info(
        title = "Category Tree API",
        version = "1.0",
        description = "Hierarchical category management",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
