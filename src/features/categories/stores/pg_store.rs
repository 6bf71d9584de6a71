use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryId};
use crate::features::categories::stores::CategoryStore;
use crate::shared::constants::{CATEGORY_EXIST, CATEGORY_NOT_FOUND};

const COLUMNS: &str = "id, name, parent_id, created_at, updated_at";

/// Convert database error to more specific AppError.
///
/// The service pre-checks uniqueness and parent existence, so these only fire
/// when a concurrent request wins the race between check and write.
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(CATEGORY_EXIST.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::NotFound(CATEGORY_NOT_FOUND.to_string());
        }
    }

    AppError::Database(e)
}

/// Postgres-backed category store
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category by id: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE name = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to get category by name: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn insert(&self, name: &str, parent_id: Option<CategoryId>) -> Result<Category> {
        let query = format!(
            "INSERT INTO categories (name, parent_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .bind(parent_id)
            .fetch_one(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn update_parent(
        &self,
        id: CategoryId,
        parent_id: Option<CategoryId>,
    ) -> Result<Option<Category>> {
        let query = format!(
            "UPDATE categories
             SET parent_id = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(parent_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(handle_db_error)
    }

    async fn delete(&self, id: CategoryId) -> Result<bool> {
        // ON DELETE CASCADE on parent_id removes the whole subtree
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to delete category: {:?}", e);
                AppError::Database(e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_children(&self, parent_id: CategoryId) -> Result<Vec<Category>> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE parent_id = $1 ORDER BY id");
        sqlx::query_as::<_, Category>(&query)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list category children: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_subtree(&self, root_id: CategoryId) -> Result<Vec<Category>> {
        // `path` stops the expansion from revisiting a node if a move ever
        // closed a loop in the parent chain.
        let query = format!(
            "WITH RECURSIVE subtree AS (
                SELECT {COLUMNS}, 0 AS depth, ARRAY[id] AS path
                FROM categories
                WHERE id = $1
                UNION ALL
                SELECT c.id, c.name, c.parent_id, c.created_at, c.updated_at,
                       s.depth + 1, s.path || c.id
                FROM categories c
                INNER JOIN subtree s ON c.parent_id = s.id
                WHERE NOT c.id = ANY(s.path)
            )
            SELECT {COLUMNS} FROM subtree ORDER BY depth, id"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(root_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch category subtree: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Category>> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Category>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list categories: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count categories: {:?}", e);
                AppError::Database(e)
            })
    }
}
