//! Storage backends for categories.
//!
//! The service only talks to [`CategoryStore`]; the Postgres backend is used in
//! production and the in-memory backend in tests and database-less runs.

mod memory_store;
mod pg_store;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::categories::models::{Category, CategoryId};

pub use memory_store::InMemoryCategoryStore;
pub use pg_store::PgCategoryStore;

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>>;

    async fn insert(&self, name: &str, parent_id: Option<CategoryId>) -> Result<Category>;

    /// Re-point `id` at `parent_id` and touch `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    async fn update_parent(
        &self,
        id: CategoryId,
        parent_id: Option<CategoryId>,
    ) -> Result<Option<Category>>;

    /// Delete a row and, through the cascade rule, every descendant.
    ///
    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: CategoryId) -> Result<bool>;

    /// Direct children of `parent_id`, ordered by id
    async fn find_children(&self, parent_id: CategoryId) -> Result<Vec<Category>>;

    /// The root row plus all transitive descendants, breadth-first
    /// (ties broken by ascending id). Empty if the root does not exist.
    async fn find_subtree(&self, root_id: CategoryId) -> Result<Vec<Category>>;

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Category>>;

    async fn count(&self) -> Result<i64>;
}
