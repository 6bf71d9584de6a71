use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryListData, CategoryTreeDto, CategoryWithChildrenDto, CreateCategoryDto,
};
use crate::features::categories::models::CategoryId;
use crate::features::categories::stores::CategoryStore;
use crate::shared::constants::{CATEGORY_EXIST, CATEGORY_NOT_FOUND};
use crate::shared::types::{PaginationMeta, PaginationQuery};

fn not_found() -> AppError {
    AppError::NotFound(CATEGORY_NOT_FOUND.to_string())
}

/// Service for category tree operations.
///
/// Every operation is a sequence of independent store calls; the existence
/// checks are not held across the following write.
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// Create a category, rejecting duplicate names and unknown parents
    pub async fn add_category(&self, dto: CreateCategoryDto) -> Result<CategoryWithChildrenDto> {
        if self.store.find_by_name(&dto.name).await?.is_some() {
            return Err(AppError::Conflict(CATEGORY_EXIST.to_string()));
        }

        if let Some(parent_id) = dto.parent_id {
            if self.store.find_by_id(parent_id).await?.is_none() {
                return Err(not_found());
            }
        }

        let category = self.store.insert(&dto.name, dto.parent_id).await?;

        tracing::info!(
            "Category created: id={}, name={:?}, parent_id={:?}",
            category.id,
            category.name,
            category.parent_id
        );

        // A fresh row cannot have children yet
        Ok(CategoryWithChildrenDto::new(category, Vec::new()))
    }

    /// Delete a category together with its whole subtree
    pub async fn remove_category(&self, id: CategoryId) -> Result<()> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        if !self.store.delete(id).await? {
            // Removed by someone else between the check and the delete
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        tracing::info!("Category deleted (with descendants): id={}", id);
        Ok(())
    }

    /// Fetch the category `id` with all of its descendants nested below it
    pub async fn fetch_subtree(&self, id: CategoryId) -> Result<CategoryTreeDto> {
        let rows = self.store.find_subtree(id).await?;
        if rows.is_empty() {
            return Err(not_found());
        }

        let row_count = rows.len();
        // The store returns the root first whenever it returns anything
        let tree = CategoryTreeDto::build_subtree(id, rows).ok_or_else(|| {
            AppError::Internal(format!(
                "Subtree of category {} came back without its root",
                id
            ))
        })?;

        tracing::debug!(
            "Fetched subtree: root={}, rows={}, nodes={}",
            id,
            row_count,
            tree.size()
        );

        Ok(tree)
    }

    /// Re-parent `id` under `new_parent_id`, or make it a root when `None`.
    ///
    /// Does not check whether `new_parent_id` lies inside the subtree of `id`.
    pub async fn move_subtree(
        &self,
        id: CategoryId,
        new_parent_id: Option<CategoryId>,
    ) -> Result<CategoryWithChildrenDto> {
        if self.store.find_by_id(id).await?.is_none() {
            return Err(not_found());
        }

        if let Some(parent_id) = new_parent_id {
            if self.store.find_by_id(parent_id).await?.is_none() {
                return Err(not_found());
            }
        }

        let category = self
            .store
            .update_parent(id, new_parent_id)
            .await?
            .ok_or_else(not_found)?;
        let children = self.store.find_children(id).await?;

        tracing::info!(
            "Category moved: id={}, new_parent_id={:?}",
            id,
            new_parent_id
        );

        Ok(CategoryWithChildrenDto::new(category, children))
    }

    /// List categories page by page, ordered by id
    pub async fn list_categories(&self, query: &PaginationQuery) -> Result<CategoryListData> {
        let total = self.store.count().await?;
        let categories = self.store.list(query.limit(), query.offset()).await?;

        Ok(CategoryListData {
            categories: categories.into_iter().map(Into::into).collect(),
            pagination: PaginationMeta::from_query(query, total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::categories::models::Category;
    use crate::features::categories::stores::InMemoryCategoryStore;
    use async_trait::async_trait;
    use fake::{faker::lorem::en::Word, Fake};
    use tokio_test::{assert_err, assert_ok};

    fn service() -> (CategoryService, Arc<InMemoryCategoryStore>) {
        let store = Arc::new(InMemoryCategoryStore::new());
        (CategoryService::new(store.clone()), store)
    }

    fn create(name: &str, parent_id: Option<CategoryId>) -> CreateCategoryDto {
        CreateCategoryDto {
            name: name.to_string(),
            parent_id,
        }
    }

    fn child_ids(node: &CategoryTreeDto) -> Vec<CategoryId> {
        node.children.iter().map(|c| c.id).collect()
    }

    #[tokio::test]
    async fn test_add_category_returns_empty_children() {
        let (service, _) = service();

        let category = assert_ok!(service.add_category(create("A", None)).await);

        assert_eq!(category.name, "A");
        assert_eq!(category.parent_id, None);
        assert!(category.children.is_empty());
    }

    #[tokio::test]
    async fn test_add_category_duplicate_name_conflicts() {
        let (service, store) = service();
        let name: String = Word().fake();

        assert_ok!(service.add_category(create(&name, None)).await);
        let err = assert_err!(service.add_category(create(&name, None)).await);

        assert!(matches!(err, AppError::Conflict(ref msg) if msg == CATEGORY_EXIST));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_add_category_unknown_parent_is_not_found() {
        let (service, store) = service();

        let err = assert_err!(service.add_category(create("orphan", Some(999_999))).await);

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fetch_subtree_contains_exactly_descendants() {
        let (service, _) = service();
        let root = service.add_category(create("root", None)).await.unwrap();
        let a = service.add_category(create("a", Some(root.id))).await.unwrap();
        let b = service.add_category(create("b", Some(root.id))).await.unwrap();
        let a1 = service.add_category(create("a1", Some(a.id))).await.unwrap();
        let a1x = service.add_category(create("a1x", Some(a1.id))).await.unwrap();
        service.add_category(create("unrelated", None)).await.unwrap();

        let tree = service.fetch_subtree(root.id).await.unwrap();
        assert_eq!(tree.size(), 5);
        assert_eq!(child_ids(&tree), vec![a.id, b.id]);
        assert_eq!(child_ids(&tree.children[0]), vec![a1.id]);
        assert_eq!(child_ids(&tree.children[0].children[0]), vec![a1x.id]);
        assert!(tree.children[1].children.is_empty());

        let inner = service.fetch_subtree(a.id).await.unwrap();
        assert_eq!(inner.size(), 3);
        assert_eq!(inner.parent_id, Some(root.id));
    }

    /// Store whose subtree query drops the root row
    struct RootlessSubtreeStore(InMemoryCategoryStore);

    #[async_trait]
    impl CategoryStore for RootlessSubtreeStore {
        async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
            self.0.find_by_id(id).await
        }

        async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
            self.0.find_by_name(name).await
        }

        async fn insert(&self, name: &str, parent_id: Option<CategoryId>) -> Result<Category> {
            self.0.insert(name, parent_id).await
        }

        async fn update_parent(
            &self,
            id: CategoryId,
            parent_id: Option<CategoryId>,
        ) -> Result<Option<Category>> {
            self.0.update_parent(id, parent_id).await
        }

        async fn delete(&self, id: CategoryId) -> Result<bool> {
            self.0.delete(id).await
        }

        async fn find_children(&self, parent_id: CategoryId) -> Result<Vec<Category>> {
            self.0.find_children(parent_id).await
        }

        async fn find_subtree(&self, root_id: CategoryId) -> Result<Vec<Category>> {
            let mut rows = self.0.find_subtree(root_id).await?;
            rows.retain(|c| c.id != root_id);
            Ok(rows)
        }

        async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Category>> {
            self.0.list(limit, offset).await
        }

        async fn count(&self) -> Result<i64> {
            self.0.count().await
        }
    }

    #[tokio::test]
    async fn test_fetch_subtree_without_root_row_is_internal_error() {
        let store = Arc::new(RootlessSubtreeStore(InMemoryCategoryStore::new()));
        let service = CategoryService::new(store);
        let root = service.add_category(create("root", None)).await.unwrap();
        service.add_category(create("leaf", Some(root.id))).await.unwrap();

        let err = assert_err!(service.fetch_subtree(root.id).await);

        assert!(matches!(err, AppError::Internal(ref msg) if msg.contains("without its root")));
        assert_eq!(
            err.status_code(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_fetch_subtree_missing_root() {
        let (service, _) = service();

        let err = assert_err!(service.fetch_subtree(999_999).await);
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == CATEGORY_NOT_FOUND));
    }

    #[tokio::test]
    async fn test_move_subtree_only_touches_moved_node() {
        let (service, store) = service();
        let left = service.add_category(create("left", None)).await.unwrap();
        let right = service.add_category(create("right", None)).await.unwrap();
        let branch = service.add_category(create("branch", Some(left.id))).await.unwrap();
        let leaf = service.add_category(create("leaf", Some(branch.id))).await.unwrap();
        let leaf_before = store.find_by_id(leaf.id).await.unwrap().unwrap();

        let moved = service.move_subtree(branch.id, Some(right.id)).await.unwrap();

        assert_eq!(moved.parent_id, Some(right.id));
        assert_eq!(moved.children.len(), 1);
        assert_eq!(moved.children[0].id, leaf.id);

        let leaf_after = store.find_by_id(leaf.id).await.unwrap().unwrap();
        assert_eq!(leaf_after, leaf_before);

        let right_tree = service.fetch_subtree(right.id).await.unwrap();
        assert_eq!(right_tree.size(), 3);
        let left_tree = service.fetch_subtree(left.id).await.unwrap();
        assert_eq!(left_tree.size(), 1);
    }

    #[tokio::test]
    async fn test_move_subtree_to_root() {
        let (service, _) = service();
        let parent = service.add_category(create("parent", None)).await.unwrap();
        let child = service.add_category(create("child", Some(parent.id))).await.unwrap();

        let moved = service.move_subtree(child.id, None).await.unwrap();

        assert_eq!(moved.parent_id, None);
        assert!(moved.updated_at >= child.updated_at);
    }

    #[tokio::test]
    async fn test_move_subtree_missing_inputs() {
        let (service, store) = service();
        let category = service.add_category(create("solo", None)).await.unwrap();

        let err = assert_err!(service.move_subtree(999_999, None).await);
        assert!(matches!(err, AppError::NotFound(_)));

        let err = assert_err!(service.move_subtree(category.id, Some(999_999)).await);
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == CATEGORY_NOT_FOUND));

        let unchanged = store.find_by_id(category.id).await.unwrap().unwrap();
        assert_eq!(unchanged.parent_id, None);
    }

    /// Known limitation: moving a node below its own descendant is accepted.
    /// Only termination of later reads is checked here.
    #[tokio::test]
    async fn test_move_under_own_descendant_is_not_rejected() {
        let (service, _) = service();
        let a = service.add_category(create("a", None)).await.unwrap();
        let b = service.add_category(create("b", Some(a.id))).await.unwrap();
        let c = service.add_category(create("c", Some(b.id))).await.unwrap();

        assert_ok!(service.move_subtree(a.id, Some(c.id)).await);

        let tree = service.fetch_subtree(a.id).await.unwrap();
        assert_eq!(tree.size(), 3);
    }

    #[tokio::test]
    async fn test_remove_category_cascades() {
        let (service, store) = service();
        let root = service.add_category(create("root", None)).await.unwrap();
        let child = service.add_category(create("child", Some(root.id))).await.unwrap();
        let grandchild = service.add_category(create("grandchild", Some(child.id))).await.unwrap();

        assert_ok!(service.remove_category(root.id).await);

        for id in [root.id, child.id, grandchild.id] {
            assert!(store.find_by_id(id).await.unwrap().is_none());
            let err = assert_err!(service.fetch_subtree(id).await);
            assert!(matches!(err, AppError::NotFound(_)));
        }
    }

    #[tokio::test]
    async fn test_remove_category_missing() {
        let (service, _) = service();

        let err = assert_err!(service.remove_category(999_999).await);
        assert!(matches!(err, AppError::NotFound(ref msg) if msg.contains("999999")));
    }

    #[tokio::test]
    async fn test_create_move_remove_scenario() {
        let (service, store) = service();
        let a = service.add_category(create("A", None)).await.unwrap();
        let b = service.add_category(create("B", Some(a.id))).await.unwrap();
        let c = service.add_category(create("C", Some(a.id))).await.unwrap();
        assert_eq!((a.id, b.id, c.id), (1, 2, 3));

        let tree = service.fetch_subtree(1).await.unwrap();
        assert_eq!(child_ids(&tree), vec![2, 3]);
        assert!(tree.children.iter().all(|child| child.children.is_empty()));

        let moved = service.move_subtree(2, None).await.unwrap();
        assert_eq!(moved.parent_id, None);

        service.remove_category(1).await.unwrap();
        assert!(store.find_by_id(1).await.unwrap().is_none());
        assert!(store.find_by_id(3).await.unwrap().is_none());
        assert!(store.find_by_id(2).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_categories_paginates() {
        let (service, _) = service();
        for i in 0..7 {
            service
                .add_category(create(&format!("category-{}", i), None))
                .await
                .unwrap();
        }

        let page = service
            .list_categories(&PaginationQuery {
                page: 2,
                page_size: 3,
            })
            .await
            .unwrap();

        let ids: Vec<CategoryId> = page.categories.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 5, 6]);
        assert_eq!(page.pagination, PaginationMeta::new(2, 3, 7));
        assert_eq!(page.pagination.total_page, 3);
    }
}
