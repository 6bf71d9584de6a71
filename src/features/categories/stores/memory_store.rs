use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::core::database::DatabaseProbe;
use crate::core::error::{AppError, Result};
use crate::features::categories::models::{Category, CategoryId};
use crate::features::categories::stores::CategoryStore;
use crate::shared::constants::{CATEGORY_EXIST, CATEGORY_NOT_FOUND};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<CategoryId, Category>,
    last_id: CategoryId,
}

impl Table {
    fn children_of(&self, parent_id: CategoryId) -> impl Iterator<Item = &Category> {
        self.rows
            .values()
            .filter(move |c| c.parent_id == Some(parent_id))
    }

    fn check_parent(&self, parent_id: Option<CategoryId>) -> Result<()> {
        match parent_id {
            Some(pid) if !self.rows.contains_key(&pid) => {
                Err(AppError::NotFound(CATEGORY_NOT_FOUND.to_string()))
            }
            _ => Ok(()),
        }
    }
}

/// In-process category table with the same constraints as the SQL schema:
/// unique names, parent references checked on write, cascading deletes.
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    table: RwLock<Table>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>> {
        let table = self.table.read().await;
        Ok(table.rows.values().find(|c| c.name == name).cloned())
    }

    async fn insert(&self, name: &str, parent_id: Option<CategoryId>) -> Result<Category> {
        let mut table = self.table.write().await;

        if table.rows.values().any(|c| c.name == name) {
            return Err(AppError::Conflict(CATEGORY_EXIST.to_string()));
        }
        table.check_parent(parent_id)?;

        table.last_id += 1;
        let now = Utc::now();
        let category = Category {
            id: table.last_id,
            name: name.to_string(),
            parent_id,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(category.id, category.clone());

        Ok(category)
    }

    async fn update_parent(
        &self,
        id: CategoryId,
        parent_id: Option<CategoryId>,
    ) -> Result<Option<Category>> {
        let mut table = self.table.write().await;
        table.check_parent(parent_id)?;

        Ok(table.rows.get_mut(&id).map(|category| {
            category.parent_id = parent_id;
            category.updated_at = Utc::now();
            category.clone()
        }))
    }

    async fn delete(&self, id: CategoryId) -> Result<bool> {
        let mut table = self.table.write().await;
        if !table.rows.contains_key(&id) {
            return Ok(false);
        }

        let mut doomed = vec![id];
        let mut seen: HashSet<CategoryId> = HashSet::from([id]);
        let mut cursor = 0;
        while cursor < doomed.len() {
            let current = doomed[cursor];
            cursor += 1;
            let children: Vec<CategoryId> = table.children_of(current).map(|c| c.id).collect();
            for child in children {
                if seen.insert(child) {
                    doomed.push(child);
                }
            }
        }

        for id in doomed {
            table.rows.remove(&id);
        }
        Ok(true)
    }

    async fn find_children(&self, parent_id: CategoryId) -> Result<Vec<Category>> {
        let table = self.table.read().await;
        Ok(table.children_of(parent_id).cloned().collect())
    }

    async fn find_subtree(&self, root_id: CategoryId) -> Result<Vec<Category>> {
        let table = self.table.read().await;
        let Some(root) = table.rows.get(&root_id) else {
            return Ok(Vec::new());
        };

        let mut collected = vec![root.clone()];
        let mut visited: HashSet<CategoryId> = HashSet::from([root_id]);
        let mut frontier = vec![root_id];

        // Expand one level at a time until no new rows appear
        while !frontier.is_empty() {
            let level: Vec<Category> = table
                .rows
                .values()
                .filter(|c| {
                    c.parent_id.is_some_and(|pid| frontier.contains(&pid))
                        && !visited.contains(&c.id)
                })
                .cloned()
                .collect();

            frontier = level.iter().map(|c| c.id).collect();
            visited.extend(frontier.iter().copied());
            collected.extend(level);
        }

        Ok(collected)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Category>> {
        let table = self.table.read().await;
        Ok(table
            .rows
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.table.read().await.rows.len() as i64)
    }
}

#[async_trait]
impl DatabaseProbe for InMemoryCategoryStore {
    async fn ping(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(categories: &[Category]) -> Vec<CategoryId> {
        categories.iter().map(|c| c.id).collect()
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = InMemoryCategoryStore::new();
        let a = store.insert("A", None).await.unwrap();
        let b = store.insert("B", Some(a.id)).await.unwrap();

        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(b.parent_id, Some(1));
        assert_eq!(a.created_at, a.updated_at);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_name_and_unknown_parent() {
        let store = InMemoryCategoryStore::new();
        store.insert("A", None).await.unwrap();

        assert!(matches!(
            store.insert("A", None).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            store.insert("B", Some(42)).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_subtree_is_breadth_first() {
        let store = InMemoryCategoryStore::new();
        let root = store.insert("root", None).await.unwrap(); // 1
        let left = store.insert("left", Some(root.id)).await.unwrap(); // 2
        let right = store.insert("right", Some(root.id)).await.unwrap(); // 3
        store.insert("left-leaf", Some(left.id)).await.unwrap(); // 4
        store.insert("right-leaf", Some(right.id)).await.unwrap(); // 5
        store.insert("elsewhere", None).await.unwrap(); // 6

        let subtree = store.find_subtree(root.id).await.unwrap();
        assert_eq!(ids(&subtree), vec![1, 2, 3, 4, 5]);

        let partial = store.find_subtree(right.id).await.unwrap();
        assert_eq!(ids(&partial), vec![3, 5]);

        assert!(store.find_subtree(99).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_to_descendants_only() {
        let store = InMemoryCategoryStore::new();
        let root = store.insert("root", None).await.unwrap();
        let child = store.insert("child", Some(root.id)).await.unwrap();
        let grandchild = store.insert("grandchild", Some(child.id)).await.unwrap();
        let other = store.insert("other", None).await.unwrap();

        assert!(store.delete(child.id).await.unwrap());

        assert!(store.find_by_id(child.id).await.unwrap().is_none());
        assert!(store.find_by_id(grandchild.id).await.unwrap().is_none());
        assert!(store.find_by_id(root.id).await.unwrap().is_some());
        assert!(store.find_by_id(other.id).await.unwrap().is_some());
        assert!(!store.delete(child.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_parent_touches_updated_at() {
        let store = InMemoryCategoryStore::new();
        let a = store.insert("A", None).await.unwrap();
        let b = store.insert("B", None).await.unwrap();

        let moved = store.update_parent(b.id, Some(a.id)).await.unwrap().unwrap();
        assert_eq!(moved.parent_id, Some(a.id));
        assert!(moved.updated_at >= b.updated_at);
        assert_eq!(moved.created_at, b.created_at);

        assert!(store.update_parent(99, None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_pages_in_id_order() {
        let store = InMemoryCategoryStore::new();
        for name in ["a", "b", "c", "d", "e"] {
            store.insert(name, None).await.unwrap();
        }

        assert_eq!(ids(&store.list(2, 0).await.unwrap()), vec![1, 2]);
        assert_eq!(ids(&store.list(2, 4).await.unwrap()), vec![5]);
        assert!(store.list(2, 10).await.unwrap().is_empty());
    }
}
