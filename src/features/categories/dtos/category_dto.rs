use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryId};
use crate::shared::types::PaginationMeta;

/// At least one non-whitespace character
static NOT_BLANK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S").unwrap());

/// Request DTO for creating a category
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateCategoryDto {
    /// Globally unique category name
    #[validate(
        length(min = 1, max = 255),
        regex(path = *NOT_BLANK_REGEX, message = "name should not be empty")
    )]
    #[schema(example = "Electronics")]
    pub name: String,

    /// Parent category, omit for a root category
    #[schema(example = 1)]
    pub parent_id: Option<CategoryId>,
}

/// Request DTO for re-parenting a category.
///
/// `newParentId` must be present; `null` moves the category to the root level.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MoveCategoryDto {
    #[serde(deserialize_with = "Option::deserialize")]
    #[schema(required = true, example = 2)]
    pub new_parent_id: Option<CategoryId>,
}

/// Response DTO for a single category row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            parent_id: c.parent_id,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for a category with its direct children (one level)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryWithChildrenDto {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub children: Vec<CategoryResponseDto>,
}

impl CategoryWithChildrenDto {
    pub fn new(category: Category, children: Vec<Category>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            parent_id: category.parent_id,
            created_at: category.created_at,
            updated_at: category.updated_at,
            children: children.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub children: Vec<CategoryTreeDto>,
}

impl CategoryTreeDto {
    /// Build the tree rooted at `root_id` from the rows of a subtree query.
    ///
    /// Children keep the order in which their rows appear in `rows`. Returns
    /// `None` if the root is not among the rows. Building does not recurse, so
    /// chain depth is unbounded here; serializing the result still recurses
    /// once per level.
    pub fn build_subtree(root_id: CategoryId, rows: Vec<Category>) -> Option<CategoryTreeDto> {
        // First pass: id -> row
        let mut nodes: HashMap<CategoryId, Category> = HashMap::with_capacity(rows.len());
        let mut order: Vec<CategoryId> = Vec::with_capacity(rows.len());
        for row in rows {
            if !nodes.contains_key(&row.id) {
                order.push(row.id);
            }
            nodes.insert(row.id, row);
        }
        if !nodes.contains_key(&root_id) {
            return None;
        }

        // Second pass: link each row to its parent, if the parent was fetched
        let mut edges: HashMap<CategoryId, Vec<CategoryId>> = HashMap::new();
        for id in &order {
            if let Some(parent_id) = nodes.get(id).and_then(|c| c.parent_id) {
                if nodes.contains_key(&parent_id) {
                    edges.entry(parent_id).or_default().push(*id);
                }
            }
        }

        // Walk breadth-first from the root. A node is placed once, which
        // also cuts any parent loop.
        let mut placed: HashSet<CategoryId> = HashSet::from([root_id]);
        let mut walk = vec![root_id];
        let mut kept: HashMap<CategoryId, Vec<CategoryId>> = HashMap::new();
        let mut cursor = 0;
        while cursor < walk.len() {
            let id = walk[cursor];
            cursor += 1;
            let children: Vec<CategoryId> = edges
                .get(&id)
                .map(|ids| {
                    ids.iter()
                        .copied()
                        .filter(|child| placed.insert(*child))
                        .collect()
                })
                .unwrap_or_default();
            walk.extend(children.iter().copied());
            kept.insert(id, children);
        }

        // Materialise bottom-up so every child exists before its parent
        let mut built: HashMap<CategoryId, CategoryTreeDto> = HashMap::with_capacity(walk.len());
        for id in walk.into_iter().rev() {
            let category = nodes.remove(&id)?;
            let children = kept
                .remove(&id)
                .unwrap_or_default()
                .into_iter()
                .filter_map(|child| built.remove(&child))
                .collect();

            built.insert(
                id,
                CategoryTreeDto {
                    id: category.id,
                    name: category.name,
                    parent_id: category.parent_id,
                    created_at: category.created_at,
                    updated_at: category.updated_at,
                    children,
                },
            );
        }

        built.remove(&root_id)
    }

    /// Number of nodes in this tree, root included
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }
}

/// `data` payload for create and move responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryData {
    pub category: CategoryWithChildrenDto,
}

/// `data` payload for subtree responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryTreeData {
    pub category: CategoryTreeDto,
}

/// `data` payload for paginated category listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryListData {
    pub categories: Vec<CategoryResponseDto>,
    pub pagination: PaginationMeta,
}
