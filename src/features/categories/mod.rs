//! Hierarchical category management.
//!
//! Categories form a forest through a nullable `parent_id` on each row.
//! Subtrees are read with a single recursive query and rebuilt in memory;
//! deletes cascade to every descendant at the storage layer.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/v1/categories` | No | Create category |
//! | GET | `/api/v1/categories` | No | List categories (paginated) |
//! | GET | `/api/v1/categories/{id}` | No | Fetch subtree rooted at `id` |
//! | PATCH | `/api/v1/categories/{id}/move` | No | Re-parent category |
//! | DELETE | `/api/v1/categories/{id}` | No | Delete category and descendants |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod stores;

pub use services::CategoryService;
pub use stores::{CategoryStore, InMemoryCategoryStore, PgCategoryStore};
