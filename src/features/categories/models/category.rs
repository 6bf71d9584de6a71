use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub type CategoryId = i32;

/// Database model for category.
///
/// `children` is never stored; it is rebuilt from `parent_id` edges on read.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
