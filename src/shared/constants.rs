/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Value of the `status` field in success envelopes
pub const STATUS_SUCCESS: &str = "success";

// =============================================================================
// CATEGORY MESSAGES
// =============================================================================

pub const CATEGORY_EXIST: &str = "Category already exist";

pub const CATEGORY_NOT_FOUND: &str = "Category not found";

pub const CATEGORY_CREATED: &str = "Category created successfully";

pub const CATEGORY_FETCHED: &str = "Category fetched successfully";

pub const CATEGORY_MOVED: &str = "Category moved successfully";

pub const CATEGORIES_LISTED: &str = "Categories fetched successfully";
