mod category_handler;

pub use category_handler::{
    __path_add_category, __path_fetch_subtree, __path_list_categories, __path_move_subtree,
    __path_remove_category, add_category, fetch_subtree, list_categories, move_subtree,
    remove_category,
};
