mod category_dto;

pub use category_dto::{
    CategoryData, CategoryListData, CategoryResponseDto, CategoryTreeData, CategoryTreeDto,
    CategoryWithChildrenDto, CreateCategoryDto, MoveCategoryDto,
};
