use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::entities::{
    menu,
    prelude::*,
    sea_orm_active_enums::{MenuStatus, MenuType},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MenuFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<MenuStatus>,
    pub r#type: Option<MenuType>,
    pub parent_id: Option<i32>,
}

/// Path stored on a child of `parent_id`'s menu: the parent's own path plus
/// its id and a trailing dot.
pub fn child_path_prefix(parent_path: &str, parent_id: i32) -> String {
    format!("{parent_path}{parent_id}.")
}

/// Resolves the `parent_path` a new child of `parent_id` must carry.
///
/// Returns `Some("")` for a root menu (`parent_id == 0`) and `None` when the
/// referenced parent does not exist.
pub async fn parent_path(db: &impl ConnectionTrait, parent_id: i32) -> Result<Option<String>, DbErr> {
    if parent_id == 0 {
        return Ok(Some(String::new()));
    }

    let parent = Menu::find_by_id(parent_id).one(db).await?;
    Ok(parent.map(|parent| child_path_prefix(&parent.parent_path, parent.id)))
}

pub async fn create(db: &impl ConnectionTrait, params: menu::ActiveModel) -> Result<menu::Model, DbErr> {
    params.insert(db).await
}

pub async fn get(db: &impl ConnectionTrait, id: i32) -> Result<Option<menu::Model>, DbErr> {
    Menu::find_by_id(id).one(db).await
}

pub async fn exists_by_code_and_parent(
    db: &impl ConnectionTrait,
    code: &str,
    parent_id: i32,
) -> Result<bool, DbErr> {
    let count = Menu::find()
        .filter(menu::Column::Code.eq(code))
        .filter(menu::Column::ParentId.eq(parent_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Ids of every menu below the one whose child prefix is `prefix`.
pub async fn list_child_ids(db: &impl ConnectionTrait, prefix: &str) -> Result<Vec<i32>, DbErr> {
    Menu::find()
        .select_only()
        .column(menu::Column::Id)
        .filter(menu::Column::ParentPath.starts_with(prefix))
        .order_by_asc(menu::Column::Id)
        .into_tuple::<i32>()
        .all(db)
        .await
}

pub async fn list(
    db: &impl ConnectionTrait,
    filter: &MenuFilter,
    offset: u64,
    limit: Option<u64>,
) -> Result<Vec<menu::Model>, DbErr> {
    let mut query = Menu::find().order_by_asc(menu::Column::Id);

    if let Some(code) = &filter.code {
        query = query.filter(menu::Column::Code.contains(code));
    }

    if let Some(name) = &filter.name {
        query = query.filter(menu::Column::Name.contains(name));
    }

    if let Some(status) = filter.status {
        query = query.filter(menu::Column::Status.eq(status));
    }

    if let Some(menu_type) = filter.r#type {
        query = query.filter(menu::Column::Type.eq(menu_type));
    }

    if let Some(parent_id) = filter.parent_id {
        query = query.filter(menu::Column::ParentId.eq(parent_id));
    }

    if offset > 0 {
        query = query.offset(offset);
    }

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    query.all(db).await
}

pub async fn update(db: &impl ConnectionTrait, params: menu::ActiveModel) -> Result<menu::Model, DbErr> {
    params.update(db).await
}

pub async fn delete(db: &impl ConnectionTrait, id: i32) -> Result<(), DbErr> {
    Menu::delete_by_id(id).exec(db).await?;
    Ok(())
}
