//! Reads and writes on the association tables: `user_role`, `role_menu`
//! (walked from either side) and the menu-owned `resource` rows.
//!
//! The `list_*_by_*_ids` functions fetch the associations of many parents in
//! one query; [`group_by_parent`] splits the result back per parent.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::{prelude::*, resource, role_menu, user_role};

pub fn group_by_parent<T, F>(rows: Vec<T>, key: F) -> HashMap<i32, Vec<T>>
where
    F: Fn(&T) -> i32,
{
    let mut grouped: HashMap<i32, Vec<T>> = HashMap::new();
    for row in rows {
        grouped.entry(key(&row)).or_default().push(row);
    }
    grouped
}

// user_role

pub async fn create_user_role(
    db: &impl ConnectionTrait,
    params: user_role::ActiveModel,
) -> Result<user_role::Model, DbErr> {
    params.insert(db).await
}

pub async fn list_user_roles_by_user_ids(
    db: &impl ConnectionTrait,
    user_ids: &[i32],
) -> Result<Vec<user_role::Model>, DbErr> {
    if user_ids.is_empty() {
        return Ok(Vec::new());
    }

    UserRole::find()
        .filter(user_role::Column::UserId.is_in(user_ids.iter().copied()))
        .order_by_asc(user_role::Column::Id)
        .all(db)
        .await
}

pub async fn delete_user_roles_by_user_id(db: &impl ConnectionTrait, user_id: i32) -> Result<u64, DbErr> {
    let result = UserRole::delete_many()
        .filter(user_role::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_user_roles_by_role_id(db: &impl ConnectionTrait, role_id: i32) -> Result<u64, DbErr> {
    let result = UserRole::delete_many()
        .filter(user_role::Column::RoleId.eq(role_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

// role_menu

pub async fn create_role_menu(
    db: &impl ConnectionTrait,
    params: role_menu::ActiveModel,
) -> Result<role_menu::Model, DbErr> {
    params.insert(db).await
}

pub async fn list_role_menus_by_role_ids(
    db: &impl ConnectionTrait,
    role_ids: &[i32],
) -> Result<Vec<role_menu::Model>, DbErr> {
    if role_ids.is_empty() {
        return Ok(Vec::new());
    }

    RoleMenu::find()
        .filter(role_menu::Column::RoleId.is_in(role_ids.iter().copied()))
        .order_by_asc(role_menu::Column::Id)
        .all(db)
        .await
}

pub async fn list_role_menus_by_menu_ids(
    db: &impl ConnectionTrait,
    menu_ids: &[i32],
) -> Result<Vec<role_menu::Model>, DbErr> {
    if menu_ids.is_empty() {
        return Ok(Vec::new());
    }

    RoleMenu::find()
        .filter(role_menu::Column::MenuId.is_in(menu_ids.iter().copied()))
        .order_by_asc(role_menu::Column::Id)
        .all(db)
        .await
}

pub async fn delete_role_menus_by_role_id(db: &impl ConnectionTrait, role_id: i32) -> Result<u64, DbErr> {
    let result = RoleMenu::delete_many()
        .filter(role_menu::Column::RoleId.eq(role_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

pub async fn delete_role_menus_by_menu_id(db: &impl ConnectionTrait, menu_id: i32) -> Result<u64, DbErr> {
    let result = RoleMenu::delete_many()
        .filter(role_menu::Column::MenuId.eq(menu_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

// resource

pub async fn create_resource(
    db: &impl ConnectionTrait,
    params: resource::ActiveModel,
) -> Result<resource::Model, DbErr> {
    params.insert(db).await
}

pub async fn list_resources_by_menu_ids(
    db: &impl ConnectionTrait,
    menu_ids: &[i32],
) -> Result<Vec<resource::Model>, DbErr> {
    if menu_ids.is_empty() {
        return Ok(Vec::new());
    }

    Resource::find()
        .filter(resource::Column::MenuId.is_in(menu_ids.iter().copied()))
        .order_by_asc(resource::Column::Id)
        .all(db)
        .await
}

pub async fn delete_resources_by_menu_id(db: &impl ConnectionTrait, menu_id: i32) -> Result<u64, DbErr> {
    let result = Resource::delete_many()
        .filter(resource::Column::MenuId.eq(menu_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
