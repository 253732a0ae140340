use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::entities::{app_user, prelude::*, sea_orm_active_enums::UserStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserFilter {
    pub username: Option<String>,
    pub name: Option<String>,
    pub status: Option<UserStatus>,
}

pub async fn create(
    db: &impl ConnectionTrait,
    params: app_user::ActiveModel,
) -> Result<app_user::Model, DbErr> {
    params.insert(db).await
}

pub async fn get(db: &impl ConnectionTrait, id: i32) -> Result<Option<app_user::Model>, DbErr> {
    AppUser::find_by_id(id).one(db).await
}

pub async fn exists_by_username(db: &impl ConnectionTrait, username: &str) -> Result<bool, DbErr> {
    let count = AppUser::find()
        .filter(app_user::Column::Username.eq(username))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn list(
    db: &impl ConnectionTrait,
    filter: &UserFilter,
    offset: u64,
    limit: Option<u64>,
) -> Result<Vec<app_user::Model>, DbErr> {
    let mut query = AppUser::find().order_by_asc(app_user::Column::Id);

    if let Some(username) = &filter.username {
        query = query.filter(app_user::Column::Username.contains(username));
    }

    if let Some(name) = &filter.name {
        query = query.filter(app_user::Column::Name.contains(name));
    }

    if let Some(status) = filter.status {
        query = query.filter(app_user::Column::Status.eq(status));
    }

    if offset > 0 {
        query = query.offset(offset);
    }

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    query.all(db).await
}

/// Writes only the columns set on `params`; the rest keep their stored value.
pub async fn update(
    db: &impl ConnectionTrait,
    params: app_user::ActiveModel,
) -> Result<app_user::Model, DbErr> {
    params.update(db).await
}

pub async fn delete(db: &impl ConnectionTrait, id: i32) -> Result<(), DbErr> {
    AppUser::delete_by_id(id).exec(db).await?;
    Ok(())
}
