use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

use crate::entities::{prelude::*, role, sea_orm_active_enums::RoleStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleFilter {
    pub code: Option<String>,
    pub name: Option<String>,
    pub status: Option<RoleStatus>,
}

pub async fn create(db: &impl ConnectionTrait, params: role::ActiveModel) -> Result<role::Model, DbErr> {
    params.insert(db).await
}

pub async fn get(db: &impl ConnectionTrait, id: i32) -> Result<Option<role::Model>, DbErr> {
    Role::find_by_id(id).one(db).await
}

pub async fn exists_by_code(db: &impl ConnectionTrait, code: &str) -> Result<bool, DbErr> {
    let count = Role::find()
        .filter(role::Column::Code.eq(code))
        .count(db)
        .await?;
    Ok(count > 0)
}

pub async fn list(
    db: &impl ConnectionTrait,
    filter: &RoleFilter,
    offset: u64,
    limit: Option<u64>,
) -> Result<Vec<role::Model>, DbErr> {
    let mut query = Role::find().order_by_asc(role::Column::Id);

    if let Some(code) = &filter.code {
        query = query.filter(role::Column::Code.contains(code));
    }

    if let Some(name) = &filter.name {
        query = query.filter(role::Column::Name.contains(name));
    }

    if let Some(status) = filter.status {
        query = query.filter(role::Column::Status.eq(status));
    }

    if offset > 0 {
        query = query.offset(offset);
    }

    if let Some(limit) = limit {
        query = query.limit(limit);
    }

    query.all(db).await
}

pub async fn update(db: &impl ConnectionTrait, params: role::ActiveModel) -> Result<role::Model, DbErr> {
    params.update(db).await
}

pub async fn delete(db: &impl ConnectionTrait, id: i32) -> Result<(), DbErr> {
    Role::delete_by_id(id).exec(db).await?;
    Ok(())
}
