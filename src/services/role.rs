use chrono::NaiveDateTime;
use sea_orm::{DatabaseConnection, DatabaseTransaction};
use tracing::info;

use crate::{
    api::types::{
        CreateRoleRequest, RoleListQuery, RoleMenuRequest, RoleResponse, UpdateRoleRequest, now,
    },
    entities::{role, role_menu},
    error::{AppError, AppResult},
    repository::{association, role as role_repo},
    services::transaction::with_transaction,
};

#[derive(Clone)]
pub struct RoleService {
    db: DatabaseConnection,
}

impl RoleService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a role together with the menus it grants
    pub async fn create(&self, request: CreateRoleRequest) -> AppResult<RoleResponse> {
        let now = now();
        let params = request.to_create_params(now)?;
        let code = request.code;

        let (role, menus) = with_transaction(&self.db, move |txn| {
            Box::pin(create_role_tx(txn, code, params, request.menu, now))
        })
        .await?;

        info!("🛡️ Created role {} ({})", role.id, role.code);
        Ok(RoleResponse::new(role, menus))
    }

    pub async fn get(&self, id: i32) -> AppResult<RoleResponse> {
        let role = role_repo::get(&self.db, id).await?.ok_or(AppError::RoleNotExist)?;
        let menus = association::list_role_menus_by_role_ids(&self.db, &[id]).await?;
        Ok(RoleResponse::new(role, menus))
    }

    pub async fn list(&self, query: RoleListQuery) -> AppResult<Vec<RoleResponse>> {
        let filter = query.filter()?;
        let (offset, limit) = query.paging();

        let roles = role_repo::list(&self.db, &filter, offset, limit).await?;
        let ids: Vec<i32> = roles.iter().map(|role| role.id).collect();
        let mut menus = association::group_by_parent(
            association::list_role_menus_by_role_ids(&self.db, &ids).await?,
            |row| row.role_id,
        );

        Ok(roles
            .into_iter()
            .map(|role| {
                let granted = menus.remove(&role.id).unwrap_or_default();
                RoleResponse::new(role, granted)
            })
            .collect())
    }

    pub async fn update(&self, id: i32, request: UpdateRoleRequest) -> AppResult<RoleResponse> {
        let now = now();
        let params = request.to_update_params(id, now)?;

        let (role, menus) = with_transaction(&self.db, move |txn| {
            Box::pin(update_role_tx(txn, id, params, request.code, request.menu, now))
        })
        .await?;

        info!("🛡️ Updated role {}", role.id);
        Ok(RoleResponse::new(role, menus))
    }

    /// Delete a role along with its menu grants and user assignments
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        with_transaction(&self.db, move |txn| Box::pin(delete_role_tx(txn, id))).await?;

        info!("🗑️ Deleted role {}", id);
        Ok(())
    }
}

async fn create_role_tx(
    txn: &DatabaseTransaction,
    code: String,
    params: role::ActiveModel,
    menu_requests: Vec<RoleMenuRequest>,
    now: NaiveDateTime,
) -> AppResult<(role::Model, Vec<role_menu::Model>)> {
    if role_repo::exists_by_code(txn, &code).await? {
        return Err(AppError::RoleCodeOccupy);
    }

    let role = role_repo::create(txn, params).await?;
    let menus = insert_menus(txn, role.id, &menu_requests, now).await?;

    Ok((role, menus))
}

async fn update_role_tx(
    txn: &DatabaseTransaction,
    id: i32,
    params: role::ActiveModel,
    code: Option<String>,
    menu_requests: Option<Vec<RoleMenuRequest>>,
    now: NaiveDateTime,
) -> AppResult<(role::Model, Vec<role_menu::Model>)> {
    let current = role_repo::get(txn, id).await?.ok_or(AppError::RoleNotExist)?;

    if let Some(code) = code.filter(|code| *code != current.code) {
        if role_repo::exists_by_code(txn, &code).await? {
            return Err(AppError::RoleCodeOccupy);
        }
    }

    let role = role_repo::update(txn, params).await?;

    let menus = match menu_requests {
        Some(requests) => {
            association::delete_role_menus_by_role_id(txn, id).await?;
            insert_menus(txn, id, &requests, now).await?
        }
        None => association::list_role_menus_by_role_ids(txn, &[id]).await?,
    };

    Ok((role, menus))
}

async fn delete_role_tx(txn: &DatabaseTransaction, id: i32) -> AppResult<()> {
    if role_repo::get(txn, id).await?.is_none() {
        return Err(AppError::RoleNotExist);
    }

    association::delete_role_menus_by_role_id(txn, id).await?;
    association::delete_user_roles_by_role_id(txn, id).await?;
    role_repo::delete(txn, id).await?;
    Ok(())
}

async fn insert_menus(
    txn: &DatabaseTransaction,
    role_id: i32,
    requests: &[RoleMenuRequest],
    now: NaiveDateTime,
) -> AppResult<Vec<role_menu::Model>> {
    let mut menus = Vec::with_capacity(requests.len());
    for request in requests {
        let params = request.to_params(role_id, now)?;
        menus.push(association::create_role_menu(txn, params).await?);
    }
    Ok(menus)
}
