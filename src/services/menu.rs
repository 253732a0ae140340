use chrono::NaiveDateTime;
use sea_orm::{DatabaseConnection, DatabaseTransaction};
use tracing::info;

use crate::{
    api::types::{
        CreateMenuRequest, MenuListQuery, MenuResponse, MenuRoleRequest, ResourceRequest,
        UpdateMenuRequest, now,
    },
    entities::{menu, resource, role_menu},
    error::{AppError, AppResult},
    repository::{association, menu as menu_repo},
    services::transaction::with_transaction,
};

type MenuRows = (menu::Model, Vec<resource::Model>, Vec<role_menu::Model>);

#[derive(Clone)]
pub struct MenuService {
    db: DatabaseConnection,
}

impl MenuService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a menu under `parent_id` (0 for a root menu) with its resources
    /// and role grants
    pub async fn create(&self, request: CreateMenuRequest) -> AppResult<MenuResponse> {
        let now = now();

        let (menu, resources, roles) = with_transaction(&self.db, move |txn| {
            Box::pin(create_menu_tx(txn, request, now))
        })
        .await?;

        info!("📋 Created menu {} ({}) under parent {}", menu.id, menu.code, menu.parent_id);
        Ok(MenuResponse::new(menu, resources, roles))
    }

    pub async fn get(&self, id: i32) -> AppResult<MenuResponse> {
        let menu = menu_repo::get(&self.db, id).await?.ok_or(AppError::MenuNotExist)?;
        let resources = association::list_resources_by_menu_ids(&self.db, &[id]).await?;
        let roles = association::list_role_menus_by_menu_ids(&self.db, &[id]).await?;
        Ok(MenuResponse::new(menu, resources, roles))
    }

    pub async fn list(&self, query: MenuListQuery) -> AppResult<Vec<MenuResponse>> {
        let filter = query.filter()?;
        let (offset, limit) = query.paging();

        let menus = menu_repo::list(&self.db, &filter, offset, limit).await?;
        let ids: Vec<i32> = menus.iter().map(|menu| menu.id).collect();
        let mut resources = association::group_by_parent(
            association::list_resources_by_menu_ids(&self.db, &ids).await?,
            |row| row.menu_id,
        );
        let mut roles = association::group_by_parent(
            association::list_role_menus_by_menu_ids(&self.db, &ids).await?,
            |row| row.menu_id,
        );

        Ok(menus
            .into_iter()
            .map(|menu| {
                let owned = resources.remove(&menu.id).unwrap_or_default();
                let granted = roles.remove(&menu.id).unwrap_or_default();
                MenuResponse::new(menu, owned, granted)
            })
            .collect())
    }

    pub async fn update(&self, id: i32, request: UpdateMenuRequest) -> AppResult<MenuResponse> {
        let now = now();

        let (menu, resources, roles) = with_transaction(&self.db, move |txn| {
            Box::pin(update_menu_tx(txn, id, request, now))
        })
        .await?;

        info!("📋 Updated menu {}", menu.id);
        Ok(MenuResponse::new(menu, resources, roles))
    }

    /// Delete a leaf menu with its resources and role grants. Menus that
    /// still have descendants are refused.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        with_transaction(&self.db, move |txn| Box::pin(delete_menu_tx(txn, id))).await?;

        info!("🗑️ Deleted menu {}", id);
        Ok(())
    }
}

async fn create_menu_tx(
    txn: &DatabaseTransaction,
    request: CreateMenuRequest,
    now: NaiveDateTime,
) -> AppResult<MenuRows> {
    let parent_id = request.parent_id();

    if menu_repo::exists_by_code_and_parent(txn, &request.code, parent_id).await? {
        return Err(AppError::MenuCodeOccupy);
    }

    let parent_path = menu_repo::parent_path(txn, parent_id)
        .await?
        .ok_or(AppError::MenuNotExist)?;

    let menu = menu_repo::create(txn, request.to_create_params(parent_path, now)?).await?;
    let resources = insert_resources(txn, menu.id, &request.resource, now).await?;
    let roles = insert_roles(txn, menu.id, &request.role, now).await?;

    Ok((menu, resources, roles))
}

async fn update_menu_tx(
    txn: &DatabaseTransaction,
    id: i32,
    request: UpdateMenuRequest,
    now: NaiveDateTime,
) -> AppResult<MenuRows> {
    let current = menu_repo::get(txn, id).await?.ok_or(AppError::MenuNotExist)?;

    if let Some(parent_id) = request.parent_id.filter(|parent_id| *parent_id != current.parent_id) {
        return Err(AppError::Validate(format!(
            "menu {id} cannot move from parent {} to {parent_id}",
            current.parent_id
        )));
    }

    if let Some(code) = request.code.as_deref().filter(|code| *code != current.code) {
        if menu_repo::exists_by_code_and_parent(txn, code, current.parent_id).await? {
            return Err(AppError::MenuCodeOccupy);
        }
    }

    let menu = menu_repo::update(txn, request.to_update_params(id, now)?).await?;

    let resources = match &request.resource {
        Some(requests) => {
            association::delete_resources_by_menu_id(txn, id).await?;
            insert_resources(txn, id, requests, now).await?
        }
        None => association::list_resources_by_menu_ids(txn, &[id]).await?,
    };

    let roles = match &request.role {
        Some(requests) => {
            association::delete_role_menus_by_menu_id(txn, id).await?;
            insert_roles(txn, id, requests, now).await?
        }
        None => association::list_role_menus_by_menu_ids(txn, &[id]).await?,
    };

    Ok((menu, resources, roles))
}

async fn delete_menu_tx(txn: &DatabaseTransaction, id: i32) -> AppResult<()> {
    let menu = menu_repo::get(txn, id).await?.ok_or(AppError::MenuNotExist)?;

    let prefix = menu_repo::child_path_prefix(&menu.parent_path, menu.id);
    let children = menu_repo::list_child_ids(txn, &prefix).await?;
    if !children.is_empty() {
        return Err(AppError::MenuHasChildren);
    }

    association::delete_resources_by_menu_id(txn, id).await?;
    association::delete_role_menus_by_menu_id(txn, id).await?;
    menu_repo::delete(txn, id).await?;
    Ok(())
}

async fn insert_resources(
    txn: &DatabaseTransaction,
    menu_id: i32,
    requests: &[ResourceRequest],
    now: NaiveDateTime,
) -> AppResult<Vec<resource::Model>> {
    let mut resources = Vec::with_capacity(requests.len());
    for request in requests {
        let params = request.to_params(menu_id, now)?;
        resources.push(association::create_resource(txn, params).await?);
    }
    Ok(resources)
}

async fn insert_roles(
    txn: &DatabaseTransaction,
    menu_id: i32,
    requests: &[MenuRoleRequest],
    now: NaiveDateTime,
) -> AppResult<Vec<role_menu::Model>> {
    let mut roles = Vec::with_capacity(requests.len());
    for request in requests {
        let params = request.to_params(menu_id, now)?;
        roles.push(association::create_role_menu(txn, params).await?);
    }
    Ok(roles)
}
